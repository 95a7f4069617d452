use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::RetryConfig;
use crate::data::{GlobalRateLimiter, load_latest_klines};
use crate::domain::{Candle, PairInterval};

/// Abstract interface for fetching market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the most recent closed candles for a pair/interval, oldest first.
    async fn fetch_candles(
        &self,
        pair_interval: &PairInterval,
        limit: usize,
    ) -> Result<Vec<Candle>>;
}

pub struct BinanceProvider {
    limiter: GlobalRateLimiter,
}

impl BinanceProvider {
    pub fn new(limiter: GlobalRateLimiter) -> Self {
        Self { limiter }
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    async fn fetch_candles(
        &self,
        pair_interval: &PairInterval,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        load_latest_klines(pair_interval, limit, &self.limiter).await
    }
}

/// Bounded retry around one provider call: sleeps 2^attempt seconds plus a
/// random fractional-second jitter between tries, then gives up with context.
pub async fn fetch_with_retry(
    provider: &dyn MarketDataProvider,
    pair_interval: &PairInterval,
    limit: usize,
    retry: &RetryConfig,
) -> Result<Vec<Candle>> {
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt: u32 = 0;
    loop {
        match provider.fetch_candles(pair_interval, limit).await {
            Ok(candles) => return Ok(candles),
            Err(e) => {
                attempt += 1;
                if attempt >= max_attempts {
                    return Err(e.context(format!(
                        "{} still failing after {} attempts",
                        pair_interval, attempt
                    )));
                }

                let backoff_secs = 2u64.saturating_pow(attempt) as f64 + rand::random::<f64>();
                log::warn!(
                    "⚠️ {} fetch attempt {}/{} failed: {:#}. Retrying in {:.1}s...",
                    pair_interval,
                    attempt,
                    max_attempts,
                    e,
                    backoff_secs
                );
                tokio::time::sleep(Duration::from_secs_f64(backoff_secs)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TimeUtils;
    use anyhow::bail;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingProvider {
        calls: AtomicU32,
        succeed_on: u32,
    }

    #[async_trait]
    impl MarketDataProvider for CountingProvider {
        async fn fetch_candles(
            &self,
            _pair_interval: &PairInterval,
            _limit: usize,
        ) -> Result<Vec<Candle>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call < self.succeed_on {
                bail!("synthetic failure on call {}", call);
            }
            Ok(vec![Candle::new(0, 1.0, 2.0, 0.5, 1.5, 10.0)])
        }
    }

    fn pair() -> PairInterval {
        PairInterval::new("BTCUSDT", TimeUtils::MS_IN_15_MIN)
    }

    #[tokio::test]
    async fn succeeds_after_a_transient_failure() {
        let provider = CountingProvider {
            calls: AtomicU32::new(0),
            succeed_on: 2,
        };
        let retry = RetryConfig { max_attempts: 3 };

        let candles = fetch_with_retry(&provider, &pair(), 100, &retry)
            .await
            .expect("second attempt should succeed");
        assert_eq!(candles.len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_the_attempt_budget() {
        let provider = CountingProvider {
            calls: AtomicU32::new(0),
            succeed_on: u32::MAX,
        };
        let retry = RetryConfig { max_attempts: 1 }; // no sleeps on this path

        let result = fetch_with_retry(&provider, &pair(), 100, &retry).await;
        assert!(result.is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
