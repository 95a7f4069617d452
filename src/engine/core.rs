use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::analysis::SignalAggregator;
use crate::notify::NotificationSink;

/// Drives the aggregator on a fixed-period timer and forwards each non-empty
/// cycle report to the notification sink as one batched message.
pub struct MonitorEngine {
    aggregator: SignalAggregator,
    sink: Arc<dyn NotificationSink>,
    cycle_interval: Duration,
}

impl MonitorEngine {
    pub fn new(
        aggregator: SignalAggregator,
        sink: Arc<dyn NotificationSink>,
        cycle_interval: Duration,
    ) -> Self {
        Self {
            aggregator,
            sink,
            cycle_interval,
        }
    }

    /// Runs forever. Cycles never overlap: a late cycle delays the next tick
    /// instead of bursting to catch up.
    pub async fn run(&mut self) {
        if let Err(e) = self.sink.deliver("🤖 <b>signal-sniper started</b>").await {
            log::error!("Startup notification failed: {:#}", e);
        }

        let mut ticker = time::interval(self.cycle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }

    /// One cycle: analyze, then notify only when there is something to say.
    pub async fn run_once(&mut self) {
        let report = self.aggregator.run_cycle().await;
        if report.is_empty() {
            log::info!("Cycle produced no findings, nothing to deliver");
            return;
        }

        let alert_count = report.alerts.len();
        match self.sink.deliver(&report.to_message()).await {
            // Delivery failures are dropped, the next cycle carries fresh data
            Err(e) => log::error!("❌ Cycle report delivery failed: {:#}", e),
            Ok(()) => log::info!("Cycle complete: {} alert(s) delivered", alert_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SignalAggregator;
    use crate::config::{ANALYSIS, MONITOR, MonitorConfig, RetryConfig};
    use crate::data::MarketDataProvider;
    use crate::domain::{Candle, PairInterval};
    use anyhow::Result;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct RecordingSink {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(&self, text: &str) -> Result<()> {
            self.sent.lock().await.push(text.to_string());
            Ok(())
        }
    }

    struct EmptyProvider;

    #[async_trait]
    impl MarketDataProvider for EmptyProvider {
        async fn fetch_candles(
            &self,
            _pair_interval: &PairInterval,
            _limit: usize,
        ) -> Result<Vec<Candle>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn empty_cycle_makes_no_sink_call() {
        let monitor = MonitorConfig {
            symbols: &[],
            inter_symbol_delay_ms: 0,
            retry: RetryConfig { max_attempts: 1 },
            ..MONITOR
        };
        let aggregator =
            SignalAggregator::new(ANALYSIS, monitor, std::sync::Arc::new(EmptyProvider));
        let sink = Arc::new(RecordingSink {
            sent: Mutex::new(Vec::new()),
        });

        let mut engine = MonitorEngine::new(aggregator, sink.clone(), Duration::from_secs(1));
        engine.run_once().await;

        assert!(sink.sent.lock().await.is_empty());
    }
}
