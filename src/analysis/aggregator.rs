// Runs the indicator pipeline across every configured symbol/timeframe and
// folds the findings into one cycle report.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, stream};
use itertools::Itertools;

use crate::analysis::indicators::{ema_direction, macd, rsi};
use crate::analysis::pivots::find_pivots;
use crate::analysis::zones::{classify_zone, nearest_level, signal_for};
use crate::config::{AnalysisConfig, BINANCE, MonitorConfig};
use crate::data::{MarketDataProvider, fetch_with_retry};
use crate::domain::{CandleSeries, IndicatorSnapshot, PairInterval};
use crate::utils::mean;

/// One cycle's findings: alert texts in symbol-then-timeframe order, plus the
/// average-RSI market verdict (present iff at least one RSI was computed).
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub alerts: Vec<String>,
    pub trend_summary: Option<String>,
}

impl CycleReport {
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty() && self.trend_summary.is_none()
    }

    /// The single text block handed to the notification sink.
    pub fn to_message(&self) -> String {
        let mut parts: Vec<&str> = self.alerts.iter().map(String::as_str).collect();
        if let Some(summary) = &self.trend_summary {
            parts.push(summary);
        }
        parts.join("\n\n")
    }
}

pub struct SignalAggregator {
    analysis: AnalysisConfig,
    monitor: MonitorConfig,
    provider: Arc<dyn MarketDataProvider>,
    /// Last analyzed candle open time per entry; suppresses duplicate alerts
    /// when polling faster than candles close. In-memory only.
    cycle_state: HashMap<PairInterval, i64>,
}

impl SignalAggregator {
    pub fn new(
        analysis: AnalysisConfig,
        monitor: MonitorConfig,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            analysis,
            monitor,
            provider,
            cycle_state: HashMap::new(),
        }
    }

    /// One full pass over the configured symbol list.
    pub async fn run_cycle(&mut self) -> CycleReport {
        log::info!(
            "🔍 Starting analysis cycle over {} symbols",
            self.monitor.symbols.len()
        );
        let snapshots = self.analyze_all().await;
        self.assemble_report(snapshots)
    }

    /// Collects snapshots without touching cycle state; `bin/analyze` uses this
    /// directly for one-shot table output.
    pub async fn analyze_all(&self) -> Vec<IndicatorSnapshot> {
        let entries = self.entries();
        if self.monitor.concurrent_symbols {
            self.collect_concurrent(&entries).await
        } else {
            self.collect_sequential(&entries).await
        }
    }

    fn entries(&self) -> Vec<PairInterval> {
        self.monitor
            .symbols
            .iter()
            .flat_map(|symbol| {
                self.monitor
                    .timeframes
                    .iter()
                    .map(move |tf| PairInterval::new(*symbol, *tf))
            })
            .collect()
    }

    async fn collect_sequential(&self, entries: &[PairInterval]) -> Vec<IndicatorSnapshot> {
        let mut snapshots = Vec::new();
        for (idx, pair_interval) in entries.iter().enumerate() {
            if idx > 0 && self.monitor.inter_symbol_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.monitor.inter_symbol_delay_ms)).await;
            }
            if let Some(snapshot) = self.analyze_entry(pair_interval).await {
                snapshots.push(snapshot);
            }
        }
        snapshots
    }

    // Bounded fan-out. `buffered` keeps completion order = entry order, so the
    // report ordering matches the sequential path.
    async fn collect_concurrent(&self, entries: &[PairInterval]) -> Vec<IndicatorSnapshot> {
        stream::iter(entries)
            .map(|pair_interval| self.analyze_entry(pair_interval))
            .buffered(BINANCE.limits.concurrent_tasks)
            .filter_map(|snapshot| async move { snapshot })
            .collect()
            .await
    }

    /// Fetch + analyze one entry. Every failure mode is contained here: it is
    /// logged and turned into `None` so the remaining entries always run.
    async fn analyze_entry(&self, pair_interval: &PairInterval) -> Option<IndicatorSnapshot> {
        let candles = match fetch_with_retry(
            self.provider.as_ref(),
            pair_interval,
            self.monitor.candle_limit,
            &self.monitor.retry,
        )
        .await
        {
            Ok(candles) => candles,
            Err(e) => {
                log::error!("❌ {}: candle fetch failed: {:#}", pair_interval, e);
                return None;
            }
        };

        let series = CandleSeries::new(pair_interval.clone(), candles);
        let Some(latest_open_time) = series.latest_open_time() else {
            log::warn!("{}: supplier returned no candles", pair_interval);
            return None;
        };

        if self.cycle_state.get(pair_interval) == Some(&latest_open_time) {
            log::debug!(
                "{}: no new candle since last cycle (open time {}), skipping",
                pair_interval,
                latest_open_time
            );
            return None;
        }

        Some(self.snapshot_from_series(&series, latest_open_time))
    }

    fn snapshot_from_series(
        &self,
        series: &CandleSeries,
        latest_open_time: i64,
    ) -> IndicatorSnapshot {
        let cfg = &self.analysis;
        let closes = series.close_prices();
        let price = closes.last().copied().unwrap_or(0.0);

        let rsi_value = rsi(&closes, cfg.rsi_period, cfg.rsi_averaging);
        let pivots = find_pivots(
            &series.high_prices(),
            &series.low_prices(),
            cfg.pivot_window,
            cfg.level_dedup_pct,
        );
        let zone = classify_zone(price, rsi_value, &pivots.supports, &pivots.resistances, cfg);

        IndicatorSnapshot {
            pair_interval: series.pair_interval.clone(),
            open_time_ms: latest_open_time,
            price,
            rsi: rsi_value,
            ema_direction: ema_direction(&closes, cfg.ema_period),
            macd_status: macd(&closes, &cfg.macd).status(),
            nearest_support: nearest_level(price, &pivots.supports),
            nearest_resistance: nearest_level(price, &pivots.resistances),
            zone,
            signal: signal_for(zone, rsi_value, cfg),
        }
    }

    fn assemble_report(&mut self, snapshots: Vec<IndicatorSnapshot>) -> CycleReport {
        let mut alerts = Vec::new();
        for snapshot in &snapshots {
            self.cycle_state
                .insert(snapshot.pair_interval.clone(), snapshot.open_time_ms);
            if let Some(text) = snapshot.alert_text() {
                log::info!(
                    "{} signal for {}",
                    snapshot.signal,
                    snapshot.pair_interval
                );
                alerts.push(text);
            }
        }

        // Per-symbol RSI means first (snapshots arrive grouped by symbol), then
        // one verdict over the per-symbol means
        let grouped = snapshots.iter().chunk_by(|s| s.pair_interval.name.clone());
        let mut symbol_means: Vec<(String, f64)> = Vec::new();
        for (symbol, group) in &grouped {
            let rsis: Vec<f64> = group.map(|s| s.rsi).collect();
            symbol_means.push((symbol, mean(&rsis)));
        }

        let trend_summary = if symbol_means.is_empty() {
            None
        } else {
            Some(self.trend_summary_text(&symbol_means))
        };

        CycleReport {
            alerts,
            trend_summary,
        }
    }

    fn trend_summary_text(&self, symbol_means: &[(String, f64)]) -> String {
        let means: Vec<f64> = symbol_means.iter().map(|(_, r)| *r).collect();
        let overall = mean(&means);

        let verdict = if overall <= self.analysis.trend_oversold {
            "oversold (reversal watch)"
        } else if overall >= self.analysis.trend_overbought {
            "overbought (correction watch)"
        } else {
            "neutral"
        };

        let mut text = format!(
            "📊 <b>Market pulse:</b> average RSI {:.1}, {}",
            overall, verdict
        );
        if self.monitor.timeframes.len() > 1 {
            for (symbol, avg) in symbol_means {
                text.push_str(&format!("\n• {}: RSI {:.1}", symbol, avg));
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ANALYSIS, MONITOR, RetryConfig};
    use crate::domain::Candle;
    use crate::utils::TimeUtils;
    use anyhow::{Result, bail};
    use async_trait::async_trait;

    /// Serves a fixed candle set for every symbol except the ones it is told
    /// to fail.
    struct StaticProvider {
        candles: Vec<Candle>,
        failing: &'static [&'static str],
    }

    #[async_trait]
    impl MarketDataProvider for StaticProvider {
        async fn fetch_candles(
            &self,
            pair_interval: &PairInterval,
            _limit: usize,
        ) -> Result<Vec<Candle>> {
            if self.failing.contains(&pair_interval.name()) {
                bail!("synthetic network failure for {}", pair_interval);
            }
            Ok(self.candles.clone())
        }
    }

    fn rising_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = (i + 1) as f64;
                Candle::new(
                    1_700_000_000_000 + i as i64 * TimeUtils::MS_IN_15_MIN,
                    close - 0.2,
                    close + 0.5,
                    close - 0.5,
                    close,
                    10.0,
                )
            })
            .collect()
    }

    fn test_monitor(symbols: &'static [&'static str]) -> MonitorConfig {
        MonitorConfig {
            symbols,
            inter_symbol_delay_ms: 0,
            retry: RetryConfig { max_attempts: 1 },
            ..MONITOR
        }
    }

    fn aggregator(
        symbols: &'static [&'static str],
        failing: &'static [&'static str],
    ) -> SignalAggregator {
        let provider = Arc::new(StaticProvider {
            candles: rising_candles(20),
            failing,
        });
        let analysis = AnalysisConfig {
            rsi_period: 15,
            ..ANALYSIS
        };
        SignalAggregator::new(analysis, test_monitor(symbols), provider)
    }

    #[tokio::test]
    async fn straight_uptrend_produces_a_sell_alert_and_overbought_verdict() {
        let mut agg = aggregator(&["BTCUSDT"], &[]);
        let report = agg.run_cycle().await;

        assert_eq!(report.alerts.len(), 1);
        assert!(report.alerts[0].contains("SELL"));
        assert!(report.alerts[0].contains("BTCUSDT"));
        assert!(report.alerts[0].contains("RSI:</b> 100.00"));

        let summary = report.trend_summary.expect("summary must be present");
        assert!(summary.contains("overbought"));
    }

    #[tokio::test]
    async fn alert_count_never_exceeds_entry_count() {
        let mut agg = aggregator(&["BTCUSDT", "ETHUSDT", "XRPUSDT"], &[]);
        let report = agg.run_cycle().await;
        assert!(report.alerts.len() <= 3);
    }

    #[tokio::test]
    async fn repeated_cycle_on_the_same_candle_is_skipped() {
        let mut agg = aggregator(&["BTCUSDT"], &[]);

        let first = agg.run_cycle().await;
        assert!(!first.is_empty());

        // Same latest open_time again: no alert, and no RSI enters the average
        let second = agg.run_cycle().await;
        assert!(second.alerts.is_empty());
        assert!(second.trend_summary.is_none());
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn one_failing_symbol_does_not_abort_the_rest() {
        let mut agg = aggregator(&["AAAUSDT", "BBBUSDT"], &["AAAUSDT"]);
        let report = agg.run_cycle().await;

        assert_eq!(report.alerts.len(), 1);
        assert!(report.alerts[0].contains("BBBUSDT"));
        assert!(report.trend_summary.is_some());
    }

    #[tokio::test]
    async fn empty_symbol_list_produces_an_empty_report() {
        let mut agg = aggregator(&[], &[]);
        let report = agg.run_cycle().await;
        assert!(report.alerts.is_empty());
        assert!(report.trend_summary.is_none());
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn concurrent_mode_preserves_symbol_order() {
        let provider = Arc::new(StaticProvider {
            candles: rising_candles(20),
            failing: &[],
        });
        let monitor = MonitorConfig {
            concurrent_symbols: true,
            ..test_monitor(&["BTCUSDT", "ETHUSDT"])
        };
        let analysis = AnalysisConfig {
            rsi_period: 15,
            ..ANALYSIS
        };
        let mut agg = SignalAggregator::new(analysis, monitor, provider);

        let report = agg.run_cycle().await;
        assert_eq!(report.alerts.len(), 2);
        assert!(report.alerts[0].contains("BTCUSDT"));
        assert!(report.alerts[1].contains("ETHUSDT"));
    }
}
