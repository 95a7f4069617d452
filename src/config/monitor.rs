//! What to watch and how often

use crate::utils::TimeUtils;

#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    /// Total tries per entry per cycle, including the first one. 1 disables retry.
    pub max_attempts: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct MonitorConfig {
    /// Binance spot pairs, in notification order
    pub symbols: &'static [&'static str],
    /// Candle intervals analyzed per symbol (multi-timeframe when > 1)
    pub timeframes: &'static [i64],

    /// How many candles to request per series; must cover the slow MACD EMA warmup
    pub candle_limit: usize,

    pub cycle_interval_secs: u64,
    /// Pause between sequential data-supplier calls (rate-limit courtesy)
    pub inter_symbol_delay_ms: u64,
    /// Fan symbols out over tokio tasks instead of walking them in order
    pub concurrent_symbols: bool,

    pub retry: RetryConfig,
}

pub const MONITOR: MonitorConfig = MonitorConfig {
    symbols: &[
        "BTCUSDT", "ETHUSDT", "XRPUSDT", "BNBUSDT", "SOLUSDT", "DOGEUSDT", "TRXUSDT", "ADAUSDT",
        "LINKUSDT", "AVAXUSDT",
    ],
    timeframes: &[TimeUtils::MS_IN_15_MIN],

    candle_limit: 100,

    cycle_interval_secs: 15 * 60,
    inter_symbol_delay_ms: 1000,
    concurrent_symbols: false,

    retry: RetryConfig { max_attempts: 3 },
};
