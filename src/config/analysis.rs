//! Analysis and computation configuration

use serde::{Deserialize, Serialize};

/// How RSI averages its gains and losses.
/// Exponential (Wilder smoothing) reacts faster to the newest candle and is the
/// default; Simple is a plain rolling mean over the last `period` deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RsiAveraging {
    Simple,
    #[default]
    Exponential,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MacdPeriods {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// The Master Analysis Configuration
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub rsi_period: usize,
    pub rsi_averaging: RsiAveraging,
    pub ema_period: usize,
    pub macd: MacdPeriods,

    /// Half-width of the sliding window used for pivot detection
    pub pivot_window: usize,
    /// Two same-kind levels closer than this (fractional) are merged into one
    pub level_dedup_pct: f64,
    /// Price counts as "near" a level below this fractional distance
    pub level_proximity_pct: f64,

    // RSI bands for per-series signals
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,

    // Average-RSI bands for the whole-market verdict
    pub trend_overbought: f64,
    pub trend_oversold: f64,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    rsi_period: 14,
    rsi_averaging: RsiAveraging::Exponential,
    ema_period: 14,
    macd: MacdPeriods {
        fast: 12,
        slow: 26,
        signal: 9,
    },

    pivot_window: 5,
    level_dedup_pct: 0.005,    // 0.5%
    level_proximity_pct: 0.003, // 0.3%

    rsi_overbought: 70.0,
    rsi_oversold: 30.0,

    trend_overbought: 65.0,
    trend_oversold: 35.0,
};
