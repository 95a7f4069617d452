use serde::{Deserialize, Serialize};

use crate::domain::{Candle, PairInterval};

/// Ordered candles for one (pair, interval). Ascending open time, unique timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandleSeries {
    pub pair_interval: PairInterval,
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(pair_interval: PairInterval, candles: Vec<Candle>) -> Self {
        debug_assert!(
            candles.windows(2).all(|w| w[0].open_time_ms < w[1].open_time_ms),
            "candles must be ascending and unique by open time"
        );
        Self {
            pair_interval,
            candles,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn latest_open_time(&self) -> Option<i64> {
        self.candles.last().map(|c| c.open_time_ms)
    }

    // Column accessors for the indicator layer
    pub fn close_prices(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close_price).collect()
    }

    pub fn high_prices(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high_price).collect()
    }

    pub fn low_prices(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low_price).collect()
    }
}
