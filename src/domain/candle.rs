use serde::{Deserialize, Serialize};

// One closed kline as retrieved from the exchange. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time_ms: i64,

    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,

    pub volume: f64,
}

// Implement methods for the Candle struct
impl Candle {
    // A constructor for convenience
    pub fn new(open_time_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Candle {
            open_time_ms,
            open_price: open,
            high_price: high,
            low_price: low,
            close_price: close,
            volume,
        }
    }
}
