// Domain types and value objects
mod candle;
mod level;
mod pair_interval;
mod series;
mod snapshot;

// Re-export commonly used types
pub use candle::Candle;
pub use level::{LevelKind, PriceLevel};
pub use pair_interval::PairInterval;
pub use series::CandleSeries;
pub use snapshot::{
    EmaDirection, IndicatorSnapshot, MacdStatus, Signal, Zone, format_price,
};
