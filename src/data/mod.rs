mod bn_kline;
mod provider;
mod rate_limiter;

pub use provider::{BinanceProvider, MarketDataProvider, fetch_with_retry};
pub use rate_limiter::GlobalRateLimiter;

pub(crate) use bn_kline::load_latest_klines;
