//! Configuration module for the signal-sniper service.

// Can all be private because we have a public re-export.
mod analysis;
mod binance;
mod monitor;
mod telegram;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig, MacdPeriods, RsiAveraging};
pub use binance::{BINANCE, BinanceApiConfig};
pub use monitor::{MONITOR, MonitorConfig, RetryConfig};
pub use telegram::{ConfigError, TELEGRAM_API_BASE, TelegramConfig};
