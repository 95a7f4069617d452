#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod notify;
pub mod utils;

// Re-export commonly used types outside of crate (for the bins)
pub use analysis::{CycleReport, SignalAggregator};
pub use data::{BinanceProvider, GlobalRateLimiter, MarketDataProvider};
pub use domain::{IndicatorSnapshot, PairInterval};
pub use engine::MonitorEngine;
pub use notify::{NotificationSink, StdoutSink, TelegramSink};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run a single analysis cycle and exit
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Print the cycle report to stdout instead of sending it to Telegram
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Fan the symbol list out over concurrent tasks instead of walking it in order
    #[arg(long, default_value_t = false)]
    pub concurrent: bool,
}
