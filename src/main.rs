use std::{panic, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;

use signal_sniper::config::{ANALYSIS, BINANCE, MONITOR, TelegramConfig};
use signal_sniper::{
    BinanceProvider, Cli, GlobalRateLimiter, MonitorEngine, NotificationSink, SignalAggregator,
    StdoutSink, TelegramSink,
};

#[tokio::main]
async fn main() -> Result<()> {
    panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        log::error!("CRITICAL PANIC:\n{}\nStack Trace:\n{}", info, backtrace);
    }));

    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Info)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("signal_sniper"), my_code_level)
        .init();

    let args = Cli::parse();

    // Missing credentials must fail here, not after the first cycle
    let sink: Arc<dyn NotificationSink> = if args.dry_run {
        Arc::new(StdoutSink)
    } else {
        let telegram = TelegramConfig::from_env()?;
        Arc::new(TelegramSink::new(telegram)?)
    };

    let provider = Arc::new(BinanceProvider::new(GlobalRateLimiter::new(
        BINANCE.limits.weight_limit_minute,
    )));

    let mut monitor = MONITOR;
    monitor.concurrent_symbols = args.concurrent;

    let aggregator = SignalAggregator::new(ANALYSIS, monitor, provider);
    let mut engine = MonitorEngine::new(
        aggregator,
        sink,
        Duration::from_secs(monitor.cycle_interval_secs),
    );

    if args.once {
        engine.run_once().await;
        return Ok(());
    }

    log::info!(
        "🤖 Monitor started: {} symbols, cycle every {}s",
        monitor.symbols.len(),
        monitor.cycle_interval_secs
    );
    engine.run().await;
    Ok(())
}
