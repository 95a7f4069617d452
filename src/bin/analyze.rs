// One-shot analysis: run the pipeline across the configured symbols once and
// print the snapshots as a table. No notification delivery.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tabled::{Table, Tabled, settings::Style};

use signal_sniper::config::{ANALYSIS, BINANCE, MONITOR};
use signal_sniper::domain::format_price;
use signal_sniper::utils::TimeUtils;
use signal_sniper::{BinanceProvider, GlobalRateLimiter, SignalAggregator};

#[derive(Parser, Debug)]
#[command(about = "Run one analysis pass and print the snapshot table")]
struct AnalyzeCli {
    /// Fan the symbol list out over concurrent tasks
    #[arg(long, default_value_t = false)]
    concurrent: bool,
}

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "TF")]
    timeframe: &'static str,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "RSI")]
    rsi: String,
    #[tabled(rename = "EMA")]
    ema: String,
    #[tabled(rename = "MACD")]
    macd: String,
    #[tabled(rename = "Support")]
    support: String,
    #[tabled(rename = "Resistance")]
    resistance: String,
    #[tabled(rename = "Signal")]
    signal: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .init();

    let args = AnalyzeCli::parse();

    let mut monitor = MONITOR;
    monitor.concurrent_symbols = args.concurrent;

    let provider = Arc::new(BinanceProvider::new(GlobalRateLimiter::new(
        BINANCE.limits.weight_limit_minute,
    )));
    let aggregator = SignalAggregator::new(ANALYSIS, monitor, provider);

    let snapshots = aggregator.analyze_all().await;
    let rows: Vec<SnapshotRow> = snapshots
        .iter()
        .map(|s| SnapshotRow {
            pair: s.pair_interval.name.clone(),
            timeframe: TimeUtils::interval_to_string(s.pair_interval.interval_ms),
            price: format_price(s.price),
            rsi: format!("{:.1}", s.rsi),
            ema: s.ema_direction.to_string(),
            macd: s.macd_status.to_string(),
            support: s
                .nearest_support
                .map(format_price)
                .unwrap_or_else(|| "-".into()),
            resistance: s
                .nearest_resistance
                .map(format_price)
                .unwrap_or_else(|| "-".into()),
            signal: s.signal.to_string(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
