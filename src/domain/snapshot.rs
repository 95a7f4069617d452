use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::domain::PairInterval;
use crate::utils::{TimeUtils, epoch_ms_to_datetime_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum MacdStatus {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum EmaDirection {
    Rising,
    Falling,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Zone {
    #[strum(to_string = "Overbought at resistance")]
    OverboughtAtResistance,
    #[strum(to_string = "Oversold at support")]
    OversoldAtSupport,
    #[strum(to_string = "None")]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Signal {
    Buy,
    Sell,
    Alert,
    Neutral,
}

/// Everything the pipeline derived from one series at its latest candle.
/// Rebuilt from scratch every cycle, never carried across cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub pair_interval: PairInterval,
    pub open_time_ms: i64,
    pub price: f64,
    pub rsi: f64,
    pub ema_direction: EmaDirection,
    pub macd_status: MacdStatus,
    pub nearest_support: Option<f64>,
    pub nearest_resistance: Option<f64>,
    pub zone: Zone,
    pub signal: Signal,
}

impl IndicatorSnapshot {
    /// HTML alert text for the notification sink, or None for a Neutral signal.
    pub fn alert_text(&self) -> Option<String> {
        let (emoji, label) = match self.signal {
            Signal::Buy => ("🟢", "BUY"),
            Signal::Sell => ("🔴", "SELL"),
            Signal::Alert => ("🟡", "ZONE"),
            Signal::Neutral => return None,
        };

        let mut text = format!(
            "{emoji} <b>{label} ALERT</b>\n\n\
             <b>Pair:</b> {} ({})\n\
             <b>Price:</b> {}\n\
             <b>RSI:</b> {:.2}\n\
             <b>MACD:</b> {}\n\
             <b>EMA:</b> {}",
            self.pair_interval.name,
            TimeUtils::interval_to_string(self.pair_interval.interval_ms),
            format_price(self.price),
            self.rsi,
            self.macd_status,
            self.ema_direction,
        );

        // The zone line names the level the price is pressing against
        let zone_level = match self.zone {
            Zone::OverboughtAtResistance => self.nearest_resistance,
            Zone::OversoldAtSupport => self.nearest_support,
            Zone::None => None,
        };
        if let Some(level) = zone_level {
            text.push_str(&format!(
                "\n<b>Zone:</b> {} {}",
                self.zone,
                format_price(level)
            ));
        }

        text.push_str(&format!(
            "\n\n<b>Time:</b> {}",
            epoch_ms_to_datetime_string(self.open_time_ms)
        ));

        Some(text)
    }
}

/// Formats a price with "Trader Precision" adaptive decimals.
pub fn format_price(price: f64) -> String {
    if price == 0.0 {
        return "$0.00".to_string();
    }

    // Determine magnitude
    let abs_price = price.abs();

    if abs_price >= 1000.0 {
        format!("${:.2}", price)
    } else if abs_price >= 1.0 {
        format!("${:.4}", price)
    } else if abs_price >= 0.01 {
        format!("${:.5}", price)
    } else {
        format!("${:.8}", price)
    }
}
