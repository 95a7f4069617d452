// Combines price, RSI and pivot levels into a qualitative zone reading.

use crate::config::AnalysisConfig;
use crate::domain::{PriceLevel, Signal, Zone};

/// Price counts as near a level when within `proximity_pct` of it (fractional,
/// relative to the level).
pub fn is_near_level(price: f64, level: f64, proximity_pct: f64) -> bool {
    level > 0.0 && (price - level).abs() / level < proximity_pct
}

fn near_any(price: f64, levels: &[PriceLevel], proximity_pct: f64) -> bool {
    levels
        .iter()
        .any(|l| is_near_level(price, l.price, proximity_pct))
}

/// First match wins: overbought pressing a resistance, then oversold sitting
/// on a support, else no zone. RSI strictly inside the bands never produces a
/// zone regardless of proximity.
pub fn classify_zone(
    price: f64,
    rsi: f64,
    supports: &[PriceLevel],
    resistances: &[PriceLevel],
    cfg: &AnalysisConfig,
) -> Zone {
    if rsi >= cfg.rsi_overbought && near_any(price, resistances, cfg.level_proximity_pct) {
        return Zone::OverboughtAtResistance;
    }
    if rsi <= cfg.rsi_oversold && near_any(price, supports, cfg.level_proximity_pct) {
        return Zone::OversoldAtSupport;
    }
    Zone::None
}

/// Plain RSI-threshold signal, used when no zone was found.
pub fn fallback_signal(rsi: f64, cfg: &AnalysisConfig) -> Signal {
    if rsi >= cfg.rsi_overbought {
        Signal::Sell
    } else if rsi <= cfg.rsi_oversold {
        Signal::Buy
    } else {
        Signal::Neutral
    }
}

/// A zone finding outranks the plain threshold signal in what gets reported.
pub fn signal_for(zone: Zone, rsi: f64, cfg: &AnalysisConfig) -> Signal {
    if zone != Zone::None {
        Signal::Alert
    } else {
        fallback_signal(rsi, cfg)
    }
}

/// The level closest to `price`, for alert wording and the analyze table.
pub fn nearest_level(price: f64, levels: &[PriceLevel]) -> Option<f64> {
    levels
        .iter()
        .map(|l| l.price)
        .min_by(|a, b| (a - price).abs().total_cmp(&(b - price).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ANALYSIS;
    use crate::domain::LevelKind;

    fn levels(kind: LevelKind, prices: &[f64]) -> Vec<PriceLevel> {
        prices.iter().map(|&p| PriceLevel::new(p, kind)).collect()
    }

    #[test]
    fn neutral_rsi_never_produces_a_zone() {
        let supports = levels(LevelKind::Support, &[100.0]);
        let resistances = levels(LevelKind::Resistance, &[100.0]);
        // Price exactly on both levels: proximity alone must not trigger
        for rsi in 31..70 {
            let zone = classify_zone(100.0, rsi as f64, &supports, &resistances, &ANALYSIS);
            assert_eq!(zone, Zone::None, "rsi {rsi}");
        }
    }

    #[test]
    fn overbought_near_resistance_is_flagged() {
        let resistances = levels(LevelKind::Resistance, &[100.0]);
        let zone = classify_zone(100.2, 75.0, &[], &resistances, &ANALYSIS);
        assert_eq!(zone, Zone::OverboughtAtResistance);

        // Same RSI but price well away from the level
        let zone = classify_zone(90.0, 75.0, &[], &resistances, &ANALYSIS);
        assert_eq!(zone, Zone::None);
    }

    #[test]
    fn oversold_near_support_is_flagged() {
        let supports = levels(LevelKind::Support, &[50.0]);
        let zone = classify_zone(50.1, 25.0, &supports, &[], &ANALYSIS);
        assert_eq!(zone, Zone::OversoldAtSupport);
    }

    #[test]
    fn fallback_signal_follows_the_rsi_bands() {
        assert_eq!(fallback_signal(75.0, &ANALYSIS), Signal::Sell);
        assert_eq!(fallback_signal(25.0, &ANALYSIS), Signal::Buy);
        assert_eq!(fallback_signal(50.0, &ANALYSIS), Signal::Neutral);
        // Band edges belong to the alert side
        assert_eq!(fallback_signal(70.0, &ANALYSIS), Signal::Sell);
        assert_eq!(fallback_signal(30.0, &ANALYSIS), Signal::Buy);
    }

    #[test]
    fn zone_outranks_the_fallback() {
        assert_eq!(
            signal_for(Zone::OverboughtAtResistance, 75.0, &ANALYSIS),
            Signal::Alert
        );
        assert_eq!(signal_for(Zone::None, 75.0, &ANALYSIS), Signal::Sell);
    }

    #[test]
    fn nearest_level_picks_the_closest() {
        let all = levels(LevelKind::Resistance, &[90.0, 101.0, 120.0]);
        assert_eq!(nearest_level(100.0, &all), Some(101.0));
        assert_eq!(nearest_level(100.0, &[]), None);
    }
}
