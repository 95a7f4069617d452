// Pure indicator maths over close-price columns. No I/O in this module.

use itertools::Itertools;

use crate::config::{MacdPeriods, RsiAveraging};
use crate::domain::{EmaDirection, MacdStatus};
use crate::utils::mean;

/// RSI reported when a series is too short to measure momentum.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Exponential moving average, same length as the input and aligned with it.
/// Seeded from the first element (no warmup gap), weight factor 2/(period+1).
pub fn ema(series: &[f64], period: usize) -> Vec<f64> {
    if series.is_empty() || period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(series.len());
    let mut prev = series[0];
    out.push(prev);
    for value in &series[1..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}

/// Relative Strength Index at the latest point of `closes`.
///
/// Gain/loss averaging follows `averaging`: a rolling mean over the last
/// `period` deltas, or Wilder's smoothed mean over the whole delta history.
/// Degrades to [NEUTRAL_RSI] when fewer than `period + 1` closes are supplied;
/// saturates to 100 when the series never lost (avg_loss of zero is not an error).
pub fn rsi(closes: &[f64], period: usize, averaging: RsiAveraging) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let deltas: Vec<f64> = closes.iter().tuple_windows().map(|(a, b)| b - a).collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    let (avg_gain, avg_loss) = match averaging {
        RsiAveraging::Simple => {
            let tail = deltas.len() - period;
            (mean(&gains[tail..]), mean(&losses[tail..]))
        }
        RsiAveraging::Exponential => {
            (wilder_smooth(&gains, period), wilder_smooth(&losses, period))
        }
    };

    if avg_loss == 0.0 {
        // RS would be unbounded; saturate rather than propagate a NaN
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// Wilder smoothing: simple mean over the first `period` values, then
// avg = (avg * (period - 1) + value) / period for the remainder.
fn wilder_smooth(values: &[f64], period: usize) -> f64 {
    debug_assert!(values.len() >= period && period > 0);
    let mut avg = mean(&values[..period]);
    for value in &values[period..] {
        avg = (avg * (period - 1) as f64 + value) / period as f64;
    }
    avg
}

#[derive(Debug, Clone)]
pub struct MacdOutput {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdOutput {
    pub fn status(&self) -> MacdStatus {
        match (self.macd_line.last(), self.signal_line.last()) {
            (Some(m), Some(s)) if m > s => MacdStatus::Bullish,
            _ => MacdStatus::Bearish,
        }
    }
}

/// MACD: fast EMA minus slow EMA, a signal EMA over that, and their gap.
pub fn macd(closes: &[f64], periods: &MacdPeriods) -> MacdOutput {
    let fast = ema(closes, periods.fast);
    let slow = ema(closes, periods.slow);
    let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = ema(&macd_line, periods.signal);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdOutput {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Direction of the EMA at its latest point, from its last two values.
pub fn ema_direction(closes: &[f64], period: usize) -> EmaDirection {
    let series = ema(closes, period);
    match series.as_slice() {
        [.., prev, last] => {
            if last > prev {
                EmaDirection::Rising
            } else if last < prev {
                EmaDirection::Falling
            } else {
                EmaDirection::Flat
            }
        }
        _ => EmaDirection::Flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ANALYSIS;

    fn rising_closes(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn rsi_is_neutral_when_series_too_short() {
        for averaging in [RsiAveraging::Simple, RsiAveraging::Exponential] {
            let closes = rising_closes(14); // one short of period + 1
            assert_eq!(rsi(&closes, 14, averaging), NEUTRAL_RSI);
            assert_eq!(rsi(&[], 14, averaging), NEUTRAL_RSI);
        }
    }

    #[test]
    fn rsi_saturates_at_100_when_series_never_loses() {
        for averaging in [RsiAveraging::Simple, RsiAveraging::Exponential] {
            let value = rsi(&rising_closes(20), 15, averaging);
            assert_eq!(value, 100.0);
            assert!(!value.is_nan());
        }
    }

    #[test]
    fn rsi_of_flat_series_saturates_not_nan() {
        let closes = vec![42.0; 30];
        let value = rsi(&closes, 14, RsiAveraging::Exponential);
        assert_eq!(value, 100.0);
    }

    #[test]
    fn rsi_stays_in_band_for_mixed_series() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + if i % 2 == 0 { 3.0 } else { -2.0 })
            .collect();
        for averaging in [RsiAveraging::Simple, RsiAveraging::Exponential] {
            let value = rsi(&closes, 14, averaging);
            assert!(value > 0.0 && value < 100.0, "rsi was {value}");
        }
    }

    #[test]
    fn ema_is_same_length_and_seeded_from_first_element() {
        let closes = rising_closes(30);
        let out = ema(&closes, 12);
        assert_eq!(out.len(), closes.len());
        assert_eq!(out[0], closes[0]);
    }

    #[test]
    fn ema_of_constant_series_is_constant() {
        let out = ema(&[7.5; 20], 5);
        assert!(out.iter().all(|v| (v - 7.5).abs() < 1e-12));
    }

    #[test]
    fn macd_is_bullish_on_an_uptrend_and_bearish_on_a_downtrend() {
        let up = rising_closes(60);
        assert_eq!(macd(&up, &ANALYSIS.macd).status(), MacdStatus::Bullish);

        let down: Vec<f64> = (1..=60).rev().map(|i| i as f64).collect();
        assert_eq!(macd(&down, &ANALYSIS.macd).status(), MacdStatus::Bearish);
    }

    #[test]
    fn ema_direction_tracks_the_trend() {
        assert_eq!(ema_direction(&rising_closes(20), 5), EmaDirection::Rising);

        let down: Vec<f64> = (1..=20).rev().map(|i| i as f64).collect();
        assert_eq!(ema_direction(&down, 5), EmaDirection::Falling);

        assert_eq!(ema_direction(&[1.0], 5), EmaDirection::Flat);
    }
}
