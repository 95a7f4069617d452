// Local-extrema support/resistance detection over high/low columns.

use crate::domain::{LevelKind, PriceLevel};
use crate::utils::{get_max, get_min};

#[derive(Debug, Clone, Default)]
pub struct PivotLevels {
    /// Ascending, deduplicated
    pub supports: Vec<PriceLevel>,
    /// Ascending, deduplicated
    pub resistances: Vec<PriceLevel>,
}

/// Scans every index whose full window fits inside the series: `i` is a
/// resistance candidate when `high[i]` equals the max of the inclusive window
/// `[i-w, i+w]`, a support candidate when `low[i]` equals the window min.
/// Ties all qualify; the dedup pass resolves them. Series shorter than
/// `2w + 1` produce no levels (not an error).
pub fn find_pivots(highs: &[f64], lows: &[f64], window: usize, min_separation: f64) -> PivotLevels {
    debug_assert_eq!(highs.len(), lows.len());

    let len = highs.len();
    if window == 0 || len < 2 * window + 1 {
        return PivotLevels::default();
    }

    let mut resistance_candidates = Vec::new();
    let mut support_candidates = Vec::new();
    for i in window..len - window {
        let bounds = i - window..i + window + 1;
        if highs[i] == get_max(&highs[bounds.clone()]) {
            resistance_candidates.push(highs[i]);
        }
        if lows[i] == get_min(&lows[bounds]) {
            support_candidates.push(lows[i]);
        }
    }

    PivotLevels {
        supports: dedup_levels(support_candidates, min_separation)
            .into_iter()
            .map(|p| PriceLevel::new(p, LevelKind::Support))
            .collect(),
        resistances: dedup_levels(resistance_candidates, min_separation)
            .into_iter()
            .map(|p| PriceLevel::new(p, LevelKind::Resistance))
            .collect(),
    }
}

/// Sorts ascending and keeps a level only when it sits more than
/// `min_separation` (fractional, relative to the smaller of the pair) above the
/// last kept one. Idempotent: re-running on its own output changes nothing.
pub fn dedup_levels(mut levels: Vec<f64>, min_separation: f64) -> Vec<f64> {
    levels.sort_by(|a, b| a.total_cmp(b));

    let mut kept: Vec<f64> = Vec::with_capacity(levels.len());
    for level in levels {
        match kept.last() {
            Some(last) if (level - last) / last <= min_separation => {}
            _ => kept.push(level),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEPARATION: f64 = 0.005;

    #[test]
    fn finds_an_obvious_peak_and_trough() {
        // One spike up at index 7, one dip down at index 14
        let mut highs = vec![100.0; 21];
        let mut lows = vec![99.0; 21];
        highs[7] = 110.0;
        lows[14] = 90.0;

        let pivots = find_pivots(&highs, &lows, 5, SEPARATION);
        assert!(pivots.resistances.iter().any(|l| l.price == 110.0));
        assert!(pivots.supports.iter().any(|l| l.price == 90.0));
    }

    #[test]
    fn short_or_empty_series_yield_no_levels() {
        let pivots = find_pivots(&[], &[], 5, SEPARATION);
        assert!(pivots.supports.is_empty() && pivots.resistances.is_empty());

        let highs = vec![1.0; 10]; // below the 2w + 1 minimum for w = 5
        let lows = vec![1.0; 10];
        let pivots = find_pivots(&highs, &lows, 5, SEPARATION);
        assert!(pivots.supports.is_empty() && pivots.resistances.is_empty());
    }

    #[test]
    fn monotonic_series_has_no_interior_pivots() {
        let highs: Vec<f64> = (1..=30).map(|i| i as f64 + 0.5).collect();
        let lows: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let pivots = find_pivots(&highs, &lows, 5, SEPARATION);
        assert!(pivots.resistances.is_empty());
        assert!(pivots.supports.is_empty());
    }

    #[test]
    fn dedup_merges_near_duplicates_and_keeps_distinct_levels() {
        let levels = vec![100.0, 100.3, 105.0, 100.1];
        let kept = dedup_levels(levels, SEPARATION);
        assert_eq!(kept, vec![100.0, 105.0]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let levels = vec![50.0, 50.1, 50.2, 52.0, 52.1, 60.0];
        let once = dedup_levels(levels, SEPARATION);
        let twice = dedup_levels(once.clone(), SEPARATION);
        assert_eq!(once, twice);
    }

    #[test]
    fn dedup_never_keeps_a_pair_within_the_separation() {
        let levels: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.1).collect();
        let kept = dedup_levels(levels, SEPARATION);
        for pair in kept.windows(2) {
            assert!(
                (pair[1] - pair[0]) / pair[0] > SEPARATION,
                "{} and {} are too close",
                pair[0],
                pair[1]
            );
        }
    }
}
