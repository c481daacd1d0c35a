// Tier assignment from fixed quantile cutoffs over the board's composite
// scores.

/// Tier for a player below every cutoff.
pub const LOWEST_TIER: u8 = 5;

/// (fraction of board, minimum index) for each cutoff, best tier first.
const CUTOFF_RULES: [(f64, usize); 4] = [(0.03, 10), (0.15, 30), (0.50, 0), (0.80, 0)];

/// Score thresholds for tiers 1-4; anything below the last is tier 5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierCutoffs {
    pub thresholds: [f64; 4],
}

impl TierCutoffs {
    /// Derive cutoffs from a board's composite scores.
    ///
    /// Each cutoff is the score at index `max(min_index, floor(n * fraction))`
    /// of the descending list. Indices are made non-decreasing and clamped
    /// to the last element, so thresholds never increase from tier to tier.
    /// Returns `None` for an empty board.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let n = sorted.len();

        let mut thresholds = [0.0; 4];
        let mut floor_idx = 0;
        for (slot, (fraction, min_index)) in thresholds.iter_mut().zip(CUTOFF_RULES) {
            let raw = ((n as f64 * fraction).floor() as usize).max(min_index);
            floor_idx = raw.max(floor_idx).min(n - 1);
            *slot = sorted[floor_idx];
        }
        Some(TierCutoffs { thresholds })
    }

    /// Tier 1 (best) through 5.
    pub fn tier_for(&self, score: f64) -> u8 {
        self.thresholds
            .iter()
            .position(|t| score >= *t)
            .map(|i| i as u8 + 1)
            .unwrap_or(LOWEST_TIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_cutoffs() {
        assert_eq!(TierCutoffs::from_scores(&[]), None);
    }

    #[test]
    fn small_board_clamps_to_last() {
        let cutoffs = TierCutoffs::from_scores(&[3.0, 1.0, 2.0]).unwrap();
        // Tier 1 and 2 indices (10, 30) clamp to index 2.
        assert_eq!(cutoffs.thresholds, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(cutoffs.tier_for(3.0), 1);
        assert_eq!(cutoffs.tier_for(1.0), 1);
        assert_eq!(cutoffs.tier_for(0.5), LOWEST_TIER);
    }

    #[test]
    fn hundred_player_board() {
        let scores: Vec<f64> = (0..100).map(|i| 100.0 - i as f64).collect();
        let cutoffs = TierCutoffs::from_scores(&scores).unwrap();
        // Indices 10, 30, 50, 80 of the descending list.
        assert_eq!(cutoffs.thresholds, [90.0, 70.0, 50.0, 20.0]);
        assert_eq!(cutoffs.tier_for(95.0), 1);
        assert_eq!(cutoffs.tier_for(90.0), 1);
        assert_eq!(cutoffs.tier_for(89.0), 2);
        assert_eq!(cutoffs.tier_for(50.0), 3);
        assert_eq!(cutoffs.tier_for(21.0), 4);
        assert_eq!(cutoffs.tier_for(5.0), 5);
    }

    #[test]
    fn thresholds_never_increase() {
        for n in 1..60 {
            let scores: Vec<f64> = (0..n).map(|i| ((i * 37) % 11) as f64).collect();
            let t = TierCutoffs::from_scores(&scores).unwrap().thresholds;
            assert!(t.windows(2).all(|w| w[0] >= w[1]), "n={n}: {t:?}");
        }
    }
}
