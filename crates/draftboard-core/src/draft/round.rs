// Suggested draft round: blend market ADP with the adjusted rank, pull
// further toward value, then bound how far the pick may drift from ADP.

use crate::config::{Bracket, RoundConfig};

/// Suggested overall pick, before converting to a round.
///
/// `base = adp_weight * adp + rank_weight * adjusted_rank`, plus
/// `factor(adp) * vadp`, clamped to `adp +/- cap(adp) * adp`.
pub fn suggested_pick(adp: f64, adjusted_rank: f64, vadp: f64, config: &RoundConfig) -> f64 {
    let base = config.adp_weight * adp + config.rank_weight * adjusted_rank;
    let pick = base + Bracket::lookup(&config.vadp_factors, adp) * vadp;

    let max_move = adp * Bracket::lookup(&config.movement_caps, adp);
    if max_move >= 0.0 {
        pick.clamp(adp - max_move, adp + max_move)
    } else {
        pick
    }
}

/// Round number for a pick: `ceil(pick / picks_per_round)`.
///
/// The result is floored at round 1. A blended pick can land at or below
/// zero when a very early ADP is pulled further forward by value, and a
/// zero or negative round has no meaning on a draft board, so those picks
/// report round 1 instead. A `picks_per_round` of 0 is treated as 1.
pub fn round_for_pick(pick: f64, picks_per_round: u32) -> u32 {
    let per_round = f64::from(picks_per_round.max(1));
    ((pick / per_round).ceil() as u32).max(1)
}

/// Suggested round, or `None` when any input is missing or not finite.
pub fn suggested_round(
    adp: Option<f64>,
    adjusted_rank: Option<f64>,
    vadp: Option<f64>,
    config: &RoundConfig,
) -> Option<u32> {
    let (adp, rank, vadp) = (adp?, adjusted_rank?, vadp?);
    if !(adp.is_finite() && rank.is_finite() && vadp.is_finite()) {
        return None;
    }
    let pick = suggested_pick(adp, rank, vadp, config);
    Some(round_for_pick(pick, config.picks_per_round))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn blend_within_cap() {
        let cfg = RoundConfig::default();
        // adp 40, rank 38, vadp -2: base 39.4, +0.1*-2 = 39.2, cap +/-12.
        assert!(approx_eq(suggested_pick(40.0, 38.0, -2.0, &cfg), 39.2));
    }

    #[test]
    fn movement_is_capped() {
        let cfg = RoundConfig::default();
        // adp 150, rank 10, vadp -140: base 108, +0.3*-140 = 66; cap 15.
        assert!(approx_eq(suggested_pick(150.0, 10.0, -140.0, &cfg), 135.0));
        // adp 20, rank 200: cap 6.
        assert!(approx_eq(suggested_pick(20.0, 200.0, 180.0, &cfg), 26.0));
    }

    #[test]
    fn round_is_ceiling_of_pick() {
        assert_eq!(round_for_pick(10.0, 10), 1);
        assert_eq!(round_for_pick(10.5, 10), 2);
        assert_eq!(round_for_pick(0.2, 10), 1);
    }

    #[test]
    fn non_positive_pick_floors_at_round_one() {
        assert_eq!(round_for_pick(0.0, 10), 1);
        assert_eq!(round_for_pick(-3.0, 10), 1);
        assert_eq!(round_for_pick(-25.0, 12), 1);
        assert_eq!(round_for_pick(7.0, 0), 7);
    }

    #[test]
    fn missing_input_gives_none() {
        let cfg = RoundConfig::default();
        assert_eq!(suggested_round(None, Some(5.0), Some(1.0), &cfg), None);
        assert_eq!(suggested_round(Some(5.0), Some(5.0), None, &cfg), None);
        assert_eq!(suggested_round(Some(f64::NAN), Some(5.0), Some(1.0), &cfg), None);
        assert_eq!(suggested_round(Some(40.0), Some(38.0), Some(-2.0), &cfg), Some(4));
    }
}
