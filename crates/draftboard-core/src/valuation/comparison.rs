// Secondary metrics: how each composite compares to the rest of its group.

use crate::positions::RoleGroup;
use crate::records::Snapshot;
use crate::valuation::composite::RankedPlayer;
use crate::valuation::rank::{percentile_ranks, quantile};
use crate::valuation::zscore::zscores;

/// Quantile of the group's composites used as the replacement level.
pub const REPLACEMENT_QUANTILE: f64 = 0.25;

/// Fill position z-score, percentile, and value above replacement for every
/// player, per role group and snapshot. Only players scored in a snapshot
/// form that snapshot's comparison population; the rest keep zeros.
pub fn apply_comparisons(players: &mut [RankedPlayer]) {
    for group in [RoleGroup::Hitter, RoleGroup::Pitcher] {
        for snapshot in Snapshot::ALL {
            let members: Vec<usize> = players
                .iter()
                .enumerate()
                .filter(|(_, p)| p.group == group && p.score(snapshot).qualified)
                .map(|(i, _)| i)
                .collect();
            if members.is_empty() {
                continue;
            }

            let composites: Vec<f64> = members
                .iter()
                .map(|&i| players[i].score(snapshot).composite)
                .collect();
            let z = zscores(&composites);
            let pct = percentile_ranks(&composites);
            let replacement = quantile(&composites, REPLACEMENT_QUANTILE).unwrap_or(0.0);

            for (k, &i) in members.iter().enumerate() {
                let score = players[i].score_mut(snapshot);
                score.position_zscore = z[k];
                score.percentile = pct[k];
                score.value_above_replacement = score.composite - replacement;
            }
        }
    }
}
