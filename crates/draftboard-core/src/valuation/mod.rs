// Valuation engine: record merge per role group, composite scoring, and
// comparison metrics.

pub mod comparison;
pub mod composite;
pub mod rank;
pub mod zscore;

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::ScoringConfig;
use crate::identity::PlayerKey;
use crate::merge::merge_records;
use crate::positions::{classify_slots, RoleGroup};
use crate::records::{PlayerRecord, RosterRecord, StatMatch, StatRecord};

pub use composite::{rank_players, RankedPlayer, SnapshotScore};

/// Full valuation pass: split the roster by role group, merge each half with
/// its stat table, then score and rank everything.
///
/// Two-way players are merged with the pitcher table. Players with no
/// recognised position go with the hitters. Each identity yields at most one
/// record across both merges: a stat-only row whose key belongs to a roster
/// row of the other group is dropped.
pub fn compute_rankings(
    roster: &[RosterRecord],
    hitter_stats: &[StatRecord],
    pitcher_stats: &[StatRecord],
    scoring: &ScoringConfig,
) -> Vec<RankedPlayer> {
    let (pitcher_rows, hitter_rows): (Vec<RosterRecord>, Vec<RosterRecord>) =
        roster.iter().cloned().partition(|row| {
            classify_slots(&row.eligible_slots, scoring.compound_slots).group()
                == RoleGroup::Pitcher
        });

    let mut merged = merge_records(
        &pitcher_rows,
        pitcher_stats,
        RoleGroup::Pitcher,
        scoring.join,
        scoring.compound_slots,
    );
    merged.extend(merge_records(
        &hitter_rows,
        hitter_stats,
        RoleGroup::Hitter,
        scoring.join,
        scoring.compound_slots,
    ));
    let merged = unique_identities(merged);

    let ranked = rank_players(merged, scoring);
    info!(
        roster = roster.len(),
        ranked = ranked.len(),
        "valuation complete"
    );
    ranked
}

/// Keep one record per `PlayerKey`. Roster-backed records win over stat-only
/// rows; among the rest the first record is kept.
fn unique_identities(records: Vec<PlayerRecord>) -> Vec<PlayerRecord> {
    let rostered: HashSet<PlayerKey> = records
        .iter()
        .filter(|r| r.stat_match != StatMatch::StatOnly)
        .map(|r| r.key.clone())
        .collect();

    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            if r.stat_match == StatMatch::StatOnly && rostered.contains(&r.key) {
                debug!(player = %r.key, "stat-only row belongs to a rostered player, dropped");
                return false;
            }
            let fresh = seen.insert(r.key.clone());
            if !fresh {
                warn!(player = %r.key, "identity present in both role groups, later row dropped");
            }
            fresh
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
