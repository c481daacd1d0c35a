// Record merger: joins roster rows with stat rows on normalized identity,
// then fills unmatched roster rows from a name-only fallback.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::identity::{normalize_name, PlayerKey};
use crate::positions::{classify_slots, CompoundSlotPolicy, RoleClass, RoleGroup};
use crate::records::{PlayerRecord, RosterRecord, StatLine, StatMatch, StatRecord};

/// Which rows survive the identity join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Keep roster rows and stat rows without a counterpart.
    #[default]
    Outer,
    /// Keep roster rows only.
    Left,
}

/// Intermediate join state: merged roster rows plus which stat rows were
/// consumed by any match.
struct Joined {
    records: Vec<PlayerRecord>,
    consumed: Vec<bool>,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Merge roster rows with stat rows.
///
/// 1. Both inputs are de-duplicated on `PlayerKey` (first row wins).
/// 2. Rows are joined on the full key.
/// 3. Roster rows left unmatched take stats from the first stat row with the
///    same normalized name, regardless of team.
/// 4. With `JoinKind::Outer`, stat rows nothing consumed are appended with
///    a role taken from `stat_role`.
///
/// An empty input on either side yields an empty result.
pub fn merge_records(
    roster: &[RosterRecord],
    stats: &[StatRecord],
    stat_role: RoleGroup,
    join: JoinKind,
    policy: CompoundSlotPolicy,
) -> Vec<PlayerRecord> {
    if roster.is_empty() || stats.is_empty() {
        warn!(
            roster_rows = roster.len(),
            stat_rows = stats.len(),
            "merge input is empty, returning no records"
        );
        return Vec::new();
    }

    let roster = dedup_roster(roster);
    let stats = dedup_stats(stats);

    let mut joined = join_on_identity(&roster, &stats, policy);
    apply_name_fallback(&mut joined, &stats);

    let mut records = joined.records;
    let matched = records
        .iter()
        .filter(|r| r.stat_match != StatMatch::RosterOnly)
        .count();

    if join == JoinKind::Outer {
        let role = match stat_role {
            RoleGroup::Pitcher => RoleClass::Pitcher,
            RoleGroup::Hitter => RoleClass::Unknown,
        };
        for (row, _) in stats
            .iter()
            .zip(joined.consumed.iter())
            .filter(|(_, used)| !**used)
        {
            records.push(stat_only_record(row, role.clone()));
        }
    }

    info!(
        group = stat_role.label(),
        roster_rows = roster.len(),
        stat_rows = stats.len(),
        matched,
        total = records.len(),
        "merged records"
    );
    records
}

// ---------------------------------------------------------------------------
// Join stages
// ---------------------------------------------------------------------------

fn join_on_identity(
    roster: &[&RosterRecord],
    stats: &[&StatRecord],
    policy: CompoundSlotPolicy,
) -> Joined {
    let index: HashMap<PlayerKey, usize> = stats
        .iter()
        .enumerate()
        .map(|(i, s)| (PlayerKey::new(&s.name, &s.team), i))
        .collect();

    let mut consumed = vec![false; stats.len()];
    let records = roster
        .iter()
        .map(|row| {
            let key = PlayerKey::new(&row.name, &row.team);
            let mut record = roster_record(row, key, policy);
            if let Some(&i) = index.get(&record.key) {
                consumed[i] = true;
                record.proj = stats[i].proj.clone();
                record.curr = stats[i].curr.clone();
                record.adp = stats[i].adp;
                record.stat_match = StatMatch::TeamJoin;
            }
            record
        })
        .collect();

    Joined { records, consumed }
}

/// Fill stat columns of unmatched roster rows from the first stat row with
/// the same normalized name. Identity fields are never overwritten, and rows
/// that already matched are untouched.
fn apply_name_fallback(joined: &mut Joined, stats: &[&StatRecord]) {
    let mut by_name: HashMap<String, usize> = HashMap::new();
    for (i, row) in stats.iter().enumerate() {
        by_name.entry(normalize_name(&row.name)).or_insert(i);
    }

    for record in joined
        .records
        .iter_mut()
        .filter(|r| r.stat_match == StatMatch::RosterOnly)
    {
        let Some(&i) = by_name.get(&record.key.name) else {
            continue;
        };
        let source = stats[i];
        record.proj.fill_missing_from(&source.proj);
        record.curr.fill_missing_from(&source.curr);
        if record.adp.is_none() {
            record.adp = source.adp;
        }
        record.stat_match = StatMatch::NameFallback;
        joined.consumed[i] = true;
        debug!(
            player = %record.key,
            source_team = %source.team,
            "stats filled from name-only match"
        );
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dedup_roster(rows: &[RosterRecord]) -> Vec<&RosterRecord> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter(|row| {
            let key = PlayerKey::new(&row.name, &row.team);
            let fresh = seen.insert(key.clone());
            if !fresh {
                warn!(player = %key, "duplicate roster row dropped");
            }
            fresh
        })
        .collect()
}

fn dedup_stats(rows: &[StatRecord]) -> Vec<&StatRecord> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter(|row| {
            let key = PlayerKey::new(&row.name, &row.team);
            let fresh = seen.insert(key.clone());
            if !fresh {
                warn!(player = %key, "duplicate stat row dropped");
            }
            fresh
        })
        .collect()
}

fn roster_record(row: &RosterRecord, key: PlayerKey, policy: CompoundSlotPolicy) -> PlayerRecord {
    PlayerRecord {
        key,
        name: row.name.clone(),
        team: row.team.clone(),
        eligible_slots: row.eligible_slots.clone(),
        position: classify_slots(&row.eligible_slots, policy),
        fantasy_team: row.fantasy_team.clone(),
        injury_status: row.injury_status.clone(),
        proj: StatLine::new(),
        curr: StatLine::new(),
        adp: None,
        stat_match: StatMatch::RosterOnly,
    }
}

fn stat_only_record(row: &StatRecord, position: RoleClass) -> PlayerRecord {
    PlayerRecord {
        key: PlayerKey::new(&row.name, &row.team),
        name: row.name.clone(),
        team: row.team.clone(),
        eligible_slots: Vec::new(),
        position,
        fantasy_team: None,
        injury_status: None,
        proj: row.proj.clone(),
        curr: row.curr.clone(),
        adp: row.adp,
        stat_match: StatMatch::StatOnly,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
