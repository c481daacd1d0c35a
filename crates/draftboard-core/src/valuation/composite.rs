// Composite scorer: per-snapshot weighted sum of metric z-scores, computed
// separately within the hitter and pitcher groups.

use tracing::{debug, warn};

use crate::config::{EligibilityConfig, ScoringConfig, StatWeightProfile};
use crate::positions::RoleGroup;
use crate::records::{Metric, PlayerRecord, Snapshot, StatLine};
use crate::valuation::comparison::apply_comparisons;
use crate::valuation::zscore::{compute_pool_stats, compute_zscore};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One snapshot's valuation for a player.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapshotScore {
    /// Whether the row met the playing-time threshold for this snapshot.
    pub qualified: bool,
    /// Weighted z-score sum; 0.0 when not qualified.
    pub composite: f64,
    /// Weighted metrics the row actually had a value for.
    pub stats_used: usize,
    /// Z-score of `composite` within the qualified players of the group.
    pub position_zscore: f64,
    /// Percentile rank (0, 100] of `composite` within the same population.
    pub percentile: f64,
    /// `composite` minus the 25th percentile composite of that population.
    pub value_above_replacement: f64,
}

impl SnapshotScore {
    /// Composite score, or `None` when the row was not scored.
    pub fn value(&self) -> Option<f64> {
        self.qualified.then_some(self.composite)
    }
}

/// A scored player.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub record: PlayerRecord,
    pub group: RoleGroup,
    pub proj: SnapshotScore,
    pub curr: SnapshotScore,
    /// `curr.composite - proj.composite`, always on the unrounded values.
    pub score_delta: f64,
}

impl RankedPlayer {
    pub fn score(&self, snapshot: Snapshot) -> &SnapshotScore {
        match snapshot {
            Snapshot::Projected => &self.proj,
            Snapshot::Current => &self.curr,
        }
    }

    pub fn score_mut(&mut self, snapshot: Snapshot) -> &mut SnapshotScore {
        match snapshot {
            Snapshot::Projected => &mut self.proj,
            Snapshot::Current => &mut self.curr,
        }
    }
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// The playing-time filter only applies when the metrics it needs appear in
/// at least one row of the population.
fn gate_enabled(lines: &[&StatLine], group: RoleGroup) -> bool {
    let present = |m: Metric| lines.iter().any(|l| l.has(m));
    match group {
        RoleGroup::Hitter => present(Metric::Ab),
        RoleGroup::Pitcher => present(Metric::Ip) && present(Metric::Sv),
    }
}

/// Playing-time test for one snapshot line. Missing values count as 0.
///
/// Hitters need `AB >= min_ab`. Pitchers need `IP >= min_ip` and either
/// `SV > closer_saves` or `IP >= starter_ip`.
pub fn qualifies(line: &StatLine, group: RoleGroup, elig: &EligibilityConfig) -> bool {
    let value = |m: Metric| line.get(m).unwrap_or(0.0);
    match group {
        RoleGroup::Hitter => value(Metric::Ab) >= elig.min_ab,
        RoleGroup::Pitcher => {
            let ip = value(Metric::Ip);
            let sv = value(Metric::Sv);
            ip >= elig.min_ip && (sv > elig.closer_saves || ip >= elig.starter_ip)
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Composite score and stats-used count for each line of a scored
/// population.
///
/// Metrics absent from every line contribute nothing. Within a present
/// metric, missing cells are filled with 0 before z-scoring. Inverted
/// metrics are negated so higher is always better.
pub fn score_population(lines: &[&StatLine], profile: &StatWeightProfile) -> Vec<(f64, usize)> {
    let mut out = vec![(0.0, 0usize); lines.len()];
    if lines.is_empty() {
        return out;
    }

    for (&metric, &weight) in &profile.weights {
        if !lines.iter().any(|l| l.has(metric)) {
            debug!(%metric, "metric absent from population, skipped");
            continue;
        }
        let sign = if profile.is_inverted(metric) { -1.0 } else { 1.0 };
        let values: Vec<f64> = lines
            .iter()
            .map(|l| sign * l.get(metric).unwrap_or(0.0))
            .collect();
        let stats = compute_pool_stats(&values);
        debug!(%metric, mean = stats.mean, stdev = stats.stdev, "pool stats");

        for ((slot, line), value) in out.iter_mut().zip(lines).zip(&values) {
            slot.0 += compute_zscore(*value, &stats) * weight;
            if line.has(metric) {
                slot.1 += 1;
            }
        }
    }
    out
}

/// Score one role group in both snapshots. Rows that qualify in neither
/// snapshot are dropped.
fn score_group(
    records: Vec<PlayerRecord>,
    group: RoleGroup,
    scoring: &ScoringConfig,
) -> Vec<RankedPlayer> {
    let profile = scoring.profile(group);
    let mut scores: Vec<[SnapshotScore; 2]> = vec![Default::default(); records.len()];

    for (s, snapshot) in Snapshot::ALL.into_iter().enumerate() {
        let lines: Vec<&StatLine> = records.iter().map(|r| r.line(snapshot)).collect();
        let gated = gate_enabled(&lines, group);
        if !gated {
            warn!(
                group = group.label(),
                snapshot = snapshot.prefix(),
                "playing-time columns missing, eligibility filter skipped"
            );
        }

        let population: Vec<usize> = (0..records.len())
            .filter(|&i| !gated || qualifies(lines[i], group, &scoring.eligibility))
            .collect();
        let pop_lines: Vec<&StatLine> = population.iter().map(|&i| lines[i]).collect();
        let scored = score_population(&pop_lines, profile);

        for (&i, (composite, stats_used)) in population.iter().zip(scored) {
            scores[i][s] = SnapshotScore {
                qualified: true,
                composite,
                stats_used,
                ..Default::default()
            };
        }
    }

    let before = records.len();
    let ranked: Vec<RankedPlayer> = records
        .into_iter()
        .zip(scores)
        .filter(|(_, [proj, curr])| proj.qualified || curr.qualified)
        .map(|(record, [proj, curr])| RankedPlayer {
            record,
            group,
            proj,
            curr,
            score_delta: curr.composite - proj.composite,
        })
        .collect();

    debug!(
        group = group.label(),
        input = before,
        ranked = ranked.len(),
        "group scored"
    );
    ranked
}

/// Score merged records: split by role group, filter on playing time per
/// snapshot, compute composites, attach comparison metrics, and order by
/// projected composite descending.
pub fn rank_players(records: Vec<PlayerRecord>, scoring: &ScoringConfig) -> Vec<RankedPlayer> {
    let (pitchers, hitters): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.position.group() == RoleGroup::Pitcher);

    let mut ranked = score_group(hitters, RoleGroup::Hitter, scoring);
    ranked.extend(score_group(pitchers, RoleGroup::Pitcher, scoring));

    apply_comparisons(&mut ranked);

    ranked.sort_by(|a, b| b.proj.composite.total_cmp(&a.proj.composite));
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
