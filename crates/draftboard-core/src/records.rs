// Typed player records: roster rows, stat rows, and the merged record.
//
// Stat columns are explicit: a `StatLine` holds an optional value per
// `Metric`, and a `Snapshot` picks which of the two parallel valuations
// (projected / current) a line belongs to.

use std::collections::BTreeMap;
use std::fmt;

use crate::identity::PlayerKey;
use crate::positions::RoleClass;

// ---------------------------------------------------------------------------
// Snapshots and metrics
// ---------------------------------------------------------------------------

/// Which valuation a stat column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Snapshot {
    /// Preseason forecast (`proj_*` columns).
    Projected,
    /// In-season actuals (`curr_*` columns).
    Current,
}

impl Snapshot {
    pub const ALL: [Snapshot; 2] = [Snapshot::Projected, Snapshot::Current];

    /// Column prefix used by tabular inputs and outputs.
    pub fn prefix(&self) -> &'static str {
        match self {
            Snapshot::Projected => "proj_",
            Snapshot::Current => "curr_",
        }
    }

    /// Full column name for a metric in this snapshot, e.g. `proj_wOBA`.
    pub fn column(&self, metric: Metric) -> String {
        format!("{}{}", self.prefix(), metric.column())
    }

    /// Split a prefixed column header into its snapshot and metric.
    ///
    /// Returns `None` for headers that are not snapshot stat columns.
    pub fn parse_column(header: &str) -> Option<(Snapshot, Metric)> {
        let header = header.trim();
        Snapshot::ALL.iter().find_map(|&snapshot| {
            header
                .strip_prefix(snapshot.prefix())
                .and_then(Metric::from_column)
                .map(|metric| (snapshot, metric))
        })
    }
}

/// Raw performance metrics used as scoring inputs. Treated as opaque
/// numeric features by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Woba,
    Iso,
    Wbsr,
    Ab,
    WrcPlus,
    KMinusBbPct,
    Ip,
    Whip,
    Fip,
    Sv,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Woba,
        Metric::Iso,
        Metric::Wbsr,
        Metric::Ab,
        Metric::WrcPlus,
        Metric::KMinusBbPct,
        Metric::Ip,
        Metric::Whip,
        Metric::Fip,
        Metric::Sv,
    ];

    /// Source column name (without snapshot prefix).
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Woba => "wOBA",
            Metric::Iso => "ISO",
            Metric::Wbsr => "wBsR",
            Metric::Ab => "AB",
            Metric::WrcPlus => "wRC+",
            Metric::KMinusBbPct => "K-BB%",
            Metric::Ip => "IP",
            Metric::Whip => "WHIP",
            Metric::Fip => "FIP",
            Metric::Sv => "SV",
        }
    }

    /// Parse a source column name. Matching is exact except for case, since
    /// providers disagree on capitalisation (`wOBA` vs `WOBA`).
    pub fn from_column(s: &str) -> Option<Self> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.column().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Stat lines
// ---------------------------------------------------------------------------

/// One snapshot's worth of metric values for a player. A metric that is not
/// present is a missing cell; non-finite values are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLine {
    values: BTreeMap<Metric, f64>,
}

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn has(&self, metric: Metric) -> bool {
        self.values.contains_key(&metric)
    }

    /// Store a value. NaN and infinities are treated as a missing cell.
    pub fn set(&mut self, metric: Metric, value: f64) {
        if value.is_finite() {
            self.values.insert(metric, value);
        } else {
            self.values.remove(&metric);
        }
    }

    /// Builder-style `set`.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }

    /// Copy every metric present in `other` but missing here. Existing values
    /// always win (first-non-null precedence).
    pub fn fill_missing_from(&mut self, other: &StatLine) {
        for (metric, value) in other.iter() {
            self.values.entry(metric).or_insert(value);
        }
    }
}

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// A row from the roster / free-agent identity source.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRecord {
    pub name: String,
    pub team: String,
    /// Raw eligibility slots as supplied (e.g. `["1B", "1B/3B", "UTIL", "IL"]`).
    pub eligible_slots: Vec<String>,
    /// Owning fantasy team, or "free agent".
    pub fantasy_team: Option<String>,
    pub injury_status: Option<String>,
}

/// A row from an external projections / stats source.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRecord {
    pub name: String,
    pub team: String,
    pub proj: StatLine,
    pub curr: StatLine,
    pub adp: Option<f64>,
}

impl StatRecord {
    pub fn line(&self, snapshot: Snapshot) -> &StatLine {
        match snapshot {
            Snapshot::Projected => &self.proj,
            Snapshot::Current => &self.curr,
        }
    }
}

// ---------------------------------------------------------------------------
// Merged record
// ---------------------------------------------------------------------------

/// Where a merged record's statistical columns came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatMatch {
    /// Matched on normalized name and team.
    TeamJoin,
    /// Team did not match; stats filled from a name-only match.
    NameFallback,
    /// Roster row with no stat row after both join attempts.
    RosterOnly,
    /// Stat row with no roster row (outer join only).
    StatOnly,
}

impl StatMatch {
    pub fn label(&self) -> &'static str {
        match self {
            StatMatch::TeamJoin => "team",
            StatMatch::NameFallback => "name",
            StatMatch::RosterOnly => "roster_only",
            StatMatch::StatOnly => "stat_only",
        }
    }
}

/// One player after the merge step. Identity fields come from the roster
/// source when present, otherwise from the stat source.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub key: PlayerKey,
    pub name: String,
    pub team: String,
    pub eligible_slots: Vec<String>,
    pub position: RoleClass,
    pub fantasy_team: Option<String>,
    pub injury_status: Option<String>,
    pub proj: StatLine,
    pub curr: StatLine,
    pub adp: Option<f64>,
    pub stat_match: StatMatch,
}

impl PlayerRecord {
    pub fn line(&self, snapshot: Snapshot) -> &StatLine {
        match snapshot {
            Snapshot::Projected => &self.proj,
            Snapshot::Current => &self.curr,
        }
    }

    /// Name with the injury annotation appended, unless the player is
    /// healthy or the annotation is empty.
    pub fn display_name(&self) -> String {
        match self.injury_status.as_deref().map(str::trim) {
            Some(status)
                if !status.is_empty()
                    && !status.eq_ignore_ascii_case("ACTIVE")
                    && !status.eq_ignore_ascii_case("HEALTHY") =>
            {
                format!("{} ({})", self.name, status)
            }
            _ => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
