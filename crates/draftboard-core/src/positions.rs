// Position classification: raw eligibility slots -> role class, and role
// class -> the league's draft eligibility slots.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Hitter positions
// ---------------------------------------------------------------------------

/// Canonical fielding positions a hitter can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HitterPosition {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    Outfield,
    DesignatedHitter,
}

impl HitterPosition {
    /// Parse a single canonical position token (already upper-cased).
    ///
    /// Handles long-form and sub-position variants:
    /// - "FIRST" -> 1B, "SHORT" -> SS, "CATCHER" -> C
    /// - "LF"/"CF"/"RF"/"OUTFIELD" -> OF
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "C" | "CATCHER" => Some(HitterPosition::Catcher),
            "1B" | "FIRST" => Some(HitterPosition::FirstBase),
            "2B" | "SECOND" => Some(HitterPosition::SecondBase),
            "3B" | "THIRD" => Some(HitterPosition::ThirdBase),
            "SS" | "SHORT" => Some(HitterPosition::ShortStop),
            "OF" | "LF" | "CF" | "RF" | "OUTFIELD" => Some(HitterPosition::Outfield),
            "DH" => Some(HitterPosition::DesignatedHitter),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HitterPosition::Catcher => "C",
            HitterPosition::FirstBase => "1B",
            HitterPosition::SecondBase => "2B",
            HitterPosition::ThirdBase => "3B",
            HitterPosition::ShortStop => "SS",
            HitterPosition::Outfield => "OF",
            HitterPosition::DesignatedHitter => "DH",
        }
    }
}

impl fmt::Display for HitterPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tokens that denote a pitching role.
fn is_pitcher_token(token: &str) -> bool {
    matches!(token, "P" | "SP" | "RP" | "CL" | "PITCHER")
}

/// Roster bookkeeping slots that never indicate a playing position:
/// injured lists, bench, utility, and not-active markers.
fn is_meta_slot(token: &str) -> bool {
    token.starts_with("IL")
        || token.starts_with("DL")
        || matches!(token, "BE" | "BN" | "BENCH" | "UTIL" | "UT" | "NA")
}

// ---------------------------------------------------------------------------
// Role classes
// ---------------------------------------------------------------------------

/// Which scoring group a player is valued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleGroup {
    Hitter,
    Pitcher,
}

impl RoleGroup {
    pub fn label(&self) -> &'static str {
        match self {
            RoleGroup::Hitter => "hitter",
            RoleGroup::Pitcher => "pitcher",
        }
    }
}

/// A player's classified role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleClass {
    Hitter(BTreeSet<HitterPosition>),
    Pitcher,
    /// Holds both a pitching role and at least one hitter position.
    TwoWay(BTreeSet<HitterPosition>),
    Unknown,
}

impl RoleClass {
    /// Display label: sorted, comma-joined positions, "Pitcher", or "Unknown".
    pub fn label(&self) -> String {
        let mut labels: Vec<&str> = match self {
            RoleClass::Hitter(set) => set.iter().map(HitterPosition::label).collect(),
            RoleClass::Pitcher => return "Pitcher".to_string(),
            RoleClass::TwoWay(set) => set
                .iter()
                .map(HitterPosition::label)
                .chain(std::iter::once("Pitcher"))
                .collect(),
            RoleClass::Unknown => return "Unknown".to_string(),
        };
        labels.sort_unstable();
        labels.join(", ")
    }

    /// Scoring group. Two-way players are valued as pitchers; players with
    /// no recognised slot fall back to the hitter group.
    pub fn group(&self) -> RoleGroup {
        match self {
            RoleClass::Pitcher | RoleClass::TwoWay(_) => RoleGroup::Pitcher,
            RoleClass::Hitter(_) | RoleClass::Unknown => RoleGroup::Hitter,
        }
    }

    pub fn is_pitcher(&self) -> bool {
        matches!(self, RoleClass::Pitcher | RoleClass::TwoWay(_))
    }

    /// Hitter positions held, empty for pure pitchers and unknowns.
    pub fn hitter_positions(&self) -> BTreeSet<HitterPosition> {
        match self {
            RoleClass::Hitter(set) | RoleClass::TwoWay(set) => set.clone(),
            RoleClass::Pitcher | RoleClass::Unknown => BTreeSet::new(),
        }
    }
}

impl fmt::Display for RoleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// How to treat combined slots such as "1B/3B".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundSlotPolicy {
    /// Compound slots carry no positional information.
    #[default]
    Ignore,
    /// Each part of a compound slot counts as a held position.
    Expand,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Split a raw eligibility cell ("1B, 3B/SS UTIL") into slot tokens.
/// Compound "/" tokens are kept whole.
pub fn split_slots(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classify a player's raw eligibility slots into a role class.
///
/// Meta slots (injured list, bench, utility) are discarded. Unknown tokens
/// are ignored. Never fails: an empty or fully-discarded input is `Unknown`.
pub fn classify_slots<S: AsRef<str>>(slots: &[S], policy: CompoundSlotPolicy) -> RoleClass {
    let mut hitters = BTreeSet::new();
    let mut pitcher = false;

    for slot in slots {
        let token = slot.as_ref().trim().to_uppercase();
        if token.is_empty() || is_meta_slot(&token) {
            continue;
        }

        let parts: Vec<&str> = if token.contains('/') {
            match policy {
                CompoundSlotPolicy::Ignore => continue,
                CompoundSlotPolicy::Expand => token.split('/').map(str::trim).collect(),
            }
        } else {
            vec![token.as_str()]
        };

        for part in parts {
            if is_meta_slot(part) {
                continue;
            }
            if is_pitcher_token(part) {
                pitcher = true;
            } else if let Some(pos) = HitterPosition::from_token(part) {
                hitters.insert(pos);
            }
        }
    }

    match (pitcher, hitters.is_empty()) {
        (false, true) => RoleClass::Unknown,
        (true, true) => RoleClass::Pitcher,
        (true, false) => RoleClass::TwoWay(hitters),
        (false, false) => RoleClass::Hitter(hitters),
    }
}

// ---------------------------------------------------------------------------
// Draft eligibility slots
// ---------------------------------------------------------------------------

/// League roster slots a drafted player can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftSlot {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    Outfield,
    CornerInfield,
    MiddleInfield,
    Pitcher,
    Utility,
}

/// Positions the board reports per-position views and depth for.
pub const LEAGUE_POSITIONS: [DraftSlot; 9] = [
    DraftSlot::FirstBase,
    DraftSlot::SecondBase,
    DraftSlot::ThirdBase,
    DraftSlot::ShortStop,
    DraftSlot::Pitcher,
    DraftSlot::Catcher,
    DraftSlot::Outfield,
    DraftSlot::MiddleInfield,
    DraftSlot::CornerInfield,
];

impl DraftSlot {
    pub fn label(&self) -> &'static str {
        match self {
            DraftSlot::Catcher => "C",
            DraftSlot::FirstBase => "1B",
            DraftSlot::SecondBase => "2B",
            DraftSlot::ThirdBase => "3B",
            DraftSlot::ShortStop => "SS",
            DraftSlot::Outfield => "OF",
            DraftSlot::CornerInfield => "CI",
            DraftSlot::MiddleInfield => "MI",
            DraftSlot::Pitcher => "P",
            DraftSlot::Utility => "UTIL",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Some(DraftSlot::Catcher),
            "1B" => Some(DraftSlot::FirstBase),
            "2B" => Some(DraftSlot::SecondBase),
            "3B" => Some(DraftSlot::ThirdBase),
            "SS" => Some(DraftSlot::ShortStop),
            "OF" => Some(DraftSlot::Outfield),
            "CI" => Some(DraftSlot::CornerInfield),
            "MI" => Some(DraftSlot::MiddleInfield),
            "P" => Some(DraftSlot::Pitcher),
            "UTIL" => Some(DraftSlot::Utility),
            _ => None,
        }
    }
}

impl fmt::Display for DraftSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Expand a role class into the draft slots it may fill.
///
/// 1B/3B add CI, 2B/SS add MI, any pitching role adds P. Players without a
/// pitching role are also eligible at UTIL.
pub fn eligible_slots(role: &RoleClass) -> BTreeSet<DraftSlot> {
    let mut slots = BTreeSet::new();
    for pos in role.hitter_positions() {
        match pos {
            HitterPosition::Catcher => {
                slots.insert(DraftSlot::Catcher);
            }
            HitterPosition::FirstBase => {
                slots.insert(DraftSlot::FirstBase);
                slots.insert(DraftSlot::CornerInfield);
            }
            HitterPosition::ThirdBase => {
                slots.insert(DraftSlot::ThirdBase);
                slots.insert(DraftSlot::CornerInfield);
            }
            HitterPosition::SecondBase => {
                slots.insert(DraftSlot::SecondBase);
                slots.insert(DraftSlot::MiddleInfield);
            }
            HitterPosition::ShortStop => {
                slots.insert(DraftSlot::ShortStop);
                slots.insert(DraftSlot::MiddleInfield);
            }
            HitterPosition::Outfield => {
                slots.insert(DraftSlot::Outfield);
            }
            HitterPosition::DesignatedHitter => {}
        }
    }
    if role.is_pitcher() {
        slots.insert(DraftSlot::Pitcher);
    } else {
        slots.insert(DraftSlot::Utility);
    }
    slots
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
