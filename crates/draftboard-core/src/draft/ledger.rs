// Draft ledger: which board players are already off the board, and by whom.

use std::collections::BTreeMap;

use crate::draft::board::{DraftBoard, DraftBoardEntry};
use crate::identity::PlayerKey;

/// Draft state of a single player.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftStatus {
    #[default]
    Undrafted,
    /// Drafted, owner not recorded.
    Drafted,
    DraftedBy(String),
}

impl DraftStatus {
    /// Text used in the board's `Drafted` column.
    pub fn marker(&self) -> &str {
        match self {
            DraftStatus::Undrafted => "",
            DraftStatus::Drafted => "Drafted",
            DraftStatus::DraftedBy(team) => team,
        }
    }

    /// Inverse of `marker`: empty is undrafted, "drafted"/"x"/"yes" mark a
    /// pick with no owner, anything else names the owning team.
    pub fn from_marker(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return DraftStatus::Undrafted;
        }
        match raw.to_ascii_lowercase().as_str() {
            "drafted" | "x" | "yes" | "true" | "1" => DraftStatus::Drafted,
            _ => DraftStatus::DraftedBy(raw.to_string()),
        }
    }

    pub fn is_drafted(&self) -> bool {
        !matches!(self, DraftStatus::Undrafted)
    }
}

static UNDRAFTED: DraftStatus = DraftStatus::Undrafted;

/// Draft status keyed by player identity. Players never marked are
/// undrafted.
#[derive(Debug, Clone, Default)]
pub struct DraftLedger {
    statuses: BTreeMap<PlayerKey, DraftStatus>,
}

impl DraftLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pick. An empty team name records an anonymous pick.
    pub fn mark_drafted(&mut self, key: PlayerKey, team: &str) {
        let team = team.trim();
        let status = if team.is_empty() {
            DraftStatus::Drafted
        } else {
            DraftStatus::DraftedBy(team.to_string())
        };
        self.statuses.insert(key, status);
    }

    pub fn mark_undrafted(&mut self, key: &PlayerKey) {
        self.statuses.remove(key);
    }

    pub fn status(&self, key: &PlayerKey) -> &DraftStatus {
        self.statuses.get(key).unwrap_or(&UNDRAFTED)
    }

    pub fn is_drafted(&self, key: &PlayerKey) -> bool {
        self.status(key).is_drafted()
    }

    /// Number of drafted players.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Board entries still available, in board order.
    pub fn available<'a>(
        &'a self,
        board: &'a DraftBoard,
    ) -> impl Iterator<Item = &'a DraftBoardEntry> + 'a {
        board
            .entries
            .iter()
            .filter(move |e| !self.is_drafted(&e.record.key))
    }
}
