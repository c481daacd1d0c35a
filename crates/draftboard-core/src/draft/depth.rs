// Positional depth analysis: how many candidates can fill each league
// slot, and which slots are scarce or deep.

use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use crate::config::DraftConfig;
use crate::positions::DraftSlot;

/// Per-slot candidate counts plus the scarce / deep classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionDepthTable {
    pub counts: BTreeMap<DraftSlot, usize>,
    pub scarce: BTreeSet<DraftSlot>,
    pub deep: BTreeSet<DraftSlot>,
}

impl PositionDepthTable {
    pub fn count(&self, slot: DraftSlot) -> usize {
        self.counts.get(&slot).copied().unwrap_or(0)
    }

    pub fn is_scarce(&self, slot: DraftSlot) -> bool {
        self.scarce.contains(&slot)
    }

    pub fn is_deep(&self, slot: DraftSlot) -> bool {
        self.deep.contains(&slot)
    }

    /// Whether any of the given slots is scarce.
    pub fn any_scarce(&self, slots: &BTreeSet<DraftSlot>) -> bool {
        slots.iter().any(|s| self.is_scarce(*s))
    }

    /// Whether any of the given slots is deep.
    pub fn any_deep(&self, slots: &BTreeSet<DraftSlot>) -> bool {
        slots.iter().any(|s| self.is_deep(*s))
    }
}

/// Count candidates per slot and classify.
///
/// Only slots held by at least one candidate appear in the table. A slot is
/// scarce when its count is at most the scarcity threshold and deep when it
/// is at least the depth threshold; both bounds are inclusive.
pub fn compute_positional_depth<'a, I>(eligibility: I, config: &DraftConfig) -> PositionDepthTable
where
    I: IntoIterator<Item = &'a BTreeSet<DraftSlot>>,
{
    let mut counts: BTreeMap<DraftSlot, usize> = BTreeMap::new();
    for slots in eligibility {
        for slot in slots {
            *counts.entry(*slot).or_insert(0) += 1;
        }
    }

    let scarce_at = config.scarcity.threshold();
    let deep_at = config.depth.threshold();
    let scarce: BTreeSet<DraftSlot> = counts
        .iter()
        .filter(|&(_, &n)| n <= scarce_at)
        .map(|(s, _)| *s)
        .collect();
    let deep: BTreeSet<DraftSlot> = counts
        .iter()
        .filter(|&(_, &n)| n >= deep_at)
        .map(|(s, _)| *s)
        .collect();

    info!(
        slots = counts.len(),
        scarce = ?scarce.iter().map(DraftSlot::label).collect::<Vec<_>>(),
        deep = ?deep.iter().map(DraftSlot::label).collect::<Vec<_>>(),
        "positional depth computed"
    );

    PositionDepthTable {
        counts,
        scarce,
        deep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdConfig;

    fn config(scarce: usize, deep: usize) -> DraftConfig {
        DraftConfig {
            scarcity: ThresholdConfig {
                base: scarce,
                bonus: 0,
            },
            depth: ThresholdConfig { base: deep, bonus: 0 },
            ..DraftConfig::default()
        }
    }

    fn slots(list: &[DraftSlot]) -> BTreeSet<DraftSlot> {
        list.iter().copied().collect()
    }

    #[test]
    fn counts_every_held_slot() {
        let players = vec![
            slots(&[DraftSlot::FirstBase, DraftSlot::CornerInfield, DraftSlot::Utility]),
            slots(&[DraftSlot::ThirdBase, DraftSlot::CornerInfield, DraftSlot::Utility]),
            slots(&[DraftSlot::Pitcher]),
        ];
        let table = compute_positional_depth(&players, &config(1, 3));
        assert_eq!(table.count(DraftSlot::CornerInfield), 2);
        assert_eq!(table.count(DraftSlot::Utility), 2);
        assert_eq!(table.count(DraftSlot::Pitcher), 1);
        assert_eq!(table.count(DraftSlot::Catcher), 0);
        assert!(!table.counts.contains_key(&DraftSlot::Catcher));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let players = vec![
            slots(&[DraftSlot::Catcher]),
            slots(&[DraftSlot::Catcher]),
            slots(&[DraftSlot::Outfield]),
            slots(&[DraftSlot::Outfield]),
            slots(&[DraftSlot::Outfield]),
        ];
        let table = compute_positional_depth(&players, &config(2, 3));
        assert!(table.is_scarce(DraftSlot::Catcher));
        assert!(!table.is_deep(DraftSlot::Catcher));
        assert!(table.is_deep(DraftSlot::Outfield));
        assert!(!table.is_scarce(DraftSlot::Outfield));
    }

    #[test]
    fn default_thresholds_add_bonus() {
        let players: Vec<BTreeSet<DraftSlot>> =
            (0..18).map(|_| slots(&[DraftSlot::ShortStop])).collect();
        let table = compute_positional_depth(&players, &DraftConfig::default());
        assert!(table.is_scarce(DraftSlot::ShortStop));

        let players: Vec<BTreeSet<DraftSlot>> =
            (0..19).map(|_| slots(&[DraftSlot::ShortStop])).collect();
        let table = compute_positional_depth(&players, &DraftConfig::default());
        assert!(!table.is_scarce(DraftSlot::ShortStop));
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let players: Vec<BTreeSet<DraftSlot>> = Vec::new();
        let table = compute_positional_depth(&players, &DraftConfig::default());
        assert_eq!(table, PositionDepthTable::default());
    }
}
