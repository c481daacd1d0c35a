// Upgrade finder: pairs the best free agents at each position against the
// weakest players on the user's fantasy roster.

use std::fmt;
use tracing::info;

use crate::config::UpgradeConfig;
use crate::positions::{HitterPosition, RoleClass};
use crate::valuation::RankedPlayer;

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// A position the finder searches, including the two combo slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeTarget {
    Position(HitterPosition),
    Pitcher,
    /// 1B or 3B.
    CornerInfield,
    /// 2B or SS.
    MiddleInfield,
}

pub const UPGRADE_TARGETS: [UpgradeTarget; 10] = [
    UpgradeTarget::Position(HitterPosition::Catcher),
    UpgradeTarget::Position(HitterPosition::FirstBase),
    UpgradeTarget::Position(HitterPosition::SecondBase),
    UpgradeTarget::Position(HitterPosition::ThirdBase),
    UpgradeTarget::Position(HitterPosition::ShortStop),
    UpgradeTarget::Position(HitterPosition::Outfield),
    UpgradeTarget::Position(HitterPosition::DesignatedHitter),
    UpgradeTarget::Pitcher,
    UpgradeTarget::CornerInfield,
    UpgradeTarget::MiddleInfield,
];

impl UpgradeTarget {
    pub fn label(&self) -> &'static str {
        match self {
            UpgradeTarget::Position(pos) => pos.label(),
            UpgradeTarget::Pitcher => "P",
            UpgradeTarget::CornerInfield => "1B/3B",
            UpgradeTarget::MiddleInfield => "2B/SS",
        }
    }

    /// Whether a player's role can fill this target. Two-way players are
    /// ambiguous here and never match.
    pub fn matches(&self, role: &RoleClass) -> bool {
        match (self, role) {
            (UpgradeTarget::Pitcher, RoleClass::Pitcher) => true,
            (UpgradeTarget::Position(pos), RoleClass::Hitter(set)) => set.contains(pos),
            (UpgradeTarget::CornerInfield, RoleClass::Hitter(set)) => {
                set.contains(&HitterPosition::FirstBase) || set.contains(&HitterPosition::ThirdBase)
            }
            (UpgradeTarget::MiddleInfield, RoleClass::Hitter(set)) => {
                set.contains(&HitterPosition::SecondBase) || set.contains(&HitterPosition::ShortStop)
            }
            _ => false,
        }
    }
}

impl fmt::Display for UpgradeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeVerdict {
    StrongUpgrade,
    Upgrade,
    Marginal,
    /// The free agent trails the rostered player.
    Underperforming,
    /// A score needed for the comparison is missing.
    Inconclusive,
}

impl UpgradeVerdict {
    pub fn from_weighted(weighted: Option<f64>, config: &UpgradeConfig) -> Self {
        match weighted {
            None => UpgradeVerdict::Inconclusive,
            Some(w) if w >= config.strong_upgrade => UpgradeVerdict::StrongUpgrade,
            Some(w) if w >= config.upgrade => UpgradeVerdict::Upgrade,
            Some(w) if w < config.underperforming => UpgradeVerdict::Underperforming,
            Some(_) => UpgradeVerdict::Marginal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpgradeVerdict::StrongUpgrade => "Strong Upgrade",
            UpgradeVerdict::Upgrade => "Upgrade",
            UpgradeVerdict::Marginal => "Marginal",
            UpgradeVerdict::Underperforming => "Underperforming",
            UpgradeVerdict::Inconclusive => "Inconclusive",
        }
    }
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Free agent vs. rostered player score comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterComparison {
    pub roster_player: String,
    pub roster_proj: Option<f64>,
    pub roster_curr: Option<f64>,
    pub proj_delta: Option<f64>,
    pub curr_delta: Option<f64>,
    pub weighted_delta: Option<f64>,
    pub verdict: UpgradeVerdict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeSuggestion {
    pub target: UpgradeTarget,
    pub free_agent: String,
    pub fa_proj: Option<f64>,
    pub fa_curr: Option<f64>,
    /// `None` when the user rosters nobody at the target.
    pub comparison: Option<RosterComparison>,
}

/// Whether an ownership value marks an unowned player.
pub fn is_free_agent(fantasy_team: Option<&str>) -> bool {
    fantasy_team
        .map(str::trim)
        .is_some_and(|t| t.eq_ignore_ascii_case("free agent") || t.eq_ignore_ascii_case("fa"))
}

fn owned_by(player: &RankedPlayer, team: &str) -> bool {
    let team = team.trim();
    !team.is_empty()
        && player
            .record
            .fantasy_team
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(team))
}

fn delta(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

fn compare(fa: &RankedPlayer, mine: &RankedPlayer, config: &UpgradeConfig) -> RosterComparison {
    let proj_delta = delta(fa.proj.value(), mine.proj.value());
    let curr_delta = delta(fa.curr.value(), mine.curr.value());
    let weighted_delta = match (proj_delta, curr_delta) {
        (Some(p), Some(c)) => Some(config.proj_weight * p + config.curr_weight * c),
        _ => None,
    };
    RosterComparison {
        roster_player: mine.record.display_name(),
        roster_proj: mine.proj.value(),
        roster_curr: mine.curr.value(),
        proj_delta,
        curr_delta,
        weighted_delta,
        verdict: UpgradeVerdict::from_weighted(weighted_delta, config),
    }
}

/// Find free-agent upgrades for `my_team` at every target position.
///
/// Free agents at a target are sorted by projected composite descending and
/// the user's players ascending, then paired index-wise up to
/// `per_position`. With nobody rostered at a target, the top free agents
/// are listed without a comparison.
pub fn suggest_upgrades(
    ranked: &[RankedPlayer],
    my_team: &str,
    config: &UpgradeConfig,
) -> Vec<UpgradeSuggestion> {
    let sort_key = |p: &RankedPlayer| p.proj.value().unwrap_or(f64::NEG_INFINITY);
    let mut suggestions = Vec::new();

    for target in UPGRADE_TARGETS {
        let mut free_agents: Vec<&RankedPlayer> = ranked
            .iter()
            .filter(|p| is_free_agent(p.record.fantasy_team.as_deref()))
            .filter(|p| target.matches(&p.record.position))
            .collect();
        free_agents.sort_by(|a, b| sort_key(b).total_cmp(&sort_key(a)));

        let mut mine: Vec<&RankedPlayer> = ranked
            .iter()
            .filter(|p| owned_by(p, my_team))
            .filter(|p| target.matches(&p.record.position))
            .collect();
        mine.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));

        let limit = if mine.is_empty() {
            free_agents.len().min(config.per_position)
        } else {
            free_agents.len().min(mine.len()).min(config.per_position)
        };

        for (i, fa) in free_agents.iter().take(limit).enumerate() {
            suggestions.push(UpgradeSuggestion {
                target,
                free_agent: fa.record.display_name(),
                fa_proj: fa.proj.value(),
                fa_curr: fa.curr.value(),
                comparison: mine.get(i).map(|m| compare(fa, m, config)),
            });
        }
    }

    info!(
        team = my_team,
        suggestions = suggestions.len(),
        "upgrade search complete"
    );
    suggestions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::PlayerKey;
    use crate::positions::RoleGroup;
    use crate::records::{PlayerRecord, StatLine, StatMatch};
    use crate::valuation::SnapshotScore;
    use std::collections::BTreeSet;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn score(v: Option<f64>) -> SnapshotScore {
        SnapshotScore {
            qualified: v.is_some(),
            composite: v.unwrap_or(0.0),
            ..Default::default()
        }
    }

    fn player(
        name: &str,
        owner: &str,
        position: RoleClass,
        proj: Option<f64>,
        curr: Option<f64>,
    ) -> RankedPlayer {
        RankedPlayer {
            record: PlayerRecord {
                key: PlayerKey::new(name, "CHC"),
                name: name.into(),
                team: "CHC".into(),
                eligible_slots: Vec::new(),
                position,
                fantasy_team: Some(owner.into()),
                injury_status: None,
                proj: StatLine::new(),
                curr: StatLine::new(),
                adp: None,
                stat_match: StatMatch::TeamJoin,
            },
            group: RoleGroup::Hitter,
            proj: score(proj),
            curr: score(curr),
            score_delta: 0.0,
        }
    }

    fn hitter(positions: &[HitterPosition]) -> RoleClass {
        RoleClass::Hitter(positions.iter().copied().collect::<BTreeSet<_>>())
    }

    #[test]
    fn free_agent_markers() {
        assert!(is_free_agent(Some("Free Agent")));
        assert!(is_free_agent(Some(" FA ")));
        assert!(!is_free_agent(Some("My Team")));
        assert!(!is_free_agent(None));
    }

    #[test]
    fn verdict_buckets() {
        let cfg = UpgradeConfig::default();
        assert_eq!(UpgradeVerdict::from_weighted(Some(0.75), &cfg), UpgradeVerdict::StrongUpgrade);
        assert_eq!(UpgradeVerdict::from_weighted(Some(0.3), &cfg), UpgradeVerdict::Upgrade);
        assert_eq!(UpgradeVerdict::from_weighted(Some(0.0), &cfg), UpgradeVerdict::Marginal);
        assert_eq!(UpgradeVerdict::from_weighted(Some(-0.25), &cfg), UpgradeVerdict::Marginal);
        assert_eq!(UpgradeVerdict::from_weighted(Some(-0.3), &cfg), UpgradeVerdict::Underperforming);
        assert_eq!(UpgradeVerdict::from_weighted(None, &cfg), UpgradeVerdict::Inconclusive);
    }

    #[test]
    fn combo_targets_match_either_position() {
        let third = hitter(&[HitterPosition::ThirdBase]);
        assert!(UpgradeTarget::CornerInfield.matches(&third));
        assert!(!UpgradeTarget::MiddleInfield.matches(&third));
        assert!(UpgradeTarget::Pitcher.matches(&RoleClass::Pitcher));
        let two_way = RoleClass::TwoWay(BTreeSet::from([HitterPosition::DesignatedHitter]));
        assert!(!UpgradeTarget::Pitcher.matches(&two_way));
        assert!(!UpgradeTarget::Position(HitterPosition::DesignatedHitter).matches(&two_way));
    }

    #[test]
    fn best_free_agent_pairs_with_weakest_rostered() {
        let c = hitter(&[HitterPosition::Catcher]);
        let ranked = vec![
            player("FA Good", "Free Agent", c.clone(), Some(2.0), Some(1.0)),
            player("FA Meh", "fa", c.clone(), Some(0.5), Some(0.5)),
            player("Mine Weak", "My Team", c.clone(), Some(0.2), Some(0.0)),
            player("Mine Strong", "my team", c.clone(), Some(1.8), Some(1.5)),
            player("Rival", "Other", c, Some(3.0), Some(3.0)),
        ];
        let out = suggest_upgrades(&ranked, "My Team", &UpgradeConfig::default());
        let catchers: Vec<&UpgradeSuggestion> = out
            .iter()
            .filter(|s| s.target == UpgradeTarget::Position(HitterPosition::Catcher))
            .collect();
        assert_eq!(catchers.len(), 2);

        assert_eq!(catchers[0].free_agent, "FA Good");
        let first = catchers[0].comparison.as_ref().unwrap();
        assert_eq!(first.roster_player, "Mine Weak");
        assert!(approx_eq(first.proj_delta.unwrap(), 1.8));
        assert!(approx_eq(first.curr_delta.unwrap(), 1.0));
        assert!(approx_eq(first.weighted_delta.unwrap(), 0.8 * 1.8 + 0.2 * 1.0));
        assert_eq!(first.verdict, UpgradeVerdict::StrongUpgrade);

        let second = catchers[1].comparison.as_ref().unwrap();
        assert_eq!(second.roster_player, "Mine Strong");
        assert_eq!(second.verdict, UpgradeVerdict::Underperforming);
    }

    #[test]
    fn missing_score_is_inconclusive() {
        let of = hitter(&[HitterPosition::Outfield]);
        let ranked = vec![
            player("FA", "Free Agent", of.clone(), Some(1.0), None),
            player("Mine", "My Team", of, Some(0.5), Some(0.5)),
        ];
        let out = suggest_upgrades(&ranked, "My Team", &UpgradeConfig::default());
        let cmp = out[0].comparison.as_ref().unwrap();
        assert_eq!(cmp.curr_delta, None);
        assert_eq!(cmp.weighted_delta, None);
        assert_eq!(cmp.verdict, UpgradeVerdict::Inconclusive);
    }

    #[test]
    fn empty_position_lists_top_free_agents() {
        let ranked: Vec<RankedPlayer> = (0..8)
            .map(|i| {
                player(
                    &format!("Arm {i}"),
                    "Free Agent",
                    RoleClass::Pitcher,
                    Some(i as f64),
                    None,
                )
            })
            .collect();
        let out = suggest_upgrades(&ranked, "My Team", &UpgradeConfig::default());
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|s| s.comparison.is_none()));
        assert_eq!(out[0].free_agent, "Arm 7");
        assert_eq!(out[4].free_agent, "Arm 3");
    }
}
