// Draft adjustment engine: turns ranked players into an ordered draft board
// with scarcity-adjusted scores, ranks, value over ADP, tiers, and a
// suggested round.

use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::config::{AdjustmentConfig, DraftConfig};
use crate::draft::depth::{compute_positional_depth, PositionDepthTable};
use crate::draft::round::suggested_round;
use crate::draft::tiers::TierCutoffs;
use crate::positions::{eligible_slots, DraftSlot, LEAGUE_POSITIONS};
use crate::records::PlayerRecord;
use crate::valuation::RankedPlayer;
use crate::valuation::rank::min_rank_desc;

// ---------------------------------------------------------------------------
// Board types
// ---------------------------------------------------------------------------

/// One row of the draft board.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftBoardEntry {
    pub record: PlayerRecord,
    pub eligible: BTreeSet<DraftSlot>,
    /// Projected composite score carried over from valuation.
    pub composite_score: f64,
    pub adjusted_score: f64,
    /// Competition rank on `composite_score`, 1 = best.
    pub real_rank: usize,
    /// Competition rank on `adjusted_score`, 1 = best.
    pub adjusted_rank: usize,
    pub tier: u8,
    /// `adjusted_rank - ADP`; negative means the board likes the player more
    /// than the market does.
    pub vadp: Option<f64>,
    pub suggested_round: Option<u32>,
}

impl DraftBoardEntry {
    pub fn adp(&self) -> Option<f64> {
        self.record.adp
    }

    pub fn is_pitcher(&self) -> bool {
        self.eligible.contains(&DraftSlot::Pitcher)
    }
}

/// The full board, ordered by adjusted score descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftBoard {
    pub entries: Vec<DraftBoardEntry>,
    pub depth: PositionDepthTable,
    pub tier_cutoffs: Option<TierCutoffs>,
}

impl DraftBoard {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn hitters(&self) -> impl Iterator<Item = &DraftBoardEntry> {
        self.entries.iter().filter(|e| !e.is_pitcher())
    }

    pub fn pitchers(&self) -> impl Iterator<Item = &DraftBoardEntry> {
        self.entries.iter().filter(|e| e.is_pitcher())
    }

    pub fn at_position(&self, slot: DraftSlot) -> impl Iterator<Item = &DraftBoardEntry> {
        self.entries.iter().filter(move |e| e.eligible.contains(&slot))
    }

    /// One view per league position, skipping positions nobody on the
    /// board can fill.
    pub fn position_views(&self) -> Vec<(DraftSlot, Vec<&DraftBoardEntry>)> {
        LEAGUE_POSITIONS
            .iter()
            .map(|&slot| (slot, self.at_position(slot).collect::<Vec<_>>()))
            .filter(|(_, entries)| !entries.is_empty())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

/// Bonus for a player eligible at a scarce slot. Better-ranked players get
/// a larger share: `mult * score * (1 + weight * (max_rank - rank) / max_rank)`.
pub fn scarce_bonus(score: f64, real_rank: usize, max_rank: usize, adj: &AdjustmentConfig) -> f64 {
    let rank_factor = if max_rank == 0 {
        0.0
    } else {
        (max_rank - real_rank.min(max_rank)) as f64 / max_rank as f64
    };
    adj.scarce_multiplier * score * (1.0 + adj.scarce_rank_weight * rank_factor)
}

/// Penalty for a player eligible at a deep slot: `-mult * score`.
pub fn deep_penalty(score: f64, adj: &AdjustmentConfig) -> f64 {
    -adj.deep_multiplier * score
}

// ---------------------------------------------------------------------------
// Board construction
// ---------------------------------------------------------------------------

/// Build the draft board from ranked players.
///
/// Players are valued on their projected composite. Unscored rows (zero or
/// non-finite composite) and rows below `min_composite_score` are dropped,
/// then the board is cut to `top_n_players`. Depth is measured on what
/// remains.
pub fn build_draft_board(ranked: &[RankedPlayer], config: &DraftConfig) -> DraftBoard {
    let mut candidates: Vec<(&RankedPlayer, f64)> = ranked
        .iter()
        .map(|p| (p, p.proj.composite))
        .filter(|(_, score)| score.is_finite() && *score != 0.0)
        .filter(|(_, score)| *score >= config.min_composite_score)
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(config.top_n_players);

    if candidates.is_empty() {
        warn!(input = ranked.len(), "no scored players left for the draft board");
        return DraftBoard::default();
    }

    let eligible: Vec<BTreeSet<DraftSlot>> = candidates
        .iter()
        .map(|(p, _)| eligible_slots(&p.record.position))
        .collect();
    let depth = compute_positional_depth(&eligible, config);

    let scores: Vec<f64> = candidates.iter().map(|(_, s)| *s).collect();
    let real_ranks = min_rank_desc(&scores);
    let max_rank = real_ranks.iter().copied().max().unwrap_or(0);
    let adj = &config.adjustment;

    let adjusted: Vec<f64> = scores
        .iter()
        .zip(&real_ranks)
        .zip(&eligible)
        .map(|((&score, &rank), slots)| {
            let mut value = score;
            if depth.any_scarce(slots) {
                value += scarce_bonus(score, rank, max_rank, adj);
            }
            if depth.any_deep(slots) {
                value += deep_penalty(score, adj);
            }
            value
        })
        .collect();
    let adjusted_ranks = min_rank_desc(&adjusted);
    let tier_cutoffs = TierCutoffs::from_scores(&scores);

    let mut entries: Vec<DraftBoardEntry> = candidates
        .into_iter()
        .zip(eligible)
        .enumerate()
        .map(|(i, ((player, score), slots))| {
            let adjusted_rank = adjusted_ranks[i];
            let adp = player.record.adp;
            let vadp = adp.map(|a| adjusted_rank as f64 - a);
            DraftBoardEntry {
                record: player.record.clone(),
                eligible: slots,
                composite_score: score,
                adjusted_score: adjusted[i],
                real_rank: real_ranks[i],
                adjusted_rank,
                tier: tier_cutoffs.map(|t| t.tier_for(score)).unwrap_or(0),
                vadp,
                suggested_round: suggested_round(
                    adp,
                    Some(adjusted_rank as f64),
                    vadp,
                    &config.round,
                ),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.adjusted_score.total_cmp(&a.adjusted_score));

    info!(
        players = entries.len(),
        scarce = depth.scarce.len(),
        deep = depth.deep.len(),
        "draft board built"
    );

    DraftBoard {
        entries,
        depth,
        tier_cutoffs,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdConfig;
    use crate::identity::PlayerKey;
    use crate::positions::{HitterPosition, RoleClass};
    use crate::records::{StatLine, StatMatch};
    use crate::valuation::SnapshotScore;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn role(positions: &[HitterPosition]) -> RoleClass {
        RoleClass::Hitter(positions.iter().copied().collect())
    }

    fn ranked(name: &str, position: RoleClass, score: f64, adp: Option<f64>) -> RankedPlayer {
        let group = position.group();
        RankedPlayer {
            record: PlayerRecord {
                key: PlayerKey::new(name, "SEA"),
                name: name.into(),
                team: "SEA".into(),
                eligible_slots: Vec::new(),
                position,
                fantasy_team: None,
                injury_status: None,
                proj: StatLine::new(),
                curr: StatLine::new(),
                adp,
                stat_match: StatMatch::TeamJoin,
            },
            group,
            proj: SnapshotScore {
                qualified: true,
                composite: score,
                ..Default::default()
            },
            curr: SnapshotScore::default(),
            score_delta: -score,
        }
    }

    /// Scarce at <= 2 candidates, deep at >= 4.
    fn small_config() -> DraftConfig {
        DraftConfig {
            scarcity: ThresholdConfig { base: 2, bonus: 0 },
            depth: ThresholdConfig { base: 4, bonus: 0 },
            ..DraftConfig::default()
        }
    }

    fn entry<'a>(board: &'a DraftBoard, name: &str) -> &'a DraftBoardEntry {
        board
            .entries
            .iter()
            .find(|e| e.record.name == name)
            .unwrap()
    }

    #[test]
    fn scarce_bonus_grows_with_score_and_rank() {
        let adj = AdjustmentConfig::default();
        // Rank 1 of 4 vs rank 4 of 4.
        let top = scarce_bonus(2.0, 1, 4, &adj);
        let low = scarce_bonus(1.0, 4, 4, &adj);
        assert!(approx_eq(top, 0.15 * 2.0 * (1.0 + 0.75 * 0.75)));
        assert!(approx_eq(low, 0.15 * 1.0));
        assert!(top > low);
    }

    #[test]
    fn deep_penalty_is_proportional() {
        assert!(approx_eq(deep_penalty(2.0, &AdjustmentConfig::default()), -0.5));
    }

    #[test]
    fn two_scarce_catchers_higher_score_gets_larger_bonus() {
        let c = role(&[HitterPosition::Catcher]);
        let players = vec![
            ranked("Catcher A", c.clone(), 2.0, Some(20.0)),
            ranked("Catcher B", c, 1.0, Some(60.0)),
        ];
        let config = DraftConfig {
            depth: ThresholdConfig { base: 50, bonus: 0 },
            ..small_config()
        };
        let board = build_draft_board(&players, &config);
        let a = entry(&board, "Catcher A");
        let b = entry(&board, "Catcher B");
        assert!(board.depth.is_scarce(DraftSlot::Catcher));
        assert!(a.adjusted_score - a.composite_score > b.adjusted_score - b.composite_score);
        // max_rank is 2: A gets 0.15*2*(1+0.75*0.5), B gets 0.15*1.
        assert!(approx_eq(a.adjusted_score, 2.0 + 0.15 * 2.0 * 1.375));
        assert!(approx_eq(b.adjusted_score, 1.15));
    }

    #[test]
    fn deep_position_is_penalized() {
        let of = role(&[HitterPosition::Outfield]);
        let c = role(&[HitterPosition::Catcher]);
        let mut players: Vec<RankedPlayer> = (0..4)
            .map(|i| ranked(&format!("OF {i}"), of.clone(), 3.0 - i as f64 * 0.5, None))
            .collect();
        players.push(ranked("Catcher", c, 1.4, None));
        let board = build_draft_board(&players, &small_config());

        assert!(board.depth.is_deep(DraftSlot::Outfield));
        assert!(board.depth.is_deep(DraftSlot::Utility));
        let top_of = entry(&board, "OF 0");
        assert!(approx_eq(top_of.adjusted_score, 3.0 * 0.75));
        // Catcher is scarce and also at deep UTIL: bonus and penalty both apply.
        let catcher = entry(&board, "Catcher");
        let expected = 1.4 + scarce_bonus(1.4, 5, 5, &small_config().adjustment) - 0.25 * 1.4;
        assert!(approx_eq(catcher.adjusted_score, expected));
    }

    #[test]
    fn unscored_and_low_scores_dropped() {
        let of = role(&[HitterPosition::Outfield]);
        let players = vec![
            ranked("Good", of.clone(), 1.5, None),
            ranked("Zero", of.clone(), 0.0, None),
            ranked("Negative", of.clone(), -0.7, None),
            ranked("Nan", of, f64::NAN, None),
        ];
        let board = build_draft_board(&players, &DraftConfig::default());
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries[0].record.name, "Good");
    }

    #[test]
    fn truncated_to_top_n() {
        let of = role(&[HitterPosition::Outfield]);
        let players: Vec<RankedPlayer> = (1..=10)
            .map(|i| ranked(&format!("P{i}"), of.clone(), i as f64, None))
            .collect();
        let config = DraftConfig {
            top_n_players: 3,
            ..DraftConfig::default()
        };
        let board = build_draft_board(&players, &config);
        let names: Vec<&str> = board.entries.iter().map(|e| e.record.name.as_str()).collect();
        assert_eq!(names, vec!["P10", "P9", "P8"]);
    }

    #[test]
    fn empty_input_gives_empty_board() {
        let board = build_draft_board(&[], &DraftConfig::default());
        assert!(board.is_empty());
        assert!(board.tier_cutoffs.is_none());
    }

    #[test]
    fn tied_scores_share_real_rank() {
        let of = role(&[HitterPosition::Outfield]);
        let players = vec![
            ranked("A", of.clone(), 2.0, None),
            ranked("B", of.clone(), 2.0, None),
            ranked("C", of, 1.0, None),
        ];
        let board = build_draft_board(&players, &DraftConfig::default());
        assert_eq!(entry(&board, "A").real_rank, 1);
        assert_eq!(entry(&board, "B").real_rank, 1);
        assert_eq!(entry(&board, "C").real_rank, 3);
    }

    #[test]
    fn missing_adp_leaves_vadp_and_round_empty() {
        let of = role(&[HitterPosition::Outfield]);
        let players = vec![
            ranked("Known", of.clone(), 2.0, Some(12.0)),
            ranked("Unknown", of, 1.0, None),
        ];
        let board = build_draft_board(&players, &DraftConfig::default());

        let unknown = entry(&board, "Unknown");
        assert_eq!(unknown.vadp, None);
        assert_eq!(unknown.suggested_round, None);
        assert!((1..=5).contains(&unknown.tier));
        assert_eq!(unknown.adjusted_rank, 2);

        let known = entry(&board, "Known");
        assert_eq!(known.vadp, Some(1.0 - 12.0));
        assert!(known.suggested_round.is_some());
    }

    #[test]
    fn board_sorted_by_adjusted_score() {
        let of = role(&[HitterPosition::Outfield]);
        let c = role(&[HitterPosition::Catcher]);
        let mut players: Vec<RankedPlayer> = (0..4)
            .map(|i| ranked(&format!("OF {i}"), of.clone(), 2.0 - i as f64 * 0.1, None))
            .collect();
        players.push(ranked("Catcher", c, 1.8, None));
        let board = build_draft_board(&players, &small_config());
        assert!(board
            .entries
            .windows(2)
            .all(|w| w[0].adjusted_score >= w[1].adjusted_score));
        assert_eq!(board.entries[0].adjusted_rank, 1);
    }

    #[test]
    fn views_split_by_role_and_slot() {
        let players = vec![
            ranked("First", role(&[HitterPosition::FirstBase]), 2.0, None),
            ranked("Short", role(&[HitterPosition::ShortStop]), 1.5, None),
            ranked("Arm", RoleClass::Pitcher, 1.0, None),
        ];
        let board = build_draft_board(&players, &DraftConfig::default());
        assert_eq!(board.hitters().count(), 2);
        assert_eq!(board.pitchers().count(), 1);
        assert_eq!(board.at_position(DraftSlot::CornerInfield).count(), 1);

        let views = board.position_views();
        let labels: Vec<&str> = views.iter().map(|(s, _)| s.label()).collect();
        assert_eq!(labels, vec!["1B", "SS", "P", "MI", "CI"]);
    }
}
