// Report assembly: load the configured tables, run valuation and the draft
// pipeline, and write every output table under one timestamp.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::info;

use draftboard_core::config::Config;
use draftboard_core::draft::{build_draft_board, DraftBoard, DraftLedger};
use draftboard_core::upgrades::{suggest_upgrades, UpgradeSuggestion};
use draftboard_core::valuation::{compute_rankings, RankedPlayer};

use crate::tables;

/// Everything one run produces.
#[derive(Debug)]
pub struct Report {
    pub ranked: Vec<RankedPlayer>,
    pub board: DraftBoard,
    pub ledger: DraftLedger,
    pub upgrades: Vec<UpgradeSuggestion>,
}

/// Load the input tables named in `[data_paths]` (relative to `base_dir`)
/// and run the full pipeline.
///
/// A configured drafted table that does not exist yet is treated as an
/// empty ledger.
pub fn build_report(config: &Config, base_dir: &Path) -> anyhow::Result<Report> {
    let paths = &config.data_paths;

    let roster = tables::load_roster(&base_dir.join(&paths.roster))
        .context("failed to load roster")?;
    let hitters = tables::load_stats(&base_dir.join(&paths.hitters))
        .context("failed to load hitter stats")?;
    let pitchers = tables::load_stats(&base_dir.join(&paths.pitchers))
        .context("failed to load pitcher stats")?;

    let ranked = compute_rankings(&roster, &hitters, &pitchers, &config.scoring);
    info!("Ranked {} players", ranked.len());

    let board = build_draft_board(&ranked, &config.draft);
    info!(
        "Draft board holds {} players ({} scarce, {} deep positions)",
        board.len(),
        board.depth.scarce.len(),
        board.depth.deep.len()
    );

    let ledger = match &paths.drafted {
        Some(drafted) if base_dir.join(drafted).exists() => {
            tables::load_ledger(&base_dir.join(drafted)).context("failed to load drafted players")?
        }
        Some(drafted) => {
            info!("No drafted table at {drafted}, starting with an empty ledger");
            DraftLedger::new()
        }
        None => DraftLedger::new(),
    };

    let upgrades = suggest_upgrades(&ranked, &config.league.my_team, &config.upgrades);
    info!(
        "Found {} upgrade suggestions for {}",
        upgrades.len(),
        config.league.my_team
    );

    Ok(Report {
        ranked,
        board,
        ledger,
        upgrades,
    })
}

/// Write the ranked table, the board views and the upgrade table into
/// `out_dir`. Board views go to a `draft_board_{stamp}/` subdirectory with
/// one file per view. Returns every path written.
pub fn write_report(report: &Report, out_dir: &Path, stamp: &str) -> anyhow::Result<Vec<PathBuf>> {
    let board_dir = out_dir.join(format!("draft_board_{stamp}"));
    std::fs::create_dir_all(&board_dir)
        .with_context(|| format!("failed to create {}", board_dir.display()))?;

    let mut written = Vec::new();

    let path = out_dir.join(format!("free_agents_ranked_{stamp}.csv"));
    tables::save(&path, |f| tables::write_rankings(f, &report.ranked))?;
    written.push(path);

    let board = &report.board;
    let ledger = &report.ledger;

    let path = board_dir.join("all.csv");
    tables::save(&path, |f| tables::write_board(f, &board.entries, ledger))?;
    written.push(path);

    let path = board_dir.join("hitters.csv");
    tables::save(&path, |f| tables::write_board(f, board.hitters(), ledger))?;
    written.push(path);

    let path = board_dir.join("pitchers.csv");
    tables::save(&path, |f| tables::write_board(f, board.pitchers(), ledger))?;
    written.push(path);

    for (slot, entries) in board.position_views() {
        let path = board_dir.join(format!("{}.csv", slot.label()));
        tables::save(&path, |f| tables::write_board(f, entries, ledger))?;
        written.push(path);
    }

    let path = out_dir.join(format!("upgrades_{stamp}.csv"));
    tables::save(&path, |f| tables::write_upgrades(f, &report.upgrades))?;
    written.push(path);

    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
