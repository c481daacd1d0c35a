// End-to-end run over the CSV fixtures: load, rank, build the board, seed
// the ledger and write every output table.

use std::path::PathBuf;

use draftboard_cli::report::{build_report, write_report};
use draftboard_core::config::{Config, DataPaths, LeagueConfig};
use draftboard_core::draft::DraftStatus;
use draftboard_core::identity::PlayerKey;
use draftboard_core::records::StatMatch;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_config() -> Config {
    Config {
        league: LeagueConfig {
            my_team: "My Team".into(),
        },
        data_paths: DataPaths {
            roster: "roster.csv".into(),
            hitters: "hitters.csv".into(),
            pitchers: "pitchers.csv".into(),
            drafted: Some("drafted.csv".into()),
            output_dir: "output".into(),
        },
        ..Config::default()
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("draftboard_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[test]
fn playing_time_filter_drops_part_timers() {
    let report = build_report(&fixture_config(), &fixtures_dir()).unwrap();
    let names: Vec<&str> = report.ranked.iter().map(|p| p.record.name.as_str()).collect();
    assert!(!names.contains(&"Rookie Callup"), "100 AB must not be ranked");
    assert!(!names.contains(&"Spot Starter"), "40 IP non-closer must not be ranked");
    assert!(names.contains(&"Emmanuel Clase"), "closers qualify on saves");
}

#[test]
fn traded_player_takes_stats_by_name() {
    let report = build_report(&fixture_config(), &fixtures_dir()).unwrap();
    let soto = report
        .ranked
        .iter()
        .find(|p| p.record.name == "Juan Soto")
        .expect("Soto ranked");
    assert_eq!(soto.record.stat_match, StatMatch::NameFallback);
    assert_eq!(soto.record.team, "NYM");
    assert_eq!(soto.record.adp, Some(3.1));
}

#[test]
fn stat_only_rows_survive_outer_join() {
    let report = build_report(&fixture_config(), &fixtures_dir()).unwrap();
    let sale = report
        .ranked
        .iter()
        .find(|p| p.record.name == "Chris Sale")
        .expect("Sale ranked");
    assert_eq!(sale.record.stat_match, StatMatch::StatOnly);
    assert!(sale.record.position.is_pitcher());
}

#[test]
fn ledger_seeded_from_drafted_table() {
    let report = build_report(&fixture_config(), &fixtures_dir()).unwrap();
    assert_eq!(report.ledger.len(), 2);
    assert_eq!(
        report.ledger.status(&PlayerKey::new("Bobby Witt Jr.", "KC")),
        &DraftStatus::DraftedBy("Rival Squad".into())
    );
    assert_eq!(
        report.ledger.status(&PlayerKey::new("Tarik Skubal", "DET")),
        &DraftStatus::Drafted
    );

    let available: Vec<&str> = report
        .ledger
        .available(&report.board)
        .map(|e| e.record.name.as_str())
        .collect();
    assert!(!available.contains(&"Bobby Witt Jr."));
    assert!(!available.contains(&"Tarik Skubal"));
}

#[test]
fn upgrades_compare_against_my_roster() {
    let report = build_report(&fixture_config(), &fixtures_dir()).unwrap();
    let catcher = report
        .upgrades
        .iter()
        .find(|s| s.target.label() == "C")
        .expect("catcher suggestion");
    assert_eq!(catcher.free_agent, "Will Smith");
    let comparison = catcher.comparison.as_ref().expect("rostered catcher");
    assert_eq!(comparison.roster_player, "Adley Rutschman");
    assert!(comparison.weighted_delta.is_some());
}

#[test]
fn same_inputs_give_same_report() {
    let a = build_report(&fixture_config(), &fixtures_dir()).unwrap();
    let b = build_report(&fixture_config(), &fixtures_dir()).unwrap();
    assert_eq!(a.ranked, b.ranked);
    assert_eq!(a.board, b.board);
    assert_eq!(a.upgrades, b.upgrades);
}

// ---------------------------------------------------------------------------
// Output tables
// ---------------------------------------------------------------------------

#[test]
fn writes_every_table() {
    let report = build_report(&fixture_config(), &fixtures_dir()).unwrap();
    let out = scratch_dir("writes_every_table");
    let written = write_report(&report, &out, "20240301_120000").unwrap();

    let ranked_path = out.join("free_agents_ranked_20240301_120000.csv");
    let board_dir = out.join("draft_board_20240301_120000");
    let upgrades_path = out.join("upgrades_20240301_120000.csv");
    for path in [
        &ranked_path,
        &board_dir.join("all.csv"),
        &board_dir.join("hitters.csv"),
        &board_dir.join("pitchers.csv"),
        &upgrades_path,
    ] {
        assert!(path.exists(), "{} missing", path.display());
        assert!(written.contains(path));
    }

    let ranked = std::fs::read_to_string(&ranked_path).unwrap();
    assert!(ranked.contains("Kyle Tucker (IL10)"));
    assert!(ranked.contains("Riley Greene,DET"), "ACTIVE is not annotated");
    assert!(!ranked.contains("Rookie Callup"));

    let board = std::fs::read_to_string(board_dir.join("all.csv")).unwrap();
    let header = board.lines().next().unwrap();
    assert!(header.starts_with("Name,Position,Team,Drafted,Eligible_Positions"));
    assert!(board
        .lines()
        .any(|l| l.starts_with("Bobby Witt Jr.,SS,KC,Rival Squad,")));

    let pitchers = std::fs::read_to_string(board_dir.join("pitchers.csv")).unwrap();
    assert!(!pitchers.contains("Freddie Freeman"));

    let upgrades = std::fs::read_to_string(&upgrades_path).unwrap();
    assert!(upgrades.starts_with("Position,Free_Agent,"));

    let _ = std::fs::remove_dir_all(&out);
}
