// CSV tables: roster, stat and drafted-player inputs, plus the ranked,
// draft-board and upgrade outputs.

use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

use draftboard_core::draft::{DraftBoardEntry, DraftLedger, DraftStatus};
use draftboard_core::identity::PlayerKey;
use draftboard_core::records::{Metric, RosterRecord, Snapshot, StatLine, StatRecord};
use draftboard_core::positions::split_slots;
use draftboard_core::upgrades::UpgradeSuggestion;
use draftboard_core::valuation::RankedPlayer;

/// Errors from reading or writing a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} has no {column} column")]
    MissingColumn { path: String, column: &'static str },
}

const NAME_HEADERS: &[&str] = &["Name", "name", "Player", "player"];
const TEAM_HEADERS: &[&str] = &["Team", "team"];
const ADP_HEADERS: &[&str] = &["ADP", "adp", "proj_ADP"];

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRosterRow {
    #[serde(alias = "name", alias = "Player", alias = "player")]
    Name: String,
    #[serde(default, alias = "team")]
    Team: String,
    #[serde(default, alias = "position", alias = "positions", alias = "Position")]
    eligible_positions: String,
    #[serde(default)]
    fantasy_team: String,
    #[serde(default)]
    injury_status: String,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawDraftedRow {
    #[serde(alias = "name", alias = "Player", alias = "player")]
    Name: String,
    #[serde(default, alias = "team")]
    Team: String,
    #[serde(default, alias = "drafted", alias = "Drafted_By", alias = "drafted_by")]
    Drafted: String,
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Read a roster table. Rows with a blank name or malformed fields are
/// logged and skipped.
pub fn read_roster<R: Read>(rdr: R, source: &str) -> Result<Vec<RosterRecord>, TableError> {
    let mut reader = csv::Reader::from_reader(rdr);
    require_name_column(&mut reader, source)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRosterRow>() {
        match result {
            Ok(raw) if raw.Name.trim().is_empty() => {
                warn!("Skipping roster row with blank name in {source}");
            }
            Ok(raw) => rows.push(RosterRecord {
                name: raw.Name.trim().to_string(),
                team: raw.Team.trim().to_string(),
                eligible_slots: split_slots(&raw.eligible_positions),
                fantasy_team: non_empty(raw.fantasy_team),
                injury_status: non_empty(raw.injury_status),
            }),
            Err(e) => warn!("Skipping malformed roster row in {source}: {e}"),
        }
    }
    Ok(rows)
}

/// Read a stat table. Metric columns are recognised by their `proj_` or
/// `curr_` prefix; anything else is ignored. Blank or unparseable cells are
/// missing values.
pub fn read_stats<R: Read>(rdr: R, source: &str) -> Result<Vec<StatRecord>, TableError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader.headers().map_err(csv_error(source))?.clone();

    let name_idx = find_column(&headers, NAME_HEADERS).ok_or(TableError::MissingColumn {
        path: source.to_string(),
        column: "Name",
    })?;
    let team_idx = find_column(&headers, TEAM_HEADERS);
    let adp_idx = find_column(&headers, ADP_HEADERS);
    let metric_cols: Vec<(usize, Snapshot, Metric)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| Snapshot::parse_column(h).map(|(s, m)| (i, s, m)))
        .collect();
    if metric_cols.is_empty() {
        warn!("{source} has no proj_/curr_ metric columns");
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping malformed stat row in {source}: {e}");
                continue;
            }
        };
        let name = row.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            warn!("Skipping stat row with blank name in {source}");
            continue;
        }

        let mut proj = StatLine::new();
        let mut curr = StatLine::new();
        for &(i, snapshot, metric) in &metric_cols {
            let Some(value) = parse_cell(row.get(i), source, name) else {
                continue;
            };
            match snapshot {
                Snapshot::Projected => proj.set(metric, value),
                Snapshot::Current => curr.set(metric, value),
            }
        }

        rows.push(StatRecord {
            name: name.to_string(),
            team: team_idx
                .and_then(|i| row.get(i))
                .unwrap_or("")
                .trim()
                .to_string(),
            proj,
            curr,
            adp: adp_idx.and_then(|i| parse_cell(row.get(i), source, name)),
        });
    }
    Ok(rows)
}

/// Read a drafted-players table into a ledger. A blank `Drafted` cell
/// leaves the player undrafted.
pub fn read_ledger<R: Read>(rdr: R, source: &str) -> Result<DraftLedger, TableError> {
    let mut reader = csv::Reader::from_reader(rdr);
    require_name_column(&mut reader, source)?;

    let mut ledger = DraftLedger::new();
    for result in reader.deserialize::<RawDraftedRow>() {
        match result {
            Ok(raw) if raw.Name.trim().is_empty() => {
                warn!("Skipping drafted row with blank name in {source}");
            }
            Ok(raw) => {
                let key = PlayerKey::new(&raw.Name, &raw.Team);
                match DraftStatus::from_marker(&raw.Drafted) {
                    DraftStatus::Undrafted => {}
                    DraftStatus::Drafted => ledger.mark_drafted(key, ""),
                    DraftStatus::DraftedBy(team) => ledger.mark_drafted(key, &team),
                }
            }
            Err(e) => warn!("Skipping malformed drafted row in {source}: {e}"),
        }
    }
    Ok(ledger)
}

// ---------------------------------------------------------------------------
// Path loaders
// ---------------------------------------------------------------------------

pub fn load_roster(path: &Path) -> Result<Vec<RosterRecord>, TableError> {
    let label = path.display().to_string();
    let rows = read_roster(open(path)?, &label)?;
    info!("Loaded {} roster rows from {label}", rows.len());
    Ok(rows)
}

pub fn load_stats(path: &Path) -> Result<Vec<StatRecord>, TableError> {
    let label = path.display().to_string();
    let rows = read_stats(open(path)?, &label)?;
    info!("Loaded {} stat rows from {label}", rows.len());
    Ok(rows)
}

pub fn load_ledger(path: &Path) -> Result<DraftLedger, TableError> {
    let label = path.display().to_string();
    let ledger = read_ledger(open(path)?, &label)?;
    info!("Loaded {} drafted players from {label}", ledger.len());
    Ok(ledger)
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Ranked table: identity, role, both snapshots' raw stats and every score
/// column, in rank order.
pub fn write_rankings<W: Write>(w: W, ranked: &[RankedPlayer]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(w);

    let mut header: Vec<String> = ["Name", "Team", "Position", "Fantasy_Team", "Match", "ADP"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for snapshot in Snapshot::ALL {
        header.extend(Metric::ALL.iter().map(|&m| snapshot.column(m)));
    }
    for snapshot in Snapshot::ALL {
        let p = snapshot.prefix();
        header.extend([
            format!("{p}CompositeScore"),
            format!("{p}StatsUsed"),
            format!("{p}PositionZScore"),
            format!("{p}Percentile"),
            format!("{p}ValueAboveReplacement"),
        ]);
    }
    header.push("ScoreDelta".into());
    writer.write_record(&header)?;

    for player in ranked {
        let r = &player.record;
        let mut row = vec![
            r.display_name(),
            r.team.clone(),
            r.position.label(),
            r.fantasy_team.clone().unwrap_or_default(),
            r.stat_match.label().to_string(),
            fmt_opt(r.adp),
        ];
        for snapshot in Snapshot::ALL {
            let line = r.line(snapshot);
            row.extend(Metric::ALL.iter().map(|&m| fmt_opt(line.get(m))));
        }
        for snapshot in Snapshot::ALL {
            let score = player.score(snapshot);
            if score.qualified {
                row.extend([
                    fmt(score.composite),
                    score.stats_used.to_string(),
                    fmt(score.position_zscore),
                    fmt(score.percentile),
                    fmt(score.value_above_replacement),
                ]);
            } else {
                row.extend(vec![String::new(); 5]);
            }
        }
        row.push(fmt(player.score_delta));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

const BOARD_STATS: [Metric; 10] = [
    Metric::Ab,
    Metric::Woba,
    Metric::Iso,
    Metric::Wbsr,
    Metric::WrcPlus,
    Metric::Ip,
    Metric::Fip,
    Metric::Whip,
    Metric::KMinusBbPct,
    Metric::Sv,
];

/// Draft board view. The `Drafted` column comes from the ledger.
pub fn write_board<'a, W, I>(w: W, entries: I, ledger: &DraftLedger) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a DraftBoardEntry>,
{
    let mut writer = csv::Writer::from_writer(w);

    let mut header: Vec<String> = [
        "Name",
        "Position",
        "Team",
        "Drafted",
        "Eligible_Positions",
        "CompositeScore",
        "Adjusted_CompositeScore",
        "Suggested_Draft_Round",
        "Real_Rank",
        "Adjusted_Rank",
        "Tier",
        "VADP",
        "ADP",
        "Fantasy_Team",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(BOARD_STATS.iter().map(|m| m.column().to_string()));
    writer.write_record(&header)?;

    for entry in entries {
        let r = &entry.record;
        let eligible: Vec<&str> = entry.eligible.iter().map(|s| s.label()).collect();
        let mut row = vec![
            r.display_name(),
            r.position.label(),
            r.team.clone(),
            ledger.status(&r.key).marker().to_string(),
            eligible.join(", "),
            fmt(entry.composite_score),
            fmt(entry.adjusted_score),
            entry.suggested_round.map(|n| n.to_string()).unwrap_or_default(),
            entry.real_rank.to_string(),
            entry.adjusted_rank.to_string(),
            entry.tier.to_string(),
            fmt_opt(entry.vadp),
            fmt_opt(entry.adp()),
            r.fantasy_team.clone().unwrap_or_default(),
        ];
        row.extend(BOARD_STATS.iter().map(|&m| fmt_opt(r.proj.get(m))));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_upgrades<W: Write>(w: W, suggestions: &[UpgradeSuggestion]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(w);
    writer.write_record([
        "Position",
        "Free_Agent",
        "FA_Proj_Score",
        "FA_Curr_Score",
        "Roster_Player",
        "Roster_Proj_Score",
        "Roster_Curr_Score",
        "Proj_Delta",
        "Curr_Delta",
        "Weighted_Delta",
        "Verdict",
    ])?;

    for s in suggestions {
        let mut row = vec![
            s.target.label().to_string(),
            s.free_agent.clone(),
            fmt_opt(s.fa_proj),
            fmt_opt(s.fa_curr),
        ];
        match &s.comparison {
            Some(c) => row.extend([
                c.roster_player.clone(),
                fmt_opt(c.roster_proj),
                fmt_opt(c.roster_curr),
                fmt_opt(c.proj_delta),
                fmt_opt(c.curr_delta),
                fmt_opt(c.weighted_delta),
                c.verdict.label().to_string(),
            ]),
            None => row.extend(vec![String::new(); 7]),
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Create `path` and hand a writer to `write`, attaching the path to any
/// error.
pub fn save<F>(path: &Path, write: F) -> Result<(), TableError>
where
    F: FnOnce(File) -> Result<(), csv::Error>,
{
    let label = path.display().to_string();
    let file = File::create(path).map_err(|e| TableError::Io {
        path: label.clone(),
        source: e,
    })?;
    write(file).map_err(csv_error(&label))?;
    info!("Wrote {label}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<File, TableError> {
    File::open(path).map_err(|e| TableError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(source: &str) -> impl Fn(csv::Error) -> TableError + '_ {
    move |e| TableError::Csv {
        path: source.to_string(),
        source: e,
    }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.trim()))
}

fn require_name_column<R: Read>(
    reader: &mut csv::Reader<R>,
    source: &str,
) -> Result<(), TableError> {
    let headers = reader.headers().map_err(csv_error(source))?;
    match find_column(headers, NAME_HEADERS) {
        Some(_) => Ok(()),
        None => Err(TableError::MissingColumn {
            path: source.to_string(),
            column: "Name",
        }),
    }
}

/// Blank cells are missing. Unparseable cells are missing too, with a
/// warning. A trailing `%` is dropped.
fn parse_cell(cell: Option<&str>, source: &str, player: &str) -> Option<f64> {
    let raw = cell?.trim();
    if raw.is_empty() {
        return None;
    }
    let number = raw.strip_suffix('%').unwrap_or(raw).trim();
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!("Unparseable value {raw:?} for {player} in {source}");
            None
        }
    }
}

fn fmt(v: f64) -> String {
    format!("{v:.4}")
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(fmt).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
