// Configuration loading and parsing (league.toml, strategy.toml).

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::merge::JoinKind;
use crate::positions::{CompoundSlotPolicy, RoleGroup};
use crate::records::Metric;

/// Tolerance for "weights sum to one".
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub league: LeagueConfig,
    pub scoring: ScoringConfig,
    pub draft: DraftConfig,
    pub upgrades: UpgradeConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LeagueConfig {
    /// The user's fantasy team name, used by the upgrade finder.
    #[serde(default)]
    pub my_team: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub roster: String,
    pub hitters: String,
    pub pitchers: String,
    /// Optional Name,Team,Drafted ledger seeding draft status.
    #[serde(default)]
    pub drafted: Option<String>,
    pub output_dir: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            roster: "data/roster.csv".into(),
            hitters: "data/hitters.csv".into(),
            pitchers: "data/pitchers.csv".into(),
            drafted: None,
            output_dir: "output".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    scoring: ScoringSection,
    draft: DraftConfig,
    upgrades: UpgradeConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct ScoringSection {
    #[serde(default)]
    join: JoinKind,
    #[serde(default)]
    compound_slots: CompoundSlotPolicy,
    hitter: ProfileSection,
    pitcher: ProfileSection,
    eligibility: EligibilityConfig,
}

/// Metric names are kept as strings until validation so an unknown metric
/// reports the offending key rather than a generic parse error.
#[derive(Debug, Clone, Deserialize)]
struct ProfileSection {
    weights: BTreeMap<String, f64>,
    #[serde(default)]
    invert: Vec<String>,
}

/// Scoring settings assembled from `[scoring]`.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub join: JoinKind,
    pub compound_slots: CompoundSlotPolicy,
    pub hitter: StatWeightProfile,
    pub pitcher: StatWeightProfile,
    pub eligibility: EligibilityConfig,
}

impl ScoringConfig {
    pub fn profile(&self, group: RoleGroup) -> &StatWeightProfile {
        match group {
            RoleGroup::Hitter => &self.hitter,
            RoleGroup::Pitcher => &self.pitcher,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            join: JoinKind::Outer,
            compound_slots: CompoundSlotPolicy::Ignore,
            hitter: StatWeightProfile::hitter_default(),
            pitcher: StatWeightProfile::pitcher_default(),
            eligibility: EligibilityConfig::default(),
        }
    }
}

/// Metric weights for one role group, plus the metrics where lower is better.
#[derive(Debug, Clone, PartialEq)]
pub struct StatWeightProfile {
    pub weights: BTreeMap<Metric, f64>,
    pub invert: BTreeSet<Metric>,
}

impl StatWeightProfile {
    pub fn hitter_default() -> Self {
        StatWeightProfile {
            weights: BTreeMap::from([
                (Metric::Woba, 0.26),
                (Metric::Iso, 0.22),
                (Metric::Wbsr, 0.04),
                (Metric::Ab, 0.31),
                (Metric::WrcPlus, 0.17),
            ]),
            invert: BTreeSet::new(),
        }
    }

    pub fn pitcher_default() -> Self {
        StatWeightProfile {
            weights: BTreeMap::from([
                (Metric::KMinusBbPct, 0.10),
                (Metric::Ip, 0.40),
                (Metric::Whip, 0.05),
                (Metric::Fip, 0.35),
                (Metric::Sv, 0.10),
            ]),
            invert: BTreeSet::from([Metric::Fip, Metric::Whip]),
        }
    }

    pub fn is_inverted(&self, metric: Metric) -> bool {
        self.invert.contains(&metric)
    }
}

/// Playing-time thresholds that gate which rows are scored.
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityConfig {
    pub min_ab: f64,
    pub min_ip: f64,
    /// A pitcher with strictly more saves counts as a closer.
    pub closer_saves: f64,
    pub starter_ip: f64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        EligibilityConfig {
            min_ab: 250.0,
            min_ip: 10.0,
            closer_saves: 20.0,
            starter_ip: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    pub top_n_players: usize,
    pub min_composite_score: f64,
    pub scarcity: ThresholdConfig,
    pub depth: ThresholdConfig,
    pub adjustment: AdjustmentConfig,
    pub round: RoundConfig,
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            top_n_players: 250,
            min_composite_score: 0.0,
            scarcity: ThresholdConfig { base: 10, bonus: 8 },
            depth: ThresholdConfig { base: 30, bonus: 8 },
            adjustment: AdjustmentConfig::default(),
            round: RoundConfig::default(),
        }
    }
}

/// Depth threshold expressed as a base count plus a bonus allowance.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ThresholdConfig {
    pub base: usize,
    pub bonus: usize,
}

impl ThresholdConfig {
    pub fn threshold(&self) -> usize {
        self.base + self.bonus
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentConfig {
    pub scarce_multiplier: f64,
    pub scarce_rank_weight: f64,
    pub deep_multiplier: f64,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        AdjustmentConfig {
            scarce_multiplier: 0.15,
            scarce_rank_weight: 0.75,
            deep_multiplier: 0.25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundConfig {
    pub adp_weight: f64,
    pub rank_weight: f64,
    pub picks_per_round: u32,
    /// VADP blend factor by ADP bracket.
    pub vadp_factors: Vec<Bracket>,
    /// Maximum movement away from ADP, as a fraction of ADP, by bracket.
    pub movement_caps: Vec<Bracket>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig {
            adp_weight: 0.7,
            rank_weight: 0.3,
            picks_per_round: 10,
            vadp_factors: vec![
                Bracket::new(50.0, 0.1),
                Bracket::new(100.0, 0.2),
                Bracket::new(f64::INFINITY, 0.3),
            ],
            movement_caps: vec![
                Bracket::new(50.0, 0.3),
                Bracket::new(100.0, 0.2),
                Bracket::new(f64::INFINITY, 0.1),
            ],
        }
    }
}

/// One step of a piecewise-constant lookup: applies to inputs below `below`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Bracket {
    pub below: f64,
    pub value: f64,
}

impl Bracket {
    pub fn new(below: f64, value: f64) -> Self {
        Bracket { below, value }
    }

    /// Value of the first bracket whose bound exceeds `x`; the last bracket
    /// catches everything else.
    pub fn lookup(brackets: &[Bracket], x: f64) -> f64 {
        brackets
            .iter()
            .find(|b| x < b.below)
            .or_else(|| brackets.last())
            .map(|b| b.value)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeConfig {
    pub proj_weight: f64,
    pub curr_weight: f64,
    pub strong_upgrade: f64,
    pub upgrade: f64,
    pub underperforming: f64,
    pub per_position: usize,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        UpgradeConfig {
            proj_weight: 0.8,
            curr_weight: 0.2,
            strong_upgrade: 0.75,
            upgrade: 0.25,
            underperforming: -0.25,
            per_position: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, relative to the given `base_dir`.
///
/// Does not auto-copy defaults. Prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy = parse_strategy(&strategy_text).map_err(|e| ConfigError::ParseError {
        path: strategy_path.clone(),
        source: e,
    })?;

    let scoring = ScoringConfig {
        join: strategy.scoring.join,
        compound_slots: strategy.scoring.compound_slots,
        hitter: build_profile("scoring.hitter", strategy.scoring.hitter)?,
        pitcher: build_profile("scoring.pitcher", strategy.scoring.pitcher)?,
        eligibility: strategy.scoring.eligibility,
    };

    let config = Config {
        league: league_file.league,
        scoring,
        draft: strategy.draft,
        upgrades: strategy.upgrades,
        data_paths: league_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

fn parse_strategy(text: &str) -> Result<StrategyFile, toml::de::Error> {
    toml::from_str(text)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", path.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Loads config relative to the current working directory, copying default
/// config files first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn build_profile(field: &str, raw: ProfileSection) -> Result<StatWeightProfile, ConfigError> {
    let parse = |name: &str| {
        Metric::from_column(name).ok_or_else(|| ConfigError::ValidationError {
            field: format!("{field}.{name}"),
            message: "unknown metric".into(),
        })
    };

    let mut weights = BTreeMap::new();
    for (name, weight) in &raw.weights {
        weights.insert(parse(name)?, *weight);
    }
    let mut invert = BTreeSet::new();
    for name in &raw.invert {
        invert.insert(parse(name)?);
    }
    Ok(StatWeightProfile { weights, invert })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_profile("scoring.hitter", &config.scoring.hitter)?;
    validate_profile("scoring.pitcher", &config.scoring.pitcher)?;

    let elig = &config.scoring.eligibility;
    let upgrades = &config.upgrades;
    let non_negative: &[(&str, f64)] = &[
        ("scoring.eligibility.min_ab", elig.min_ab),
        ("scoring.eligibility.min_ip", elig.min_ip),
        ("scoring.eligibility.closer_saves", elig.closer_saves),
        ("scoring.eligibility.starter_ip", elig.starter_ip),
        ("draft.round.adp_weight", config.draft.round.adp_weight),
        ("draft.round.rank_weight", config.draft.round.rank_weight),
        ("upgrades.proj_weight", upgrades.proj_weight),
        ("upgrades.curr_weight", upgrades.curr_weight),
    ];
    for (name, val) in non_negative {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be finite and >= 0, got {val}"),
            });
        }
    }

    let draft = &config.draft;
    if draft.top_n_players == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.top_n_players".into(),
            message: "must be greater than 0".into(),
        });
    }
    if draft.round.picks_per_round == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.round.picks_per_round".into(),
            message: "must be greater than 0".into(),
        });
    }
    validate_brackets("draft.round.vadp_factors", &draft.round.vadp_factors)?;
    validate_brackets("draft.round.movement_caps", &draft.round.movement_caps)?;

    if upgrades.strong_upgrade < upgrades.upgrade {
        return Err(ConfigError::ValidationError {
            field: "upgrades.strong_upgrade".into(),
            message: format!(
                "must be >= upgrades.upgrade ({}), got {}",
                upgrades.upgrade, upgrades.strong_upgrade
            ),
        });
    }

    Ok(())
}

fn validate_profile(field: &str, profile: &StatWeightProfile) -> Result<(), ConfigError> {
    if profile.weights.is_empty() {
        return Err(ConfigError::ValidationError {
            field: format!("{field}.weights"),
            message: "must name at least one metric".into(),
        });
    }
    for (metric, weight) in &profile.weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("{field}.weights.{metric}"),
                message: format!("must be finite and >= 0, got {weight}"),
            });
        }
    }
    let sum: f64 = profile.weights.values().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::ValidationError {
            field: format!("{field}.weights"),
            message: format!("must sum to 1.0, got {sum}"),
        });
    }
    Ok(())
}

fn validate_brackets(field: &str, brackets: &[Bracket]) -> Result<(), ConfigError> {
    let Some(last) = brackets.last() else {
        return Err(ConfigError::ValidationError {
            field: field.into(),
            message: "must contain at least one bracket".into(),
        });
    };
    if brackets.windows(2).any(|w| w[0].below >= w[1].below) {
        return Err(ConfigError::ValidationError {
            field: field.into(),
            message: "bracket bounds must be strictly ascending".into(),
        });
    }
    if last.below != f64::INFINITY {
        return Err(ConfigError::ValidationError {
            field: field.into(),
            message: "last bracket must use `below = inf`".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
