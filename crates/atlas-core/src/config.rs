// Configuration loading and parsing (tournament.toml, dashboard.toml).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

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

#[derive(Debug, Clone)]
pub struct Config {
    pub tournament: TournamentConfig,
    pub passing: AllowList,
    pub defense: AllowList,
    pub heatmap: HeatmapConfig,
    pub radar: RadarConfig,
    pub data: DataPaths,
    pub output_dir: PathBuf,
    pub theme: Theme,
}

// ---------------------------------------------------------------------------
// tournament.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire tournament.toml file.
#[derive(Debug, Clone, Deserialize)]
struct TournamentFile {
    tournament: TournamentConfig,
    passing: AllowList,
    defense: AllowList,
    heatmap: HeatmapConfig,
    radar: RadarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TournamentConfig {
    /// Competition label used to filter the fixtures table (`Comp` column).
    pub competition: String,
    /// Number of matches the squads played; divisor of the per-match view.
    pub matches_played: u32,
    /// Squad the dashboard is about. Used in chart titles.
    pub focus_squad: String,
}

/// Hand-picked players shown on one of the passing/defense bar charts.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowList {
    pub players: Vec<String>,
}

impl AllowList {
    pub fn contains(&self, player: &str) -> bool {
        self.players.iter().any(|p| p == player)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapConfig {
    pub squad: String,
    pub top_n: usize,
    /// Position code dropped before ranking by minutes.
    pub excluded_position: String,
}

/// Reference teams for the radar charts. `playing_time[i]` is the fixed
/// games-equivalent divisor for `teams[i]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RadarConfig {
    pub teams: Vec<String>,
    pub playing_time: Vec<f64>,
    /// Only rows with this position count towards recoveries.
    pub recoveries_position: String,
}

impl RadarConfig {
    /// Teams paired with their playing-time divisor, in configured order.
    pub fn team_divisors(&self) -> impl Iterator<Item = (&str, f64)> {
        self.teams
            .iter()
            .map(String::as_str)
            .zip(self.playing_time.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire dashboard.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DashboardFile {
    data: DataPaths,
    output: OutputSection,
    theme: Theme,
}

#[derive(Debug, Clone, Deserialize)]
struct OutputSection {
    dir: String,
}

/// Location of the CSV datasets. `dir` is resolved against the config base
/// directory when relative.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub passing: String,
    pub defensive_actions: String,
    pub shooting: String,
    pub playing_time: String,
    pub standard_stats: String,
    pub miscellaneous: String,
    pub possession: String,
    pub scores_fixtures: String,
}

impl DataPaths {
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Visual theme handed to the renderer with every chart document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Theme {
    pub background_color: String,
    pub font_family: String,
    pub accent_font_family: String,
    pub dark_color: String,
    pub pale_color: String,
    pub color_way: Vec<String>,
    pub label_font_size: u32,
    pub label_background_color: String,
    pub colorscale: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/tournament.toml` and
/// `config/dashboard.toml`, both relative to the given `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let tournament_path = config_dir.join("tournament.toml");
    let tournament_text = read_file(&tournament_path)?;
    let tournament_file: TournamentFile =
        toml::from_str(&tournament_text).map_err(|e| ConfigError::ParseError {
            path: tournament_path.clone(),
            source: e,
        })?;

    let dashboard_path = config_dir.join("dashboard.toml");
    let dashboard_text = read_file(&dashboard_path)?;
    let dashboard_file: DashboardFile =
        toml::from_str(&dashboard_text).map_err(|e| ConfigError::ParseError {
            path: dashboard_path.clone(),
            source: e,
        })?;

    let mut data = dashboard_file.data;
    if data.dir.is_relative() {
        data.dir = base_dir.join(&data.dir);
    }
    let mut output_dir = PathBuf::from(dashboard_file.output.dir);
    if output_dir.is_relative() {
        output_dir = base_dir.join(output_dir);
    }

    let config = Config {
        tournament: tournament_file.tournament,
        passing: tournament_file.passing,
        defense: tournament_file.defense,
        heatmap: tournament_file.heatmap,
        radar: tournament_file.radar,
        data,
        output_dir,
        theme: dashboard_file.theme,
    };

    validate(&config)?;
    debug!("configuration loaded from {}", config_dir.display());

    Ok(config)
}

/// Copy every `defaults/*.toml` that `config/` lacks. Returns the copied
/// paths, sorted. Files already in `config/` are never touched, and anything
/// that is not a `.toml` file (`.example` templates included) is skipped.
///
/// A missing `defaults/` is fine as long as `config/` exists.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let copy_err = |message: String| ConfigError::DefaultsCopyError { message };

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            debug!("no defaults/ in {}; using config/ as is", base_dir.display());
            return Ok(Vec::new());
        }
        return Err(copy_err(format!(
            "neither defaults/ nor config/ directory found in {}; \
             run from the project root or pass --root",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_err(format!("failed to create {}: {e}", config_dir.display())))?;

    let mut defaults: Vec<PathBuf> = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_err(format!("failed to read {}: {e}", defaults_dir.display())))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    defaults.sort();

    let mut copied = Vec::new();
    for source in defaults {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if copy_if_missing(&source, &target)? {
            info!("copied default {} to {}", source.display(), target.display());
            copied.push(target);
        } else {
            debug!("keeping existing {}", target.display());
        }
    }
    Ok(copied)
}

/// Create `target` with the contents of `source` unless it already exists.
/// Returns whether a copy was made.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    use std::io::Write;

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };
    let content = std::fs::read(source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;
    dest.write_all(&content)
        .map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to write {}: {e}", target.display()),
        })?;
    Ok(true)
}

/// Copy missing defaults into `base_dir/config/`, then load from there.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.tournament.matches_played == 0 {
        return Err(invalid("tournament.matches_played", "must be greater than 0"));
    }

    if config.passing.players.is_empty() {
        return Err(invalid("passing.players", "must list at least one player"));
    }
    if config.defense.players.is_empty() {
        return Err(invalid("defense.players", "must list at least one player"));
    }

    if config.heatmap.top_n == 0 {
        return Err(invalid("heatmap.top_n", "must be greater than 0"));
    }

    let radar = &config.radar;
    if radar.teams.is_empty() {
        return Err(invalid("radar.teams", "must list at least one team"));
    }
    if radar.playing_time.len() != radar.teams.len() {
        return Err(invalid(
            "radar.playing_time",
            format!(
                "expected one divisor per team ({}), got {}",
                radar.teams.len(),
                radar.playing_time.len()
            ),
        ));
    }
    for (team, divisor) in radar.team_divisors() {
        if divisor <= 0.0 || !divisor.is_finite() {
            return Err(invalid(
                "radar.playing_time",
                format!("divisor for {team} must be > 0, got {divisor}"),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
