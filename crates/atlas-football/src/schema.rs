// Typed input records for the tournament CSV exports and their loaders.
//
// Column names are a versioned contract: each loader checks the header row
// against the dataset's `Schema` before reading, so a renamed column fails
// the load instead of producing a half-empty chart.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Version of the column contract below. Bump when a required column changes.
pub const SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path}: missing required column `{column}` for {dataset} (schema v{})", SCHEMA_VERSION)]
    MissingColumn {
        path: String,
        dataset: &'static str,
        column: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

/// Required columns of one input dataset. Extra columns are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub dataset: &'static str,
    pub columns: &'static [&'static str],
}

/// Columns shared by the playing-time and standard-stats exports; the heatmap
/// joins on all of them.
pub const PLAYER_KEY_COLUMNS: [&str; 7] = ["Squad", "Player", "Pos", "Age", "MP", "Min", "90s"];

pub const PASSING: Schema = Schema {
    dataset: "passing",
    columns: &[
        "Player",
        "Squad",
        "Short-Cmp",
        "Medium-Cmp",
        "Long-Cmp",
        "Total-TotDist",
        "Total-PrgDist",
    ],
};

pub const DEFENSIVE_ACTIONS: Schema = Schema {
    dataset: "defensive actions",
    columns: &["Player", "Squad", "Tackles-Tkl", "Blocks", "Int", "Clr"],
};

pub const SHOOTING: Schema = Schema {
    dataset: "shooting",
    columns: &["Squad", "Gls", "Sh", "SoT"],
};

pub const PLAYING_TIME: Schema = Schema {
    dataset: "playing time",
    columns: &[
        "Squad",
        "Player",
        "Pos",
        "Age",
        "MP",
        "Min",
        "90s",
        "TeamSuccess-onG",
        "TeamSuccess-onGA",
        "TeamSuccess-PlusMinus/90",
        "TeamSuccess-OnOff",
        "TeamSuccess(xG)-onxG",
        "TeamSuccess(xG)-onxGA",
        "TeamSuccess(xG)-PlusMinus/90",
        "TeamSuccess(xG)-OnOff",
    ],
};

pub const STANDARD_STATS: Schema = Schema {
    dataset: "standard stats",
    columns: &[
        "Squad", "Player", "Pos", "Age", "MP", "Min", "90s", "Gls", "Ast", "xG", "xAG",
    ],
};

/// The subset of the standard-stats export the violin plots read.
pub const ROSTER: Schema = Schema {
    dataset: "roster",
    columns: &["Squad", "Player", "Age", "Min", "MP"],
};

pub const MISCELLANEOUS: Schema = Schema {
    dataset: "miscellaneous stats",
    columns: &["Squad", "Pos", "Perf_Fls", "Perf_Recov", "AerialDuels_Won"],
};

pub const POSSESSION: Schema = Schema {
    dataset: "possession",
    columns: &[
        "Squad",
        "Touches",
        "Touches-Def 3rd",
        "Carries-TotDist",
        "Carries-PrgDist",
    ],
};

pub const SCORES_FIXTURES: Schema = Schema {
    dataset: "scores and fixtures",
    columns: &["Squad", "Comp", "Poss"],
};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PassingRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Short-Cmp", deserialize_with = "number")]
    pub short_completed: f64,
    #[serde(rename = "Medium-Cmp", deserialize_with = "number")]
    pub medium_completed: f64,
    #[serde(rename = "Long-Cmp", deserialize_with = "number")]
    pub long_completed: f64,
    #[serde(rename = "Total-TotDist", deserialize_with = "number")]
    pub total_distance: f64,
    #[serde(rename = "Total-PrgDist", deserialize_with = "number")]
    pub progressive_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefensiveRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Tackles-Tkl", deserialize_with = "number")]
    pub tackles: f64,
    #[serde(rename = "Blocks", deserialize_with = "number")]
    pub blocks: f64,
    #[serde(rename = "Int", deserialize_with = "number")]
    pub interceptions: f64,
    #[serde(rename = "Clr", deserialize_with = "number")]
    pub clearances: f64,
}

/// One player's shooting line for one match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShootingRow {
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Gls", deserialize_with = "number")]
    pub goals: f64,
    #[serde(rename = "Sh", deserialize_with = "number")]
    pub shots: f64,
    #[serde(rename = "SoT", deserialize_with = "number")]
    pub shots_on_target: f64,
}

/// Identity columns shared by the playing-time and standard-stats exports.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerKey {
    pub squad: String,
    pub player: String,
    pub position: String,
    pub age: Option<f64>,
    pub matches_played: f64,
    pub minutes: f64,
    pub nineties: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayingTimeRow {
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Pos")]
    pub position: String,
    #[serde(rename = "Age", deserialize_with = "age_years")]
    pub age: Option<f64>,
    #[serde(rename = "MP", deserialize_with = "number")]
    pub matches_played: f64,
    #[serde(rename = "Min", deserialize_with = "number")]
    pub minutes: f64,
    #[serde(rename = "90s", deserialize_with = "number")]
    pub nineties: f64,
    #[serde(rename = "TeamSuccess-onG", deserialize_with = "number")]
    pub on_goals_for: f64,
    #[serde(rename = "TeamSuccess-onGA", deserialize_with = "number")]
    pub on_goals_against: f64,
    #[serde(rename = "TeamSuccess-PlusMinus/90", deserialize_with = "number")]
    pub plus_minus_per_90: f64,
    #[serde(rename = "TeamSuccess-OnOff", deserialize_with = "number")]
    pub on_off: f64,
    #[serde(rename = "TeamSuccess(xG)-onxG", deserialize_with = "number")]
    pub on_expected_goals_for: f64,
    #[serde(rename = "TeamSuccess(xG)-onxGA", deserialize_with = "number")]
    pub on_expected_goals_against: f64,
    #[serde(rename = "TeamSuccess(xG)-PlusMinus/90", deserialize_with = "number")]
    pub expected_plus_minus_per_90: f64,
    #[serde(rename = "TeamSuccess(xG)-OnOff", deserialize_with = "number")]
    pub expected_on_off: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardStatsRow {
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Pos")]
    pub position: String,
    #[serde(rename = "Age", deserialize_with = "age_years")]
    pub age: Option<f64>,
    #[serde(rename = "MP", deserialize_with = "number")]
    pub matches_played: f64,
    #[serde(rename = "Min", deserialize_with = "number")]
    pub minutes: f64,
    #[serde(rename = "90s", deserialize_with = "number")]
    pub nineties: f64,
    #[serde(rename = "Gls", deserialize_with = "number")]
    pub goals: f64,
    #[serde(rename = "Ast", deserialize_with = "number")]
    pub assists: f64,
    #[serde(rename = "xG", deserialize_with = "number")]
    pub expected_goals: f64,
    #[serde(rename = "xAG", deserialize_with = "number")]
    pub expected_assisted_goals: f64,
}

impl PlayingTimeRow {
    pub fn key(&self) -> PlayerKey {
        PlayerKey {
            squad: self.squad.clone(),
            player: self.player.clone(),
            position: self.position.clone(),
            age: self.age,
            matches_played: self.matches_played,
            minutes: self.minutes,
            nineties: self.nineties,
        }
    }
}

impl StandardStatsRow {
    pub fn key(&self) -> PlayerKey {
        PlayerKey {
            squad: self.squad.clone(),
            player: self.player.clone(),
            position: self.position.clone(),
            age: self.age,
            matches_played: self.matches_played,
            minutes: self.minutes,
            nineties: self.nineties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RosterRow {
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Age", deserialize_with = "age_years")]
    pub age: Option<f64>,
    #[serde(rename = "Min", deserialize_with = "number")]
    pub minutes: f64,
    #[serde(rename = "MP", deserialize_with = "number")]
    pub matches_played: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MiscRow {
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Pos")]
    pub position: String,
    #[serde(rename = "Perf_Fls", deserialize_with = "number")]
    pub fouls: f64,
    #[serde(rename = "Perf_Recov", deserialize_with = "number")]
    pub recoveries: f64,
    #[serde(rename = "AerialDuels_Won", deserialize_with = "number")]
    pub aerial_duels_won: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PossessionRow {
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Touches", deserialize_with = "number")]
    pub touches: f64,
    #[serde(rename = "Touches-Def 3rd", deserialize_with = "number")]
    pub defensive_third_touches: f64,
    #[serde(rename = "Carries-TotDist", deserialize_with = "number")]
    pub carry_distance: f64,
    #[serde(rename = "Carries-PrgDist", deserialize_with = "number")]
    pub progressive_carry_distance: f64,
}

/// One match from a squad's fixture list. `Poss` is blank for unplayed games.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureRow {
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Comp")]
    pub competition: String,
    #[serde(rename = "Poss", deserialize_with = "optional_number")]
    pub possession: Option<f64>,
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Blank cells read as zero; thousands separators are
/// accepted ("1,234").
fn parse_number(raw: &str) -> Result<Option<f64>, String> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid number {raw:?}"))
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_number(&raw)
        .map(|v| v.unwrap_or(0.0))
        .map_err(D::Error::custom)
}

fn optional_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_number(&raw).map_err(D::Error::custom)
}

/// Ages come either as whole years ("24") or years-days ("24-123").
fn age_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let years = raw.split('-').next().unwrap_or_default();
    parse_number(years).map_err(|_| D::Error::custom(format!("invalid age {raw:?}")))
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Read every row of `rdr` as `T`, after checking the header against `schema`.
/// `source` names the input in errors (a path, or a label for in-memory data).
pub fn rows_from_reader<T, R>(rdr: R, schema: &Schema, source: &str) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    let csv_err = |e: csv::Error| LoadError::Csv {
        path: source.to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader.headers().map_err(csv_err)?.clone();
    for column in schema.columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoadError::MissingColumn {
                path: source.to_string(),
                dataset: schema.dataset,
                column: *column,
            });
        }
    }

    let rows = reader
        .deserialize::<T>()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_err)?;
    debug!("loaded {} {} rows from {}", rows.len(), schema.dataset, source);
    Ok(rows)
}

/// Open `path` and read it with [`rows_from_reader`].
pub fn load_rows<T: DeserializeOwned>(path: &Path, schema: &Schema) -> Result<Vec<T>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    rows_from_reader(file, schema, &path.display().to_string())
}

pub fn load_passing(path: &Path) -> Result<Vec<PassingRow>, LoadError> {
    load_rows(path, &PASSING)
}

pub fn load_defensive_actions(path: &Path) -> Result<Vec<DefensiveRow>, LoadError> {
    load_rows(path, &DEFENSIVE_ACTIONS)
}

pub fn load_shooting(path: &Path) -> Result<Vec<ShootingRow>, LoadError> {
    load_rows(path, &SHOOTING)
}

pub fn load_playing_time(path: &Path) -> Result<Vec<PlayingTimeRow>, LoadError> {
    load_rows(path, &PLAYING_TIME)
}

pub fn load_standard_stats(path: &Path) -> Result<Vec<StandardStatsRow>, LoadError> {
    load_rows(path, &STANDARD_STATS)
}

pub fn load_roster(path: &Path) -> Result<Vec<RosterRow>, LoadError> {
    load_rows(path, &ROSTER)
}

pub fn load_miscellaneous(path: &Path) -> Result<Vec<MiscRow>, LoadError> {
    load_rows(path, &MISCELLANEOUS)
}

pub fn load_possession(path: &Path) -> Result<Vec<PossessionRow>, LoadError> {
    load_rows(path, &POSSESSION)
}

pub fn load_fixtures(path: &Path) -> Result<Vec<FixtureRow>, LoadError> {
    load_rows(path, &SCORES_FIXTURES)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
