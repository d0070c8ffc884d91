// Actual-minus-expected performance grid for one squad's most-used outfield
// players.
//
// Pipeline:
// 1. Outer-join playing-time and standard-stats rows on the shared identity
//    columns; fields missing on one side read as zero.
// 2. Keep one squad, drop goalkeepers, take the top N by minutes.
// 3. Per-match rates for the counting stats (plus-minus and on-off are
//    already per 90).
// 4. Differential = actual - expected, sign flipped for goals against so that
//    positive always means better than expected.
// 5. Scale each stat column into [-1, 1] by its own largest magnitude.

use crate::schema::{PlayerKey, PlayingTimeRow, StandardStatsRow};
use atlas_core::config::HeatmapConfig;
use atlas_core::numeric::{ratio_or_zero, round_half_even, scale_by_max_abs};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

pub const STAT_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HeatmapStat {
    Goals,
    AssistedGoals,
    OnGoalsFor,
    OnGoalsAgainst,
    PlusMinus,
    OnOff,
}

impl HeatmapStat {
    pub const ALL: [HeatmapStat; STAT_COUNT] = [
        HeatmapStat::Goals,
        HeatmapStat::AssistedGoals,
        HeatmapStat::OnGoalsFor,
        HeatmapStat::OnGoalsAgainst,
        HeatmapStat::PlusMinus,
        HeatmapStat::OnOff,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            HeatmapStat::Goals => "G",
            HeatmapStat::AssistedGoals => "AG",
            HeatmapStat::OnGoalsFor => "onG",
            HeatmapStat::OnGoalsAgainst => "onGA",
            HeatmapStat::PlusMinus => "PlusMinus",
            HeatmapStat::OnOff => "OnOff",
        }
    }

    /// Column header on the heatmap. Goals against is shown negated.
    pub fn column_label(&self) -> &'static str {
        match self {
            HeatmapStat::OnGoalsAgainst => "-onGA",
            other => other.code(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HeatmapStat::Goals => "Goals",
            HeatmapStat::AssistedGoals => "Assisted Goals",
            HeatmapStat::OnGoalsFor => "Goals scored by team while on pitch",
            HeatmapStat::OnGoalsAgainst => "Goals allowed by team while on pitch",
            HeatmapStat::PlusMinus => {
                "Goals scored minus goals allowed while the player was on the pitch"
            }
            HeatmapStat::OnOff => {
                "Net goals by the team while the player was on the pitch minus net goals \
                 allowed by the team while the player was off the pitch"
            }
        }
    }

    /// Already expressed per 90 minutes in the source data.
    pub fn is_per_90(&self) -> bool {
        matches!(self, HeatmapStat::PlusMinus | HeatmapStat::OnOff)
    }

    /// Lower is better, so the differential is negated.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, HeatmapStat::OnGoalsAgainst)
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// A player after the outer join, with actual/expected pairs in
/// `HeatmapStat::ALL` order.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPlayer {
    pub key: PlayerKey,
    pub actual: [f64; STAT_COUNT],
    pub expected: [f64; STAT_COUNT],
}

/// Hashable form of `PlayerKey`; numeric columns compared at 1/1000 precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct JoinKey {
    squad: String,
    player: String,
    position: String,
    age: Option<i64>,
    matches_played: i64,
    minutes: i64,
    nineties: i64,
}

fn fixed(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

impl From<&PlayerKey> for JoinKey {
    fn from(key: &PlayerKey) -> Self {
        JoinKey {
            squad: key.squad.clone(),
            player: key.player.clone(),
            position: key.position.clone(),
            age: key.age.map(fixed),
            matches_played: fixed(key.matches_played),
            minutes: fixed(key.minutes),
            nineties: fixed(key.nineties),
        }
    }
}

/// Outer join on all identity columns. Playing-time rows come first in file
/// order, followed by standard-stats rows that had no match. Rows repeating a
/// key on the same side are summed into one player.
pub fn merge_player_tables(
    playing_time: &[PlayingTimeRow],
    standard_stats: &[StandardStatsRow],
) -> Vec<MergedPlayer> {
    let mut merged: Vec<MergedPlayer> = Vec::with_capacity(playing_time.len());
    let mut index: HashMap<JoinKey, usize> = HashMap::new();

    for row in playing_time {
        let key = row.key();
        let actual = [
            0.0,
            0.0,
            row.on_goals_for,
            row.on_goals_against,
            row.plus_minus_per_90,
            row.on_off,
        ];
        let expected = [
            0.0,
            0.0,
            row.on_expected_goals_for,
            row.on_expected_goals_against,
            row.expected_plus_minus_per_90,
            row.expected_on_off,
        ];
        let join_key = JoinKey::from(&key);
        match index.get(&join_key).copied() {
            Some(i) => {
                warn!(
                    "heatmap: playing-time row for '{}' ({}) repeats an earlier key; rows summed",
                    key.player, key.squad
                );
                add_into(&mut merged[i].actual, &actual);
                add_into(&mut merged[i].expected, &expected);
            }
            None => {
                index.insert(join_key, merged.len());
                merged.push(MergedPlayer {
                    key,
                    actual,
                    expected,
                });
            }
        }
    }

    let mut unmatched = 0usize;
    let mut seen_standard: HashSet<usize> = HashSet::new();
    for row in standard_stats {
        let key = row.key();
        let join_key = JoinKey::from(&key);
        let slot = match index.get(&join_key).copied() {
            Some(i) => i,
            None => {
                unmatched += 1;
                let i = merged.len();
                index.insert(join_key, i);
                merged.push(MergedPlayer {
                    key,
                    actual: [0.0; STAT_COUNT],
                    expected: [0.0; STAT_COUNT],
                });
                i
            }
        };
        if !seen_standard.insert(slot) {
            warn!(
                "heatmap: standard-stats row for '{}' ({}) repeats an earlier key; rows summed",
                row.player, row.squad
            );
        }
        let player = &mut merged[slot];
        player.actual[0] += row.goals;
        player.actual[1] += row.assists;
        player.expected[0] += row.expected_goals;
        player.expected[1] += row.expected_assisted_goals;
    }

    debug!(
        "heatmap merge: {} playing-time rows, {} standard-stats rows, {} without a match",
        playing_time.len(),
        standard_stats.len(),
        unmatched
    );
    merged
}

fn add_into(acc: &mut [f64; STAT_COUNT], values: &[f64; STAT_COUNT]) {
    for (slot, v) in acc.iter_mut().zip(values) {
        *slot += v;
    }
}

/// Spell out outfield position codes for the hover text.
pub fn display_position(code: &str) -> String {
    match code {
        "DF" => "Defender".to_string(),
        "MF" => "Midfielder".to_string(),
        "FW" => "Forward".to_string(),
        other => other.to_string(),
    }
}

/// One squad, goalkeepers removed, top `top_n` by minutes (ties keep input
/// order).
pub fn select_top_players(players: Vec<MergedPlayer>, config: &HeatmapConfig) -> Vec<MergedPlayer> {
    let mut selected: Vec<MergedPlayer> = players
        .into_iter()
        .filter(|p| p.key.squad == config.squad && p.key.position != config.excluded_position)
        .collect();
    selected.sort_by(|a, b| b.key.minutes.total_cmp(&a.key.minutes));
    selected.truncate(config.top_n);
    selected
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Tooltip payload for one heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverCell {
    pub position: String,
    pub actual: f64,
    pub expected: f64,
}

/// Rows are players (most minutes first), columns follow `HeatmapStat::ALL`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceHeatmap {
    pub title: &'static str,
    pub squad: String,
    pub columns: Vec<&'static str>,
    pub players: Vec<String>,
    /// Colour values, each column scaled into [-1, 1] independently.
    pub normalized: Vec<[f64; STAT_COUNT]>,
    /// Cell text: actual minus expected (goals against negated), 2 decimals.
    pub differentials: Vec<[f64; STAT_COUNT]>,
    pub hover: Vec<[HoverCell; STAT_COUNT]>,
}

impl PerformanceHeatmap {
    pub fn column(&self, stat: HeatmapStat) -> usize {
        HeatmapStat::ALL.iter().position(|s| *s == stat).unwrap_or(0)
    }

    pub fn row(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    /// (code, description) pairs for the legend table under the chart.
    pub fn descriptions() -> Vec<(&'static str, &'static str)> {
        HeatmapStat::ALL
            .iter()
            .map(|s| (s.code(), s.description()))
            .collect()
    }
}

/// Per-match rates (rounded to 2 decimals) for the counting stats; per-90
/// stats pass through rounded.
fn rates(values: &[f64; STAT_COUNT], matches_played: f64) -> [f64; STAT_COUNT] {
    let mut out = [0.0; STAT_COUNT];
    for (i, stat) in HeatmapStat::ALL.iter().enumerate() {
        let rate = if stat.is_per_90() {
            values[i]
        } else {
            ratio_or_zero(values[i], matches_played)
        };
        out[i] = round_half_even(rate, 2);
    }
    out
}

pub fn performance_heatmap(
    playing_time: &[PlayingTimeRow],
    standard_stats: &[StandardStatsRow],
    config: &HeatmapConfig,
) -> PerformanceHeatmap {
    let merged = merge_player_tables(playing_time, standard_stats);
    let selected = select_top_players(merged, config);
    info!(
        "heatmap: {} players selected for {} (top {})",
        selected.len(),
        config.squad,
        config.top_n
    );

    let mut players = Vec::with_capacity(selected.len());
    let mut differentials = Vec::with_capacity(selected.len());
    let mut hover = Vec::with_capacity(selected.len());

    for player in &selected {
        let actual = rates(&player.actual, player.key.matches_played);
        let expected = rates(&player.expected, player.key.matches_played);
        let position = display_position(&player.key.position);

        let mut diff = [0.0; STAT_COUNT];
        for (i, stat) in HeatmapStat::ALL.iter().enumerate() {
            let d = round_half_even(actual[i] - expected[i], 2);
            diff[i] = if stat.lower_is_better() { -d } else { d };
        }

        players.push(player.key.player.clone());
        differentials.push(diff);
        hover.push(std::array::from_fn(|i| HoverCell {
            position: position.clone(),
            actual: actual[i],
            expected: expected[i],
        }));
    }

    let mut normalized = vec![[0.0; STAT_COUNT]; differentials.len()];
    for col in 0..STAT_COUNT {
        let column: Vec<f64> = differentials.iter().map(|row| row[col]).collect();
        for (row, value) in normalized.iter_mut().zip(scale_by_max_abs(&column)) {
            row[col] = value;
        }
    }

    PerformanceHeatmap {
        title: "Actual minus expected value per 90 minutes played",
        squad: config.squad.clone(),
        columns: HeatmapStat::ALL.iter().map(|s| s.column_label()).collect(),
        players,
        normalized,
        differentials,
        hover,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
