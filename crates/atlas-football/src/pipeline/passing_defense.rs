// Per-player shares of completed passes by length, and of key defensive
// actions, for the hand-picked players on each bar chart.

use crate::schema::{DefensiveRow, PassingRow};
use crate::shaping::{collapse_duplicates, group_shares, melt, WideRow};
use atlas_core::config::AllowList;
use serde::Serialize;
use tracing::{info, warn};

pub const PASS_TYPES: [&str; 3] = ["Short Pass", "Medium Pass", "Long Pass"];
pub const DEFENSIVE_ACTIONS: [&str; 3] = ["Tackles", "Blocks", "Interceptions"];

/// One bar segment: a player's count for one stat and its share of the
/// player's total across the chart's stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerShareRow {
    pub player: String,
    pub stat: &'static str,
    pub value: f64,
    /// `None` when the player has no recorded actions at all.
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerShareChart {
    pub title: &'static str,
    /// Legend title of the stat colour channel.
    pub stat_label: &'static str,
    pub y_axis_title: &'static str,
    pub stats: Vec<&'static str>,
    pub rows: Vec<PlayerShareRow>,
}

impl PlayerShareChart {
    /// Players in bar order (highest total first).
    pub fn players(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.player.as_str()) {
                seen.push(&row.player);
            }
        }
        seen
    }

    pub fn rows_for<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a PlayerShareRow> {
        self.rows.iter().filter(move |r| r.player == player)
    }
}

/// Short/medium/long completed passes for the allow-listed attackers.
pub fn passing_shares(rows: &[PassingRow], players: &AllowList) -> PlayerShareChart {
    let wide: Vec<WideRow<3>> = rows
        .iter()
        .filter(|r| players.contains(&r.player))
        .map(|r| WideRow {
            id: r.player.clone(),
            values: [r.short_completed, r.medium_completed, r.long_completed],
        })
        .collect();

    PlayerShareChart {
        title: "Offensive Passes",
        stat_label: "Pass Types",
        y_axis_title: "Offensive Passes Completed",
        stats: PASS_TYPES.to_vec(),
        rows: player_shares(wide, &PASS_TYPES, "passing"),
    }
}

/// Tackles/blocks/interceptions for the allow-listed defenders.
pub fn defense_shares(rows: &[DefensiveRow], players: &AllowList) -> PlayerShareChart {
    let wide: Vec<WideRow<3>> = rows
        .iter()
        .filter(|r| players.contains(&r.player))
        .map(|r| WideRow {
            id: r.player.clone(),
            values: [r.tackles, r.blocks, r.interceptions],
        })
        .collect();

    PlayerShareChart {
        title: "Key Defensive Actions",
        stat_label: "Defensive Actions",
        y_axis_title: "Defensive Actions",
        stats: DEFENSIVE_ACTIONS.to_vec(),
        rows: player_shares(wide, &DEFENSIVE_ACTIONS, "defense"),
    }
}

fn player_shares<const N: usize>(
    wide: Vec<WideRow<N>>,
    labels: &[&'static str; N],
    chart: &str,
) -> Vec<PlayerShareRow> {
    let (mut wide, repeated) = collapse_duplicates(wide);
    for player in &repeated {
        warn!("{chart}: player '{player}' appears more than once; rows summed");
    }
    // Stable, so equal totals keep file order.
    wide.sort_by(|a, b| b.total().total_cmp(&a.total()));
    info!("{chart}: {} allow-listed players matched", wide.len());

    let long = melt(&wide, labels);
    let shares = group_shares(&long);
    long.into_iter()
        .zip(shares)
        .map(|(row, percentage)| PlayerShareRow {
            player: row.id,
            stat: row.variable,
            value: row.value,
            percentage,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(names: &[&str]) -> AllowList {
        AllowList {
            players: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    fn passing(player: &str, short: f64, medium: f64, long: f64) -> PassingRow {
        PassingRow {
            player: player.into(),
            squad: "Morocco".into(),
            short_completed: short,
            medium_completed: medium,
            long_completed: long,
            total_distance: 0.0,
            progressive_distance: 0.0,
        }
    }

    fn defensive(player: &str, tackles: f64, blocks: f64, interceptions: f64) -> DefensiveRow {
        DefensiveRow {
            player: player.into(),
            squad: "Morocco".into(),
            tackles,
            blocks,
            interceptions,
            clearances: 0.0,
        }
    }

    #[test]
    fn filters_to_allow_list() {
        let rows = vec![
            passing("Hakim Ziyech", 50.0, 30.0, 20.0),
            passing("Romain Saiss", 90.0, 90.0, 10.0),
        ];
        let chart = passing_shares(&rows, &allow(&["Hakim Ziyech"]));
        assert_eq!(chart.players(), vec!["Hakim Ziyech"]);
        assert_eq!(chart.rows.len(), 3);
    }

    #[test]
    fn players_ordered_by_total_then_melted_stat_major() {
        let rows = vec![
            passing("Sofiane Boufal", 10.0, 10.0, 0.0),
            passing("Hakim Ziyech", 50.0, 30.0, 20.0),
        ];
        let chart = passing_shares(&rows, &allow(&["Sofiane Boufal", "Hakim Ziyech"]));
        let cells: Vec<(&str, &str)> = chart
            .rows
            .iter()
            .map(|r| (r.player.as_str(), r.stat))
            .collect();
        assert_eq!(
            cells,
            vec![
                ("Hakim Ziyech", "Short Pass"),
                ("Sofiane Boufal", "Short Pass"),
                ("Hakim Ziyech", "Medium Pass"),
                ("Sofiane Boufal", "Medium Pass"),
                ("Hakim Ziyech", "Long Pass"),
                ("Sofiane Boufal", "Long Pass"),
            ]
        );
    }

    #[test]
    fn percentages_are_truncated_shares_of_player_total() {
        let rows = vec![passing("Azzedine Ounahi", 1.0, 1.0, 1.0)];
        let chart = passing_shares(&rows, &allow(&["Azzedine Ounahi"]));
        for row in &chart.rows {
            assert_eq!(row.percentage, Some(33.33));
        }
    }

    #[test]
    fn percentages_sum_to_hundred_within_truncation() {
        let rows = vec![
            defensive("Sofyan Amrabat", 14.0, 6.0, 9.0),
            defensive("Nayef Aguerd", 7.0, 3.0, 5.0),
        ];
        let chart = defense_shares(&rows, &allow(&["Sofyan Amrabat", "Nayef Aguerd"]));
        for player in chart.players() {
            let sum: f64 = chart
                .rows_for(player)
                .map(|r| r.percentage.unwrap())
                .sum();
            assert!(sum <= 100.0 + 1e-9 && sum >= 100.0 - 0.01 * 3.0, "{player}: {sum}");
        }
    }

    #[test]
    fn player_without_actions_has_no_percentages() {
        let rows = vec![defensive("Noussair Mazraoui", 0.0, 0.0, 0.0)];
        let chart = defense_shares(&rows, &allow(&["Noussair Mazraoui"]));
        assert_eq!(chart.rows.len(), 3);
        assert!(chart.rows.iter().all(|r| r.percentage.is_none()));
    }

    #[test]
    fn duplicate_player_rows_are_summed() {
        let rows = vec![
            defensive("Achraf Hakimi", 4.0, 1.0, 2.0),
            defensive("Achraf Hakimi", 6.0, 1.0, 0.0),
        ];
        let chart = defense_shares(&rows, &allow(&["Achraf Hakimi"]));
        assert_eq!(chart.players(), vec!["Achraf Hakimi"]);
        let values: Vec<f64> = chart.rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![10.0, 2.0, 2.0]);
        assert_eq!(chart.rows[0].percentage, Some(71.42));
    }

    #[test]
    fn chart_metadata() {
        let chart = defense_shares(&[], &allow(&["Romain Saiss"]));
        assert_eq!(chart.title, "Key Defensive Actions");
        assert_eq!(chart.stats, vec!["Tackles", "Blocks", "Interceptions"]);
        assert!(chart.rows.is_empty());

        let chart = passing_shares(&[], &allow(&["Hakim Ziyech"]));
        assert_eq!(chart.title, "Offensive Passes");
        assert_eq!(chart.stat_label, "Pass Types");
    }
}
