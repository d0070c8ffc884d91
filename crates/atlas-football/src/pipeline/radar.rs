// Team radar profiles for the reference teams: defensive actions per game,
// and possession style as percentages.
//
// Values are looked up per team by name and laid out in the fixed category
// order below, so input row order never moves a number onto the wrong axis.

use crate::schema::{DefensiveRow, FixtureRow, MiscRow, PassingRow, PossessionRow};
use atlas_core::config::RadarConfig;
use atlas_core::numeric::{percent_of_total, round_half_even};
use serde::Serialize;
use tracing::{debug, warn};

pub const DEFENSE_CATEGORIES: [&str; 6] = [
    "Interceptions",
    "AerialDuelswon",
    "Recoveries",
    "Clearances",
    "Fouls",
    "Tackles",
];

pub const POSSESSION_CATEGORIES: [&str; 4] = [
    "Possession (%)",
    "Touches in defensive 1/3 (%)",
    "Progressive Passes (%)",
    "Progressive Carries (%)",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeries {
    pub team: String,
    /// One value per category, in category order.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub title: String,
    pub categories: Vec<&'static str>,
    pub teams: Vec<TeamSeries>,
}

impl RadarSeries {
    pub fn values(&self, team: &str) -> Option<&[f64]> {
        self.teams
            .iter()
            .find(|t| t.team == team)
            .map(|t| t.values.as_slice())
    }

    /// Category value by name for one team.
    pub fn value(&self, team: &str, category: &str) -> Option<f64> {
        let i = self.categories.iter().position(|c| *c == category)?;
        self.values(team)?.get(i).copied()
    }

    /// Values with the first repeated at the end, closing the polygon.
    pub fn closed_values(&self, team: &str) -> Option<Vec<f64>> {
        let values = self.values(team)?;
        let mut closed = values.to_vec();
        closed.extend(values.first().copied());
        Some(closed)
    }

    pub fn closed_categories(&self) -> Vec<&'static str> {
        let mut closed = self.categories.clone();
        closed.extend(self.categories.first().copied());
        closed
    }
}

// ---------------------------------------------------------------------------
// Defense
// ---------------------------------------------------------------------------

/// Defensive actions per game for each reference team.
///
/// Tackles, interceptions and clearances come from the defensive-actions
/// table; fouls, aerial duels won and recoveries from the miscellaneous
/// table. Recoveries only count rows at `config.recoveries_position`.
pub fn defensive_radar(
    defense: &[DefensiveRow],
    misc: &[MiscRow],
    config: &RadarConfig,
) -> RadarSeries {
    let teams = config
        .team_divisors()
        .map(|(team, divisor)| {
            let def_rows: Vec<&DefensiveRow> =
                defense.iter().filter(|r| r.squad == team).collect();
            let misc_rows: Vec<&MiscRow> = misc.iter().filter(|r| r.squad == team).collect();
            if def_rows.is_empty() && misc_rows.is_empty() {
                warn!("defensive radar: no rows for team '{team}'; plotting zeros");
            }

            let interceptions: f64 = def_rows.iter().map(|r| r.interceptions).sum();
            let clearances: f64 = def_rows.iter().map(|r| r.clearances).sum();
            let tackles: f64 = def_rows.iter().map(|r| r.tackles).sum();
            let fouls: f64 = misc_rows.iter().map(|r| r.fouls).sum();
            let aerials: f64 = misc_rows.iter().map(|r| r.aerial_duels_won).sum();
            let recoveries: f64 = misc_rows
                .iter()
                .filter(|r| r.position == config.recoveries_position)
                .map(|r| r.recoveries)
                .sum();

            let values = [interceptions, aerials, recoveries, clearances, fouls, tackles]
                .into_iter()
                .map(|total| round_half_even(total / divisor, 1))
                .collect();
            TeamSeries {
                team: team.to_string(),
                values,
            }
        })
        .collect();

    RadarSeries {
        title: "Defensive actions by game".to_string(),
        categories: DEFENSE_CATEGORIES.to_vec(),
        teams,
    }
}

// ---------------------------------------------------------------------------
// Possession
// ---------------------------------------------------------------------------

/// Mean of the recorded `Poss` values for the team in `competition`.
fn mean_possession(fixtures: &[FixtureRow], team: &str, competition: &str) -> f64 {
    let recorded: Vec<f64> = fixtures
        .iter()
        .filter(|f| f.squad == team && f.competition == competition)
        .filter_map(|f| f.possession)
        .collect();
    if recorded.is_empty() {
        warn!("possession radar: no {competition} fixtures with possession for '{team}'");
        return 0.0;
    }
    round_half_even(recorded.iter().sum::<f64>() / recorded.len() as f64, 1)
}

/// Possession style of each reference team, compared against `focus_squad`.
pub fn possession_radar(
    passing: &[PassingRow],
    possession: &[PossessionRow],
    fixtures: &[FixtureRow],
    config: &RadarConfig,
    competition: &str,
    focus_squad: &str,
) -> RadarSeries {
    let teams = config
        .teams
        .iter()
        .map(|team| {
            let pass_rows: Vec<&PassingRow> = passing.iter().filter(|r| &r.squad == team).collect();
            let poss_rows: Vec<&PossessionRow> =
                possession.iter().filter(|r| &r.squad == team).collect();
            if pass_rows.is_empty() && poss_rows.is_empty() {
                warn!("possession radar: no rows for team '{team}'; plotting zeros");
            }

            let touches: f64 = poss_rows.iter().map(|r| r.touches).sum();
            let def_third: f64 = poss_rows.iter().map(|r| r.defensive_third_touches).sum();
            let carry_total: f64 = poss_rows.iter().map(|r| r.carry_distance).sum();
            let carry_prog: f64 = poss_rows.iter().map(|r| r.progressive_carry_distance).sum();
            let pass_total: f64 = pass_rows.iter().map(|r| r.total_distance).sum();
            let pass_prog: f64 = pass_rows.iter().map(|r| r.progressive_distance).sum();

            let values = vec![
                mean_possession(fixtures, team, competition),
                percent_of_total(def_third, touches),
                percent_of_total(pass_prog, pass_total),
                percent_of_total(carry_prog, carry_total),
            ];
            debug!("possession radar: {team} -> {values:?}");
            TeamSeries {
                team: team.clone(),
                values,
            }
        })
        .collect();

    RadarSeries {
        title: format!("{focus_squad}'s possession style compared to other teams"),
        categories: POSSESSION_CATEGORIES.to_vec(),
        teams,
    }
}
