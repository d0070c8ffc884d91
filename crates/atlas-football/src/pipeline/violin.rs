// Per-squad distribution of minutes played or age, one point per player.

use crate::schema::RosterRow;
use crate::selector::{SelectorError, ViolinMetric};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinRow {
    pub squad: String,
    pub player: String,
    pub age: Option<f64>,
    pub minutes: f64,
    pub matches_played: f64,
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl ViolinRow {
    /// Tooltip shown for the player's point.
    pub fn hover_text(&self) -> String {
        let age = self.age.map(format_number).unwrap_or_default();
        format!(
            "<b>Player:</b> {}<br><b>Age:</b> {}<br><b>MP:</b> {}<br><b>Mins:</b> {}",
            self.player,
            age,
            format_number(self.matches_played),
            format_number(self.minutes)
        )
    }

    /// The y value for `metric`; `None` for an unknown age.
    pub fn metric(&self, metric: ViolinMetric) -> Option<f64> {
        match metric {
            ViolinMetric::Minutes => Some(self.minutes),
            ViolinMetric::Age => self.age,
        }
    }
}

/// Project the roster to the columns the violin chart uses. Row order is kept.
pub fn violin_rows(roster: &[RosterRow]) -> Vec<ViolinRow> {
    roster
        .iter()
        .map(|r| ViolinRow {
            squad: r.squad.clone(),
            player: r.player.clone(),
            age: r.age,
            minutes: r.minutes,
            matches_played: r.matches_played,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinPoint {
    pub squad: String,
    pub value: f64,
    pub hover: String,
}

/// Points for one metric, grouped by squad on the x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinChart {
    pub metric: ViolinMetric,
    pub title: String,
    pub squads: Vec<String>,
    pub points: Vec<ViolinPoint>,
}

impl ViolinChart {
    pub fn squad_values<'a>(&'a self, squad: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.points
            .iter()
            .filter(move |p| p.squad == squad)
            .map(|p| p.value)
    }
}

/// Build the chart for `metric`. Players without a value for the metric are
/// left out; squads appear in first-seen order.
pub fn violin_chart(rows: &[ViolinRow], metric: ViolinMetric) -> ViolinChart {
    let mut squads: Vec<String> = Vec::new();
    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        if !squads.contains(&row.squad) {
            squads.push(row.squad.clone());
        }
        if let Some(value) = row.metric(metric) {
            points.push(ViolinPoint {
                squad: row.squad.clone(),
                value,
                hover: row.hover_text(),
            });
        }
    }
    debug!(
        "violin {}: {} points across {} squads",
        metric,
        points.len(),
        squads.len()
    );
    ViolinChart {
        metric,
        title: metric.title(),
        squads,
        points,
    }
}

/// Select the metric by its control label ("Min", "Age").
pub fn select_violin(rows: &[ViolinRow], label: &str) -> Result<ViolinChart, SelectorError> {
    Ok(violin_chart(rows, label.parse()?))
}
