// Closed sets of values the dashboard controls can select.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("unknown shooting view `{0}` (expected \"Overall\" or \"Per Match\")")]
    UnknownView(String),

    #[error("unknown violin metric `{0}` (expected \"Min\" or \"Age\")")]
    UnknownMetric(String),
}

/// Lowercase and fold `-`/`_` to spaces so "per-match" and "Per Match" agree.
fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Which aggregation of the shooting table to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShotView {
    /// Totals over the whole tournament.
    #[serde(rename = "Overall")]
    Overall,
    /// Totals divided by the number of matches played.
    #[serde(rename = "Per Match")]
    PerMatch,
}

impl ShotView {
    pub const ALL: [ShotView; 2] = [ShotView::Overall, ShotView::PerMatch];

    pub fn label(&self) -> &'static str {
        match self {
            ShotView::Overall => "Overall",
            ShotView::PerMatch => "Per Match",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ShotView::Overall => "Efficiency in offensive actions during the competition",
            ShotView::PerMatch => "Average efficiency in offensive actions per match",
        }
    }
}

impl fmt::Display for ShotView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShotView {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "overall" => Ok(ShotView::Overall),
            "per match" => Ok(ShotView::PerMatch),
            _ => Err(SelectorError::UnknownView(s.to_string())),
        }
    }
}

/// Column plotted on the y axis of the violin chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolinMetric {
    #[serde(rename = "Min")]
    Minutes,
    #[serde(rename = "Age")]
    Age,
}

impl ViolinMetric {
    pub const ALL: [ViolinMetric; 2] = [ViolinMetric::Minutes, ViolinMetric::Age];

    /// Source column name, as shown in the chart title.
    pub fn column(&self) -> &'static str {
        match self {
            ViolinMetric::Minutes => "Min",
            ViolinMetric::Age => "Age",
        }
    }

    pub fn title(&self) -> String {
        format!("Violin Plot - {} per Squad", self.column())
    }
}

impl fmt::Display for ViolinMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for ViolinMetric {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "min" | "minutes" => Ok(ViolinMetric::Minutes),
            "age" => Ok(ViolinMetric::Age),
            _ => Err(SelectorError::UnknownMetric(s.to_string())),
        }
    }
}
