// Chart catalogue: which datasets each chart reads and which pipeline it runs.
//
// Every build re-reads its CSV files from the configured data directory.

use anyhow::Context;
use atlas_core::config::Config;
use atlas_football::pipeline::{heatmap, passing_defense, radar, shooting, violin};
use atlas_football::schema;
use atlas_football::selector::{ShotView, ViolinMetric};
use serde::Serialize;
use tracing::info;

use crate::render::{ChartDocument, ChartKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    Passing,
    Defense,
    Shooting(ShotView),
    Heatmap,
    RadarDefense,
    RadarPossession,
    Violin(ViolinMetric),
}

impl Chart {
    /// Every chart, in dashboard order.
    pub fn all() -> Vec<Chart> {
        let mut charts = vec![Chart::Passing, Chart::Defense];
        charts.extend(ShotView::ALL.map(Chart::Shooting));
        charts.extend([Chart::Heatmap, Chart::RadarDefense, Chart::RadarPossession]);
        charts.extend(ViolinMetric::ALL.map(Chart::Violin));
        charts
    }

    /// Stable identifier, also the export file stem.
    pub fn id(&self) -> String {
        match self {
            Chart::Passing => "passing".into(),
            Chart::Defense => "defense".into(),
            Chart::Shooting(view) => format!("shooting-{}", slug(view.label())),
            Chart::Heatmap => "heatmap".into(),
            Chart::RadarDefense => "radar-defense".into(),
            Chart::RadarPossession => "radar-possession".into(),
            Chart::Violin(metric) => format!("violin-{}", slug(metric.column())),
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            Chart::Passing | Chart::Defense | Chart::Shooting(_) => ChartKind::Bar,
            Chart::Heatmap => ChartKind::Heatmap,
            Chart::RadarDefense | Chart::RadarPossession => ChartKind::Radar,
            Chart::Violin(_) => ChartKind::Violin,
        }
    }
}

fn slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}

/// A chart's pipeline output, ready to wrap in a document.
#[derive(Debug)]
pub struct BuiltChart {
    pub chart: Chart,
    pub id: String,
    pub title: String,
    pub data: serde_json::Value,
}

impl BuiltChart {
    fn new<T: Serialize>(chart: Chart, title: impl Into<String>, data: &T) -> anyhow::Result<Self> {
        let id = chart.id();
        let data = serde_json::to_value(data)
            .with_context(|| format!("failed to serialize chart data for `{id}`"))?;
        Ok(BuiltChart {
            chart,
            id,
            title: title.into(),
            data,
        })
    }

    pub fn document<'a>(&'a self, config: &'a Config) -> ChartDocument<'a, serde_json::Value> {
        ChartDocument {
            id: &self.id,
            kind: self.chart.kind(),
            title: &self.title,
            theme: &config.theme,
            data: &self.data,
        }
    }
}

/// Load the inputs for `chart` and run its pipeline.
pub fn build(chart: Chart, config: &Config) -> anyhow::Result<BuiltChart> {
    let data = &config.data;
    let built = match chart {
        Chart::Passing => {
            let rows = schema::load_passing(&data.file(&data.passing))
                .context("failed to load passing data")?;
            let out = passing_defense::passing_shares(&rows, &config.passing);
            BuiltChart::new(chart, out.title, &out)?
        }
        Chart::Defense => {
            let rows = schema::load_defensive_actions(&data.file(&data.defensive_actions))
                .context("failed to load defensive actions data")?;
            let out = passing_defense::defense_shares(&rows, &config.defense);
            BuiltChart::new(chart, out.title, &out)?
        }
        Chart::Shooting(view) => {
            let rows = schema::load_shooting(&data.file(&data.shooting))
                .context("failed to load shooting data")?;
            let table = shooting::shooting_efficiency(&rows, config.tournament.matches_played);
            let out = table.view(view);
            BuiltChart::new(chart, out.title, &out)?
        }
        Chart::Heatmap => {
            let pt = schema::load_playing_time(&data.file(&data.playing_time))
                .context("failed to load playing time data")?;
            let ss = schema::load_standard_stats(&data.file(&data.standard_stats))
                .context("failed to load standard stats data")?;
            let out = heatmap::performance_heatmap(&pt, &ss, &config.heatmap);
            BuiltChart::new(chart, out.title, &HeatmapDocument::new(&out))?
        }
        Chart::RadarDefense => {
            let defense = schema::load_defensive_actions(&data.file(&data.defensive_actions))
                .context("failed to load defensive actions data")?;
            let misc = schema::load_miscellaneous(&data.file(&data.miscellaneous))
                .context("failed to load miscellaneous stats data")?;
            let out = radar::defensive_radar(&defense, &misc, &config.radar);
            BuiltChart::new(chart, out.title.clone(), &RadarDocument::new(&out))?
        }
        Chart::RadarPossession => {
            let passing = schema::load_passing(&data.file(&data.passing))
                .context("failed to load passing data")?;
            let possession = schema::load_possession(&data.file(&data.possession))
                .context("failed to load possession data")?;
            let fixtures = schema::load_fixtures(&data.file(&data.scores_fixtures))
                .context("failed to load scores and fixtures data")?;
            let out = radar::possession_radar(
                &passing,
                &possession,
                &fixtures,
                &config.radar,
                &config.tournament.competition,
                &config.tournament.focus_squad,
            );
            BuiltChart::new(chart, out.title.clone(), &RadarDocument::new(&out))?
        }
        Chart::Violin(metric) => {
            let roster = schema::load_roster(&data.file(&data.standard_stats))
                .context("failed to load roster data")?;
            let out = violin::violin_chart(&violin::violin_rows(&roster), metric);
            BuiltChart::new(chart, out.title.clone(), &out)?
        }
    };
    info!("built chart {}", built.id);
    Ok(built)
}

// ---------------------------------------------------------------------------
// Document payloads that add render-ready fields to a pipeline output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HeatmapDocument<'a> {
    #[serde(flatten)]
    heatmap: &'a heatmap::PerformanceHeatmap,
    descriptions: Vec<StatDescription>,
}

#[derive(Serialize)]
struct StatDescription {
    code: &'static str,
    description: &'static str,
}

impl<'a> HeatmapDocument<'a> {
    fn new(heatmap: &'a heatmap::PerformanceHeatmap) -> Self {
        let descriptions = heatmap::PerformanceHeatmap::descriptions()
            .into_iter()
            .map(|(code, description)| StatDescription { code, description })
            .collect();
        HeatmapDocument {
            heatmap,
            descriptions,
        }
    }
}

/// Radar series with each polygon closed for cyclic rendering.
#[derive(Serialize)]
struct RadarDocument<'a> {
    #[serde(flatten)]
    radar: &'a radar::RadarSeries,
    closed_categories: Vec<&'static str>,
    closed: Vec<ClosedSeries<'a>>,
}

#[derive(Serialize)]
struct ClosedSeries<'a> {
    team: &'a str,
    values: Vec<f64>,
}

impl<'a> RadarDocument<'a> {
    fn new(radar: &'a radar::RadarSeries) -> Self {
        let closed = radar
            .teams
            .iter()
            .map(|t| ClosedSeries {
                team: &t.team,
                values: radar.closed_values(&t.team).unwrap_or_default(),
            })
            .collect();
        RadarDocument {
            radar,
            closed_categories: radar.closed_categories(),
            closed,
        }
    }
}
