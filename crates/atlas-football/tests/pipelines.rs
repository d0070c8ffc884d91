// End-to-end checks: load the fixture CSVs through the public loaders and run
// every chart pipeline over them.

use std::path::PathBuf;

use atlas_core::config::{AllowList, HeatmapConfig, RadarConfig};
use atlas_football::pipeline::heatmap::{performance_heatmap, HeatmapStat};
use atlas_football::pipeline::passing_defense::{defense_shares, passing_shares};
use atlas_football::pipeline::radar::{defensive_radar, possession_radar};
use atlas_football::pipeline::shooting::{shooting_efficiency, ShotBucket};
use atlas_football::pipeline::violin::{violin_chart, violin_rows};
use atlas_football::schema;
use atlas_football::selector::{ShotView, ViolinMetric};

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn allow(names: &[&str]) -> AllowList {
    AllowList {
        players: names.iter().map(|n| n.to_string()).collect(),
    }
}

fn radar_config() -> RadarConfig {
    RadarConfig {
        teams: vec![
            "Argentina".into(),
            "Croatia".into(),
            "France".into(),
            "Morocco".into(),
        ],
        playing_time: vec![7.7, 7.7, 7.3, 7.3],
        recoveries_position: "DF".into(),
    }
}

fn heatmap_config() -> HeatmapConfig {
    HeatmapConfig {
        squad: "Morocco".into(),
        top_n: 10,
        excluded_position: "GK".into(),
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ===========================================================================
// Bar charts
// ===========================================================================

#[test]
fn passing_chart_from_fixture() {
    let rows = schema::load_passing(&fixture("Passing.csv")).unwrap();
    let players = allow(&[
        "Youssef EnNesyri",
        "Sofiane Boufal",
        "Azzedine Ounahi",
        "Hakim Ziyech",
        "Achraf Hakimi",
    ]);
    let chart = passing_shares(&rows, &players);

    assert_eq!(
        chart.players(),
        vec![
            "Achraf Hakimi",
            "Azzedine Ounahi",
            "Hakim Ziyech",
            "Sofiane Boufal",
            "Youssef EnNesyri"
        ]
    );
    assert_eq!(chart.rows.len(), 15);
    let hakimi_short = chart
        .rows_for("Achraf Hakimi")
        .find(|r| r.stat == "Short Pass")
        .unwrap();
    assert_eq!(hakimi_short.value, 150.0);
    assert_eq!(hakimi_short.percentage, Some(51.72));
}

#[test]
fn defense_chart_from_fixture() {
    let rows = schema::load_defensive_actions(&fixture("DefensiveActions.csv")).unwrap();
    let players = allow(&[
        "Romain Saiss",
        "Noussair Mazraoui",
        "Nayef Aguerd",
        "Achraf Hakimi",
        "Sofyan Amrabat",
    ]);
    let chart = defense_shares(&rows, &players);
    assert_eq!(chart.players()[0], "Sofyan Amrabat");
    assert!(!chart.players().contains(&"Hakim Ziyech"));
    for player in chart.players() {
        let sum: f64 = chart.rows_for(player).filter_map(|r| r.percentage).sum();
        assert!(sum > 99.9 && sum <= 100.0 + 1e-9, "{player}: {sum}");
    }
}

// ===========================================================================
// Shooting
// ===========================================================================

#[test]
fn shooting_views_from_fixture() {
    let rows = schema::load_shooting(&fixture("Shooting.csv")).unwrap();
    let table = shooting_efficiency(&rows, 7);

    let overall = table.view(ShotView::Overall);
    assert_eq!(overall.rows.len(), 12);
    assert_eq!(
        table.value(ShotView::Overall, "Morocco", ShotBucket::MissedOffTarget),
        Some(8.0)
    );
    assert_eq!(
        table.value(ShotView::Overall, "France", ShotBucket::Goals),
        Some(12.0)
    );
    // France: 24 off target over 7 matches -> 3.43 -> 3
    assert_eq!(
        table.value(ShotView::PerMatch, "France", ShotBucket::MissedOffTarget),
        Some(3.0)
    );
}

// ===========================================================================
// Heatmap
// ===========================================================================

#[test]
fn heatmap_from_fixture() {
    let pt = schema::load_playing_time(&fixture("PlayingTime.csv")).unwrap();
    let ss = schema::load_standard_stats(&fixture("StandardStats.csv")).unwrap();
    let heatmap = performance_heatmap(&pt, &ss, &heatmap_config());

    assert_eq!(heatmap.players.len(), 10);
    assert_eq!(heatmap.players[0], "Achraf Hakimi");
    assert_eq!(heatmap.players[1], "Sofyan Amrabat");
    assert!(!heatmap.players.iter().any(|p| p == "Yassine Bounou"));
    assert!(!heatmap.players.iter().any(|p| p == "Kylian Mbappe"));
    assert!(!heatmap.players.iter().any(|p| p == "Jawad El Yamiq"));

    let ziyech = heatmap.row("Hakim Ziyech").unwrap();
    let g = heatmap.column(HeatmapStat::Goals);
    assert!(approx_eq(heatmap.differentials[ziyech][g], -0.06));

    // 5 / 7 = 0.71 against 8.1 / 7 = 1.16, negated
    let ga = heatmap.column(HeatmapStat::OnGoalsAgainst);
    assert!(approx_eq(heatmap.differentials[0][ga], 0.45));

    for row in &heatmap.normalized {
        assert!(row.iter().all(|v| (-1.0..=1.0).contains(v)));
    }
    assert_eq!(heatmap.hover[0][0].position, "Defender");
}

// ===========================================================================
// Radars
// ===========================================================================

#[test]
fn defensive_radar_from_fixture() {
    let defense = schema::load_defensive_actions(&fixture("DefensiveActions.csv")).unwrap();
    let misc = schema::load_miscellaneous(&fixture("MiscellaneousStats.csv")).unwrap();
    let radar = defensive_radar(&defense, &misc, &radar_config());

    let teams: Vec<&str> = radar.teams.iter().map(|t| t.team.as_str()).collect();
    assert_eq!(teams, vec!["Argentina", "Croatia", "France", "Morocco"]);
    assert_eq!(
        radar.values("Morocco").unwrap(),
        &[4.4, 5.3, 13.0, 7.1, 4.8, 6.3]
    );
}

#[test]
fn possession_radar_from_fixture() {
    let passing = schema::load_passing(&fixture("Passing.csv")).unwrap();
    let possession = schema::load_possession(&fixture("Possession.csv")).unwrap();
    let fixtures = schema::load_fixtures(&fixture("ScoresFixtures.csv")).unwrap();
    let radar = possession_radar(
        &passing,
        &possession,
        &fixtures,
        &radar_config(),
        "World Cup",
        "Morocco",
    );

    assert_eq!(radar.values("Morocco").unwrap(), &[33.0, 31.8, 34.4, 45.5]);
    assert_eq!(radar.value("Argentina", "Possession (%)"), Some(64.0));
    assert_eq!(radar.closed_values("France").unwrap().len(), 5);
}

// ===========================================================================
// Violin
// ===========================================================================

#[test]
fn violin_from_fixture() {
    let roster = schema::load_roster(&fixture("StandardStats.csv")).unwrap();
    let rows = violin_rows(&roster);
    assert_eq!(rows.len(), 15);

    let chart = violin_chart(&rows, ViolinMetric::Age);
    assert_eq!(chart.squads, vec!["Morocco", "France"]);
    let ages: Vec<f64> = chart.squad_values("France").collect();
    assert_eq!(ages, vec![23.0]);
    assert!(chart.points[0].hover.starts_with("<b>Player:</b> Yassine Bounou"));
}

#[test]
fn loaders_reject_wrong_dataset() {
    let err = schema::load_shooting(&fixture("Passing.csv")).unwrap_err();
    assert!(matches!(err, schema::LoadError::MissingColumn { column: "Gls", .. }));
}

// ===========================================================================
// Repeated runs
// ===========================================================================

#[test]
fn bar_charts_identical_on_repeated_runs() {
    let passing = schema::load_passing(&fixture("Passing.csv")).unwrap();
    let players = allow(&["Hakim Ziyech", "Achraf Hakimi", "Sofiane Boufal"]);
    assert_eq!(
        passing_shares(&passing, &players),
        passing_shares(&passing, &players)
    );

    let defense = schema::load_defensive_actions(&fixture("DefensiveActions.csv")).unwrap();
    let players = allow(&["Romain Saiss", "Nayef Aguerd", "Sofyan Amrabat"]);
    assert_eq!(
        defense_shares(&defense, &players),
        defense_shares(&defense, &players)
    );
}

#[test]
fn heatmap_identical_on_repeated_runs() {
    let pt = schema::load_playing_time(&fixture("PlayingTime.csv")).unwrap();
    let ss = schema::load_standard_stats(&fixture("StandardStats.csv")).unwrap();
    let first = performance_heatmap(&pt, &ss, &heatmap_config());

    // Reload from disk as well, so the comparison covers the whole path.
    let pt = schema::load_playing_time(&fixture("PlayingTime.csv")).unwrap();
    let ss = schema::load_standard_stats(&fixture("StandardStats.csv")).unwrap();
    assert_eq!(first, performance_heatmap(&pt, &ss, &heatmap_config()));
}

#[test]
fn radars_identical_on_repeated_runs() {
    let defense = schema::load_defensive_actions(&fixture("DefensiveActions.csv")).unwrap();
    let misc = schema::load_miscellaneous(&fixture("MiscellaneousStats.csv")).unwrap();
    assert_eq!(
        defensive_radar(&defense, &misc, &radar_config()),
        defensive_radar(&defense, &misc, &radar_config())
    );

    let passing = schema::load_passing(&fixture("Passing.csv")).unwrap();
    let possession = schema::load_possession(&fixture("Possession.csv")).unwrap();
    let fixtures = schema::load_fixtures(&fixture("ScoresFixtures.csv")).unwrap();
    let run = || {
        possession_radar(
            &passing,
            &possession,
            &fixtures,
            &radar_config(),
            "World Cup",
            "Morocco",
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn violin_identical_on_repeated_runs() {
    let roster = schema::load_roster(&fixture("StandardStats.csv")).unwrap();
    for metric in ViolinMetric::ALL {
        assert_eq!(
            violin_chart(&violin_rows(&roster), metric),
            violin_chart(&violin_rows(&roster), metric)
        );
    }
}

#[test]
fn shooting_identical_on_repeated_runs() {
    let rows = schema::load_shooting(&fixture("Shooting.csv")).unwrap();
    assert_eq!(shooting_efficiency(&rows, 7), shooting_efficiency(&rows, 7));
}
