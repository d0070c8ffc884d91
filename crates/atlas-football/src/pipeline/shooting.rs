// Shooting efficiency per squad: every shot lands in exactly one bucket
// (goal, saved/missed on target, off target), shown as tournament totals and
// as per-match averages.

use crate::schema::ShootingRow;
use crate::selector::{SelectorError, ShotView};
use crate::shaping::{group_sum, WideRow};
use atlas_core::numeric::{round_half_even, truncated_percent};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotBucket {
    MissedOffTarget,
    MissedOnTarget,
    Goals,
}

impl ShotBucket {
    /// Column order of the wide table, and legend order.
    pub const ALL: [ShotBucket; 3] = [
        ShotBucket::MissedOffTarget,
        ShotBucket::MissedOnTarget,
        ShotBucket::Goals,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShotBucket::MissedOffTarget => "Missed Shots not on Target",
            ShotBucket::MissedOnTarget => "Missed Shots on Target",
            ShotBucket::Goals => "Goals",
        }
    }

    /// Legend labels in `ALL` order.
    pub fn labels() -> [&'static str; 3] {
        Self::ALL.map(|b| b.label())
    }
}

impl Serialize for ShotBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotRow {
    pub squad: String,
    pub bucket: ShotBucket,
    pub value: f64,
    /// Share of the squad's shots in this view; `None` for a squad with no shots.
    pub percentage: Option<f64>,
    pub view: ShotView,
}

/// Both views, concatenated: every Overall row, then every Per Match row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShootingTable {
    pub rows: Vec<ShotRow>,
}

/// The rows of one view plus the labels the bar chart needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShootingView {
    pub view: ShotView,
    pub title: &'static str,
    pub legend_title: &'static str,
    pub y_axis_title: &'static str,
    pub buckets: Vec<&'static str>,
    pub rows: Vec<ShotRow>,
}

impl ShootingTable {
    pub fn view(&self, view: ShotView) -> ShootingView {
        ShootingView {
            view,
            title: view.title(),
            legend_title: "Type of Shots",
            y_axis_title: "Number of shots",
            buckets: ShotBucket::labels().to_vec(),
            rows: self.rows.iter().filter(|r| r.view == view).cloned().collect(),
        }
    }

    /// Select a view by its control label ("Overall", "Per Match").
    pub fn select(&self, label: &str) -> Result<ShootingView, SelectorError> {
        Ok(self.view(label.parse()?))
    }

    pub fn squad_rows<'a>(
        &'a self,
        view: ShotView,
        squad: &'a str,
    ) -> impl Iterator<Item = &'a ShotRow> {
        self.rows
            .iter()
            .filter(move |r| r.view == view && r.squad == squad)
    }

    /// Value of one bucket for one squad in one view.
    pub fn value(&self, view: ShotView, squad: &str, bucket: ShotBucket) -> Option<f64> {
        self.squad_rows(view, squad)
            .find(|r| r.bucket == bucket)
            .map(|r| r.value)
    }
}

/// Build both shooting views from per-player, per-match rows.
pub fn shooting_efficiency(rows: &[ShootingRow], matches_played: u32) -> ShootingTable {
    let totals = group_sum(rows, |r| r.squad.as_str(), |r| {
        [r.goals, r.shots, r.shots_on_target]
    });
    debug!("shooting: {} squads from {} rows", totals.len(), rows.len());

    let overall: Vec<WideRow<3>> = totals
        .iter()
        .map(|t| {
            let [goals, shots, on_target] = t.values;
            WideRow {
                id: t.id.clone(),
                // Off target is Sh - SoT, not Sh - Gls - SoT: goals are already
                // inside SoT, and subtracting them twice would leave the buckets
                // short of Sh (Gls 3, Sh 16, SoT 8 must give 8 / 5 / 3).
                values: [shots - on_target, on_target - goals, goals],
            }
        })
        .collect();

    let matches = f64::from(matches_played);
    let per_match: Vec<WideRow<3>> = overall
        .iter()
        .map(|w| WideRow {
            id: w.id.clone(),
            values: w.values.map(|v| round_half_even(v / matches, 0)),
        })
        .collect();

    let mut overall_rows = bucket_rows(&overall, ShotView::Overall);
    overall_rows.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut per_match_rows = bucket_rows(&per_match, ShotView::PerMatch);
    per_match_rows.sort_by(|a, b| {
        a.value
            .total_cmp(&b.value)
            .then_with(|| b.squad.cmp(&a.squad))
    });

    overall_rows.extend(per_match_rows);
    ShootingTable { rows: overall_rows }
}

/// Long rows, bucket-major, each with its share of the squad's shots.
fn bucket_rows(wide: &[WideRow<3>], view: ShotView) -> Vec<ShotRow> {
    let mut out = Vec::with_capacity(wide.len() * ShotBucket::ALL.len());
    for (i, bucket) in ShotBucket::ALL.into_iter().enumerate() {
        for squad in wide {
            out.push(ShotRow {
                squad: squad.id.clone(),
                bucket,
                value: squad.values[i],
                percentage: truncated_percent(squad.values[i], squad.total()),
                view,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(squad: &str, goals: f64, shots: f64, on_target: f64) -> ShootingRow {
        ShootingRow {
            squad: squad.into(),
            goals,
            shots,
            shots_on_target: on_target,
        }
    }

    fn morocco_rows() -> Vec<ShootingRow> {
        vec![shot("Morocco", 2.0, 10.0, 5.0), shot("Morocco", 1.0, 6.0, 3.0)]
    }

    #[test]
    fn overall_buckets_partition_all_shots() {
        let table = shooting_efficiency(&morocco_rows(), 7);
        let v = |b| table.value(ShotView::Overall, "Morocco", b).unwrap();
        assert_eq!(v(ShotBucket::Goals), 3.0);
        assert_eq!(v(ShotBucket::MissedOnTarget), 5.0);
        assert_eq!(v(ShotBucket::MissedOffTarget), 8.0);
    }

    #[test]
    fn overall_percentages_of_squad_total() {
        let table = shooting_efficiency(&morocco_rows(), 7);
        let pct = |b| {
            table
                .squad_rows(ShotView::Overall, "Morocco")
                .find(|r| r.bucket == b)
                .unwrap()
                .percentage
        };
        assert_eq!(pct(ShotBucket::Goals), Some(18.75));
        assert_eq!(pct(ShotBucket::MissedOnTarget), Some(31.25));
        assert_eq!(pct(ShotBucket::MissedOffTarget), Some(50.0));
    }

    #[test]
    fn off_target_excludes_every_shot_on_target() {
        let table = shooting_efficiency(&[shot("Morocco", 2.0, 10.0, 5.0)], 7);
        let v = |b| table.value(ShotView::Overall, "Morocco", b).unwrap();
        assert_eq!(v(ShotBucket::MissedOffTarget), 5.0);
        assert_eq!(v(ShotBucket::MissedOnTarget), 3.0);
        assert_eq!(v(ShotBucket::Goals), 2.0);
        let sum: f64 = ShotBucket::ALL.into_iter().map(v).sum();
        assert_eq!(sum, 10.0);
    }

    #[test]
    fn every_squad_has_every_bucket_in_both_views() {
        let rows = vec![
            shot("Morocco", 1.0, 9.0, 4.0),
            shot("France", 3.0, 12.0, 6.0),
            shot("Qatar", 0.0, 0.0, 0.0),
        ];
        let table = shooting_efficiency(&rows, 7);
        for view in ShotView::ALL {
            for squad in ["Morocco", "France", "Qatar"] {
                let buckets: Vec<ShotBucket> =
                    table.squad_rows(view, squad).map(|r| r.bucket).collect();
                for bucket in ShotBucket::ALL {
                    assert_eq!(
                        buckets.iter().filter(|b| **b == bucket).count(),
                        1,
                        "{squad} {view} {bucket:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn buckets_serialize_as_legend_labels() {
        assert_eq!(
            ShotBucket::labels(),
            ["Missed Shots not on Target", "Missed Shots on Target", "Goals"]
        );
        for bucket in ShotBucket::ALL {
            let json = serde_json::to_string(&bucket).unwrap();
            assert_eq!(json, format!("\"{}\"", bucket.label()));
        }
        let view = shooting_efficiency(&morocco_rows(), 7).view(ShotView::Overall);
        assert_eq!(view.buckets, ShotBucket::labels().to_vec());
    }

    #[test]
    fn per_match_rounds_each_bucket() {
        // 3/7 -> 0, 5/7 -> 1, 8/7 -> 1
        let table = shooting_efficiency(&morocco_rows(), 7);
        let v = |b| table.value(ShotView::PerMatch, "Morocco", b).unwrap();
        assert_eq!(v(ShotBucket::Goals), 0.0);
        assert_eq!(v(ShotBucket::MissedOnTarget), 1.0);
        assert_eq!(v(ShotBucket::MissedOffTarget), 1.0);

        let goals = table
            .squad_rows(ShotView::PerMatch, "Morocco")
            .find(|r| r.bucket == ShotBucket::Goals)
            .unwrap();
        assert_eq!(goals.percentage, Some(0.0));
    }

    #[test]
    fn per_match_rounding_ties_to_even() {
        // 14 goals over 4 matches = 3.5 -> 4; 10 over 4 = 2.5 -> 2
        let rows = vec![shot("France", 14.0, 24.0, 24.0), shot("Croatia", 10.0, 10.0, 10.0)];
        let table = shooting_efficiency(&rows, 4);
        assert_eq!(table.value(ShotView::PerMatch, "France", ShotBucket::Goals), Some(4.0));
        assert_eq!(table.value(ShotView::PerMatch, "Croatia", ShotBucket::Goals), Some(2.0));
    }

    #[test]
    fn overall_rows_precede_per_match_rows() {
        let rows = vec![shot("Morocco", 1.0, 9.0, 4.0), shot("France", 3.0, 12.0, 6.0)];
        let table = shooting_efficiency(&rows, 7);
        assert_eq!(table.rows.len(), 12);
        assert!(table.rows[..6].iter().all(|r| r.view == ShotView::Overall));
        assert!(table.rows[6..].iter().all(|r| r.view == ShotView::PerMatch));
    }

    #[test]
    fn rows_sorted_by_value_within_view() {
        let rows = vec![shot("Morocco", 1.0, 9.0, 4.0), shot("France", 3.0, 12.0, 6.0)];
        let table = shooting_efficiency(&rows, 7);
        for view in ShotView::ALL {
            let values: Vec<f64> = table.view(view).rows.iter().map(|r| r.value).collect();
            assert!(values.windows(2).all(|w| w[0] <= w[1]), "{view}: {values:?}");
        }
    }

    #[test]
    fn per_match_ties_ordered_by_squad_descending() {
        let rows = vec![shot("Argentina", 7.0, 7.0, 7.0), shot("Morocco", 7.0, 7.0, 7.0)];
        let table = shooting_efficiency(&rows, 7);
        let per_match = table.view(ShotView::PerMatch);
        // Both squads: off 0, on 0, goals 1 -> zeros first, Morocco before Argentina.
        let order: Vec<(&str, f64)> = per_match
            .rows
            .iter()
            .map(|r| (r.squad.as_str(), r.value))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Morocco", 0.0),
                ("Morocco", 0.0),
                ("Argentina", 0.0),
                ("Argentina", 0.0),
                ("Morocco", 1.0),
                ("Argentina", 1.0),
            ]
        );
    }

    #[test]
    fn percentages_sum_to_hundred_per_squad_and_view() {
        let rows = vec![
            shot("Morocco", 6.0, 63.0, 20.0),
            shot("France", 16.0, 98.0, 39.0),
        ];
        let table = shooting_efficiency(&rows, 7);
        for view in ShotView::ALL {
            for squad in ["Morocco", "France"] {
                let sum: f64 = table
                    .squad_rows(view, squad)
                    .filter_map(|r| r.percentage)
                    .sum();
                assert!((sum - 100.0).abs() <= 0.03 + 1e-9, "{squad} {view}: {sum}");
            }
        }
    }

    #[test]
    fn squad_without_shots_has_no_percentages() {
        let table = shooting_efficiency(&[shot("Qatar", 0.0, 0.0, 0.0)], 7);
        assert!(table.rows.iter().all(|r| r.percentage.is_none()));
    }

    #[test]
    fn select_by_label() {
        let table = shooting_efficiency(&morocco_rows(), 7);
        let view = table.select("Per Match").unwrap();
        assert_eq!(view.view, ShotView::PerMatch);
        assert_eq!(view.title, "Average efficiency in offensive actions per match");
        assert_eq!(view.rows.len(), 3);
        assert!(view.rows.iter().all(|r| r.view == ShotView::PerMatch));
    }

    #[test]
    fn select_unknown_label_is_rejected() {
        let table = shooting_efficiency(&morocco_rows(), 7);
        assert_eq!(
            table.select("Season"),
            Err(SelectorError::UnknownView("Season".into()))
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let rows = vec![shot("Morocco", 1.0, 9.0, 4.0), shot("France", 3.0, 12.0, 6.0)];
        assert_eq!(shooting_efficiency(&rows, 7), shooting_efficiency(&rows, 7));
    }
}
