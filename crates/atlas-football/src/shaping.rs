// Wide-to-long reshaping, keyed sums, and per-group percentage shares.

use atlas_core::numeric::truncated_percent;
use std::collections::{BTreeMap, HashMap};

/// One entity (player or squad) with a fixed, ordered set of stat values.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow<const N: usize> {
    pub id: String,
    pub values: [f64; N],
}

impl<const N: usize> WideRow<N> {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// One (entity, stat) cell after reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub id: String,
    pub variable: &'static str,
    pub value: f64,
}

/// Sum rows per key. Output is ordered by key.
pub fn group_sum<T, const N: usize>(
    rows: &[T],
    key: impl Fn(&T) -> &str,
    values: impl Fn(&T) -> [f64; N],
) -> Vec<WideRow<N>> {
    let mut groups: BTreeMap<&str, [f64; N]> = BTreeMap::new();
    for row in rows {
        let acc = groups.entry(key(row)).or_insert([0.0; N]);
        for (slot, v) in acc.iter_mut().zip(values(row)) {
            *slot += v;
        }
    }
    groups
        .into_iter()
        .map(|(id, values)| WideRow {
            id: id.to_string(),
            values,
        })
        .collect()
}

/// Merge rows that share an id by summing their values, keeping the order in
/// which ids first appear. Returns the merged rows and the ids that repeated.
pub fn collapse_duplicates<const N: usize>(
    rows: Vec<WideRow<N>>,
) -> (Vec<WideRow<N>>, Vec<String>) {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<WideRow<N>> = Vec::with_capacity(rows.len());
    let mut repeated = Vec::new();

    for row in rows {
        let existing = index.get(&row.id).copied();
        match existing {
            Some(i) => {
                for (slot, v) in merged[i].values.iter_mut().zip(row.values) {
                    *slot += v;
                }
                if !repeated.contains(&row.id) {
                    repeated.push(row.id);
                }
            }
            None => {
                index.insert(row.id.clone(), merged.len());
                merged.push(row);
            }
        }
    }
    (merged, repeated)
}

/// Reshape wide rows to long rows, variable-major: every entity for the first
/// label, then every entity for the second, and so on.
pub fn melt<const N: usize>(rows: &[WideRow<N>], labels: &[&'static str; N]) -> Vec<LongRow> {
    let mut out = Vec::with_capacity(rows.len() * N);
    for (i, label) in labels.iter().enumerate() {
        for row in rows {
            out.push(LongRow {
                id: row.id.clone(),
                variable: *label,
                value: row.values[i],
            });
        }
    }
    out
}

/// Each row's truncated percentage of its id's total across `rows`.
/// `None` where the id's total is zero.
pub fn group_shares(rows: &[LongRow]) -> Vec<Option<f64>> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for row in rows {
        *totals.entry(row.id.as_str()).or_insert(0.0) += row.value;
    }
    rows.iter()
        .map(|row| truncated_percent(row.value, totals[row.id.as_str()]))
        .collect()
}
