// Chart pipelines. Each one is a pure function of already-loaded rows plus
// the policy constants from the tournament config.

pub mod heatmap;
pub mod passing_defense;
pub mod radar;
pub mod shooting;
pub mod violin;
