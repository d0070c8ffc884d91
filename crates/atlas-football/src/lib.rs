// Tournament statistics aggregation: typed CSV inputs, reshaping helpers, and
// the chart pipelines built on them.

pub mod pipeline;
pub mod schema;
pub mod selector;
pub mod shaping;
