// Shared infrastructure for the tournament dashboard: configuration files and
// the numeric conventions every pipeline agrees on.

pub mod config;
pub mod numeric;
