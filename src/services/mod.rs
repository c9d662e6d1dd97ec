//! Service layer for business logic and orchestration.
//!
//! This module sits between the HTTP handlers and the remote compute
//! boundary: it constructs aggregation pipelines, post-processes result
//! tables and computes the statistics shown on the dashboard.

pub mod statistics;

pub mod time_series;

pub use statistics::{summarize, FormattedStatistics, SeriesStatistics};
pub use time_series::compute_series;
