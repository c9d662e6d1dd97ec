//! Descriptive statistics over a computed NDVI series.

use serde::{Deserialize, Serialize};

use crate::models::NdviSeries;
use crate::remote::error::{ServiceError, ServiceResult};

/// Summary statistics over the NDVI values of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
}

impl SeriesStatistics {
    /// Two-decimal rendering for the dashboard's metric cards.
    pub fn formatted(&self) -> FormattedStatistics {
        FormattedStatistics {
            mean: format!("{:.2}", self.mean),
            median: format!("{:.2}", self.median),
            max: format!("{:.2}", self.max),
            min: format!("{:.2}", self.min),
        }
    }
}

/// Display-formatted statistics, two decimal places each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedStatistics {
    pub mean: String,
    pub median: String,
    pub max: String,
    pub min: String,
}

/// Summarize a series with mean/median/max/min.
///
/// Fails with `EmptySeries` for a series with zero observations; callers
/// render a "no data" message instead of degenerate numbers.
pub fn summarize(series: &NdviSeries) -> ServiceResult<SeriesStatistics> {
    if series.is_empty() {
        return Err(ServiceError::empty_series(
            "no observations in the requested window",
        ));
    }

    let values: Vec<f64> = series.values().collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if sorted.len() % 2 == 0 {
        (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
    } else {
        sorted[sorted.len() / 2]
    };

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    Ok(SeriesStatistics {
        mean,
        median,
        max,
        min,
    })
}

#[cfg(test)]
#[path = "statistics_tests.rs"]
mod statistics_tests;
