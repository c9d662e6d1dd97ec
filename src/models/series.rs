//! NDVI time-series domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One satellite pass that survived cloud filtering: an acquisition date and
/// the mean NDVI over the region for that date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Acquisition date of the pass
    pub date: NaiveDate,
    /// Mean NDVI over the region, in [-1, 1]
    pub ndvi: f64,
}

/// An NDVI series: observations strictly ascending by date, one per date.
///
/// The constructor establishes the ordering invariant; re-computing with
/// identical inputs against an unchanged dataset yields an identical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdviSeries {
    observations: Vec<Observation>,
}

impl NdviSeries {
    /// Build a series from unordered observations.
    ///
    /// Observations are sorted ascending by date. Multiple observations on
    /// the same date (adjacent tiles of the same pass) are collapsed by
    /// averaging, so the result has no duplicate dates.
    pub fn from_unordered(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);

        let mut collapsed: Vec<Observation> = Vec::with_capacity(observations.len());
        let mut same_date_count = 0usize;
        for obs in observations {
            match collapsed.last_mut() {
                Some(last) if last.date == obs.date => {
                    same_date_count += 1;
                    // Running mean over same-date observations.
                    last.ndvi += (obs.ndvi - last.ndvi) / (same_date_count + 1) as f64;
                }
                _ => {
                    same_date_count = 0;
                    collapsed.push(obs);
                }
            }
        }

        Self {
            observations: collapsed,
        }
    }

    /// An empty series.
    pub fn empty() -> Self {
        Self {
            observations: Vec::new(),
        }
    }

    /// Observations in ascending date order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// NDVI values in date order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|o| o.ndvi)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{NdviSeries, Observation};
    use chrono::NaiveDate;

    fn obs(day: u32, ndvi: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2019, 3, day).unwrap(),
            ndvi,
        }
    }

    #[test]
    fn test_sorts_by_date() {
        let series = NdviSeries::from_unordered(vec![obs(20, 0.5), obs(5, 0.3), obs(10, 0.4)]);
        let dates: Vec<u32> = series
            .observations()
            .iter()
            .map(|o| o.date.format("%d").to_string().parse().unwrap())
            .collect();
        assert_eq!(dates, vec![5, 10, 20]);
    }

    #[test]
    fn test_collapses_duplicate_dates_by_mean() {
        let series = NdviSeries::from_unordered(vec![obs(5, 0.2), obs(5, 0.4), obs(5, 0.6)]);
        assert_eq!(series.len(), 1);
        assert!((series.observations()[0].ndvi - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_strictly_ascending_no_duplicates() {
        let series =
            NdviSeries::from_unordered(vec![obs(5, 0.2), obs(10, 0.4), obs(5, 0.6), obs(10, 0.5)]);
        let dates: Vec<_> = series.observations().iter().map(|o| o.date).collect();
        let mut deduped = dates.clone();
        deduped.dedup();
        assert_eq!(dates, deduped);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty() {
        let series = NdviSeries::empty();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
    }
}
