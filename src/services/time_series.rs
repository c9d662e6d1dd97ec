//! NDVI time-series computation.
//!
//! Builds the mean-NDVI-per-date aggregation pipeline for the study region,
//! submits it to the compute backend and post-processes the returned table
//! into an ordered series. One blocking remote call per invocation; the
//! series is recomputed in full on every date-range change.

use crate::models::{DateRange, NdviSeries, Observation, RegionOfInterest};
use crate::remote::client::GeoComputeClient;
use crate::remote::error::ServiceResult;
use crate::remote::pipeline::{AggregationPipeline, PipelineConfig};

/// Compute the NDVI series for a region over a date range.
///
/// The range is validated at construction ([`DateRange::new`]), so an
/// invalid range can never reach this function; callers reject it before
/// any request is issued.
///
/// Rows whose scalar came back null (every pixel of the scene masked over
/// the region) are dropped rather than kept as null observations, so the
/// result is a dense table. Same-date rows are collapsed by
/// [`NdviSeries::from_unordered`], making the output strictly ascending by
/// date with no duplicates.
pub async fn compute_series(
    client: &dyn GeoComputeClient,
    config: &PipelineConfig,
    region: &RegionOfInterest,
    range: &DateRange,
) -> ServiceResult<NdviSeries> {
    let pipeline = AggregationPipeline::ndvi_mean_series(config, region, range);
    let fingerprint = pipeline.fingerprint();
    log::debug!(
        "computing NDVI series from {} for {} over {} (pipeline {})",
        pipeline.collection(),
        region.name(),
        range,
        &fingerprint[..16]
    );

    let rows = client.submit_aggregation(&pipeline).await?;

    let total = rows.len();
    let observations: Vec<Observation> = rows
        .into_iter()
        .filter_map(|row| {
            row.value.map(|ndvi| Observation {
                date: row.date,
                ndvi,
            })
        })
        .collect();
    let masked = total - observations.len();
    if masked > 0 {
        log::debug!("dropped {} fully masked scene(s) from series", masked);
    }

    Ok(NdviSeries::from_unordered(observations))
}

#[cfg(all(test, feature = "local-backend"))]
#[path = "time_series_tests.rs"]
mod time_series_tests;
