//! Region of interest (ROI) geometry.
//!
//! The ROI is immutable and fixed for the session. All spatial filtering and
//! reduction in the aggregation pipeline happens against it on the remote
//! service; locally the geometry is only described and serialized, never
//! rasterized.

use serde::{Deserialize, Serialize};

use crate::remote::error::{ServiceError, ServiceResult};

/// Where a region's polygon geometry lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionGeometry {
    /// A vector asset published on the compute service; the service loads
    /// the polygons itself, nothing is shipped inline.
    Asset { path: String },
    /// An inline ring of `[lon, lat]` vertices in decimal degrees forming a
    /// single closed ring (the closing vertex is implicit).
    Ring(Vec<[f64; 2]>),
}

/// An immutable polygonal region used as the spatial filter for all queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    name: String,
    geometry: RegionGeometry,
}

impl RegionOfInterest {
    /// Create a region backed by a published vector asset.
    pub fn from_asset(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: RegionGeometry::Asset { path: path.into() },
        }
    }

    /// Create a region from a named inline ring of `[lon, lat]` vertices.
    pub fn new(name: impl Into<String>, ring: Vec<[f64; 2]>) -> ServiceResult<Self> {
        if ring.len() < 3 {
            return Err(ServiceError::configuration(
                "region polygon needs at least 3 vertices",
            ));
        }
        for [lon, lat] in &ring {
            if !(-180.0..=180.0).contains(lon) {
                return Err(ServiceError::configuration(format!(
                    "longitude {} out of range [-180, 180]",
                    lon
                )));
            }
            if !(-90.0..=90.0).contains(lat) {
                return Err(ServiceError::configuration(format!(
                    "latitude {} out of range [-90, 90]",
                    lat
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            geometry: RegionGeometry::Ring(ring),
        })
    }

    /// The paddy-field study area in the Nalgonda district
    /// (Shaligouraram/Kattangur mandals): the published field-polygon asset.
    pub fn study_area() -> Self {
        Self::from_asset(
            "nalgonda_paddy_fields",
            crate::catalog::FIELD_GEOMETRY_ASSET,
        )
    }

    /// Approximate bounding ring around the study area, for contexts where
    /// the published field-polygon asset is not available. Coarser than the
    /// authoritative geometry.
    pub fn study_area_bounds() -> Self {
        Self {
            name: "nalgonda_study_area_bounds".to_string(),
            geometry: RegionGeometry::Ring(vec![
                [79.25, 17.19],
                [79.40, 17.19],
                [79.40, 17.31],
                [79.25, 17.31],
            ]),
        }
    }

    /// Region name, used in logs and pipeline descriptions.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &RegionGeometry {
        &self.geometry
    }

    /// Geometry object for the pipeline wire format: an asset reference, or
    /// a GeoJSON-style polygon for inline rings.
    pub fn to_geometry(&self) -> serde_json::Value {
        match &self.geometry {
            RegionGeometry::Asset { path } => serde_json::json!({
                "type": "asset_reference",
                "path": path,
            }),
            RegionGeometry::Ring(ring) => {
                let mut ring: Vec<serde_json::Value> = ring
                    .iter()
                    .map(|[lon, lat]| serde_json::json!([lon, lat]))
                    .collect();
                // GeoJSON rings close explicitly.
                if let Some(first) = ring.first().cloned() {
                    ring.push(first);
                }
                serde_json::json!({
                    "type": "Polygon",
                    "coordinates": [ring],
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RegionGeometry, RegionOfInterest};
    use crate::catalog::FIELD_GEOMETRY_ASSET;
    use crate::remote::error::ServiceError;

    #[test]
    fn test_study_area_references_published_geometry() {
        let region = RegionOfInterest::study_area();
        match region.geometry() {
            RegionGeometry::Asset { path } => assert_eq!(path, FIELD_GEOMETRY_ASSET),
            other => panic!("unexpected geometry: {:?}", other),
        }
        let geometry = region.to_geometry();
        assert_eq!(geometry["type"], "asset_reference");
        assert_eq!(geometry["path"], FIELD_GEOMETRY_ASSET);
    }

    #[test]
    fn test_study_area_bounds_is_valid_ring() {
        let region = RegionOfInterest::study_area_bounds();
        match region.geometry() {
            RegionGeometry::Ring(ring) => assert!(ring.len() >= 3),
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn test_too_few_vertices_rejected() {
        let err = RegionOfInterest::new("broken", vec![[0.0, 0.0], [1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration { .. }));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let err =
            RegionOfInterest::new("broken", vec![[0.0, 0.0], [1.0, 0.0], [200.0, 1.0]]).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration { .. }));
    }

    #[test]
    fn test_geojson_ring_is_closed() {
        let region = RegionOfInterest::study_area_bounds();
        let geojson = region.to_geometry();
        let ring = geojson["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }
}
