//! Fixed layer catalog and the resolved asset registry.
//!
//! The dashboard exposes a closed set of map layers over pre-computed remote
//! assets: the study-area boundary, an NDVI threshold mask and the Random
//! Forest/SVM classification products. The catalog (paths, display
//! parameters, legends) is static configuration; the registry is the
//! catalog with every asset handle resolved against the compute service.
//!
//! The registry is an explicit object created once at startup and passed by
//! reference to whatever needs it. There is no hidden process-global cache;
//! picking up remote asset changes requires constructing a new registry
//! (in practice, a new process).

use serde::{Deserialize, Serialize};

use crate::remote::client::{AssetKind, GeoComputeClient};
use crate::remote::error::{ErrorContext, ServiceError, ServiceResult};

/// Closed set of dashboard layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Study area boundary (Shaligouraram/Kattangur mandals)
    StudyBoundary,
    /// Rice pixels from NDVI thresholding at 0.65
    NdviThreshold,
    /// Random Forest land classification
    RandomForest,
    /// SVM land classification
    Svm,
    /// Rice-only mask derived from the RF classification
    RicePixelsRf,
    /// Rice-only mask derived from the SVM classification
    RicePixelsSvm,
}

impl LayerKind {
    /// All layers, in dashboard selector order.
    pub const ALL: [LayerKind; 6] = [
        LayerKind::StudyBoundary,
        LayerKind::NdviThreshold,
        LayerKind::RandomForest,
        LayerKind::Svm,
        LayerKind::RicePixelsRf,
        LayerKind::RicePixelsSvm,
    ];

    /// URL-safe identifier used as the HTTP path parameter.
    pub fn slug(&self) -> &'static str {
        match self {
            LayerKind::StudyBoundary => "study-boundary",
            LayerKind::NdviThreshold => "ndvi-threshold",
            LayerKind::RandomForest => "classification-rf",
            LayerKind::Svm => "classification-svm",
            LayerKind::RicePixelsRf => "rice-pixels-rf",
            LayerKind::RicePixelsSvm => "rice-pixels-svm",
        }
    }

    /// Human-readable name shown in the layer selector.
    pub fn title(&self) -> &'static str {
        match self {
            LayerKind::StudyBoundary => "Study Area Boundary",
            LayerKind::NdviThreshold => "NDVI 0.65 Threshold",
            LayerKind::RandomForest => "Random Forest Classification",
            LayerKind::Svm => "SVM Classification",
            LayerKind::RicePixelsRf => "Rice Pixels (RF)",
            LayerKind::RicePixelsSvm => "Rice Pixels (SVM)",
        }
    }

    /// Published path of the backing remote asset.
    pub fn asset_path(&self) -> &'static str {
        match self {
            LayerKind::StudyBoundary => {
                "projects/ee-unipvgee/assets/Shaligouraram_kattangur_Shapefile"
            }
            LayerKind::NdviThreshold => "projects/ee-unipvgee/assets/NDVI_Threshold_Rice",
            LayerKind::RandomForest => "projects/ee-unipvgee/assets/RF_Classified_Image",
            LayerKind::Svm => "projects/ee-unipvgee/assets/SVM_Classified_Image",
            LayerKind::RicePixelsRf => "projects/ee-unipvgee/assets/RicePixelsRF",
            LayerKind::RicePixelsSvm => "projects/ee-unipvgee/assets/RicePixelsSVM",
        }
    }

    /// What kind of asset backs the layer.
    pub fn asset_kind(&self) -> AssetKind {
        match self {
            LayerKind::StudyBoundary => AssetKind::FeatureCollection,
            _ => AssetKind::Image,
        }
    }

    /// Default display parameters (full opacity).
    pub fn display_params(&self) -> DisplayParams {
        match self {
            LayerKind::StudyBoundary => DisplayParams::outline("black"),
            LayerKind::NdviThreshold => DisplayParams::ramp(0.0, 1.0, &["red"]),
            LayerKind::RandomForest | LayerKind::Svm => {
                DisplayParams::ramp(0.0, 4.0, &["red", "cyan", "green", "grey", "blue"])
            }
            LayerKind::RicePixelsRf => DisplayParams::ramp(0.0, 1.0, &["black"]),
            LayerKind::RicePixelsSvm => DisplayParams::ramp(0.0, 1.0, &["blue"]),
        }
    }

    /// Static legend for the layer; empty for the plain boundary.
    pub fn legend(&self) -> Vec<LegendEntry> {
        let classes: &[(&str, &str)] = match self {
            LayerKind::StudyBoundary => &[],
            LayerKind::NdviThreshold => &[("Rice", "#FF0000")],
            LayerKind::RandomForest | LayerKind::Svm => &[
                ("Rice", "#FF0000"),
                ("Lime/Tangerine", "#00FFFF"),
                ("Forest/Shrubs", "#008000"),
                ("Built-Up/Bare Land", "#808080"),
                ("Water", "#0000FF"),
            ],
            LayerKind::RicePixelsRf => &[("Rice Pixels", "#000000")],
            LayerKind::RicePixelsSvm => &[("Rice Pixels", "#0000FF")],
        };
        classes
            .iter()
            .map(|(label, color)| LegendEntry {
                label: label.to_string(),
                color: color.to_string(),
            })
            .collect()
    }

    /// Whether the layer is clipped to the study boundary when rendered.
    pub fn clip_to_boundary(&self) -> bool {
        !matches!(self, LayerKind::StudyBoundary)
    }
}

/// Published field-polygon geometry the time series aggregates over. Not a
/// display layer; the boundary layer shows the mandal outline instead.
pub const FIELD_GEOMETRY_ASSET: &str = "projects/ee-unipvgee/assets/GANESH_AREA";

/// The full set of published asset paths with their kinds.
pub fn published_assets() -> impl Iterator<Item = (&'static str, AssetKind)> {
    LayerKind::ALL
        .iter()
        .map(|kind| (kind.asset_path(), kind.asset_kind()))
        .chain(std::iter::once((
            FIELD_GEOMETRY_ASSET,
            AssetKind::FeatureCollection,
        )))
}

/// Display parameters handed to the presentation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayParams {
    /// Lower bound of the value range (raster layers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound of the value range (raster layers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Color ramp (or single outline color for vector layers)
    pub palette: Vec<String>,
    /// Layer opacity in [0.0, 1.0]; 0.0 renders fully transparent while the
    /// base map stays visible
    pub opacity: f64,
}

impl DisplayParams {
    /// Raster color ramp over a value range.
    pub fn ramp(min: f64, max: f64, palette: &[&str]) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            palette: palette.iter().map(|c| c.to_string()).collect(),
            opacity: 1.0,
        }
    }

    /// Vector outline in a single color.
    pub fn outline(color: &str) -> Self {
        Self {
            min: None,
            max: None,
            palette: vec![color.to_string()],
            opacity: 1.0,
        }
    }

    /// The same parameters with a different opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// One legend row: class label and its hex color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Initial map view for the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapDefaults {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

impl MapDefaults {
    /// Centered on the Nalgonda study area.
    pub fn study_area() -> Self {
        Self {
            center_lat: 17.252094,
            center_lon: 79.323744,
            zoom: 11,
        }
    }
}

/// A catalog layer with its remote handle resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLayer {
    pub kind: LayerKind,
    pub slug: String,
    pub title: String,
    pub handle: crate::remote::client::AssetHandle,
    pub display: DisplayParams,
    pub legend: Vec<LegendEntry>,
    pub clip_to_boundary: bool,
}

/// The fixed catalog with all asset handles resolved.
///
/// Resolution happens once per process; the handles are reused for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    layers: Vec<ResolvedLayer>,
    field_geometry: crate::remote::client::AssetHandle,
}

impl AssetRegistry {
    /// Resolve every catalog layer and the field geometry against the
    /// compute service.
    ///
    /// Fails with `ServiceUnavailable` (service unreachable, bad
    /// credentials) or `NotFound` (asset no longer published); either way
    /// the registry stays unbuilt and startup fails.
    pub async fn resolve(client: &dyn GeoComputeClient) -> ServiceResult<Self> {
        let mut layers = Vec::with_capacity(LayerKind::ALL.len());
        for kind in LayerKind::ALL {
            let handle = client.resolve_asset(kind.asset_path()).await.map_err(|e| {
                log::error!("failed to resolve layer '{}': {}", kind.slug(), e);
                e.with_operation("resolve_registry")
            })?;
            layers.push(ResolvedLayer {
                kind,
                slug: kind.slug().to_string(),
                title: kind.title().to_string(),
                handle,
                display: kind.display_params(),
                legend: kind.legend(),
                clip_to_boundary: kind.clip_to_boundary(),
            });
        }
        let field_geometry = client.resolve_asset(FIELD_GEOMETRY_ASSET).await.map_err(|e| {
            log::error!("failed to resolve field geometry: {}", e);
            e.with_operation("resolve_registry")
        })?;
        log::info!("asset registry resolved ({} layers)", layers.len());
        Ok(Self {
            layers,
            field_geometry,
        })
    }

    /// Handle of the field-polygon geometry the time series aggregates over.
    pub fn field_geometry(&self) -> &crate::remote::client::AssetHandle {
        &self.field_geometry
    }

    /// Look up a layer by kind. Infallible: the catalog is closed and
    /// resolution covers every kind.
    pub fn get(&self, kind: LayerKind) -> &ResolvedLayer {
        // LayerKind::ALL ordering matches `layers`.
        &self.layers[LayerKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default()]
    }

    /// Look up a layer by its URL slug.
    pub fn get_by_slug(&self, slug: &str) -> ServiceResult<&ResolvedLayer> {
        self.layers.iter().find(|l| l.slug == slug).ok_or_else(|| {
            ServiceError::not_found_with_context(
                format!("unknown layer '{}'", slug),
                ErrorContext::new("get_by_slug").with_entity("layer"),
            )
        })
    }

    /// All layers in selector order.
    pub fn layers(&self) -> &[ResolvedLayer] {
        &self.layers
    }
}

#[cfg(all(test, feature = "local-backend"))]
mod registry_tests {
    use super::*;
    use crate::remote::backends::LocalBackend;

    #[tokio::test]
    async fn test_resolve_all_layers() {
        let backend = LocalBackend::new();
        let registry = AssetRegistry::resolve(&backend).await.unwrap();
        assert_eq!(registry.layers().len(), LayerKind::ALL.len());
    }

    #[tokio::test]
    async fn test_resolve_field_geometry() {
        let backend = LocalBackend::new();
        let registry = AssetRegistry::resolve(&backend).await.unwrap();
        let geometry = registry.field_geometry();
        assert_eq!(geometry.path, FIELD_GEOMETRY_ASSET);
        assert_eq!(geometry.kind, AssetKind::FeatureCollection);
    }

    #[tokio::test]
    async fn test_resolution_fails_without_field_geometry() {
        let backend = LocalBackend::with_published(
            LayerKind::ALL
                .iter()
                .map(|kind| (kind.asset_path(), kind.asset_kind())),
        );
        let err = AssetRegistry::resolve(&backend).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_kind_matches_slug() {
        let backend = LocalBackend::new();
        let registry = AssetRegistry::resolve(&backend).await.unwrap();
        for kind in LayerKind::ALL {
            assert_eq!(registry.get(kind).slug, kind.slug());
        }
    }

    #[tokio::test]
    async fn test_get_by_slug_unknown_is_not_found() {
        let backend = LocalBackend::new();
        let registry = AssetRegistry::resolve(&backend).await.unwrap();
        let err = registry.get_by_slug("no-such-layer").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolution_fails_when_offline() {
        let backend = LocalBackend::new();
        backend.set_offline(true);
        let err = AssetRegistry::resolve(&backend).await.unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable { .. }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_assets_include_field_geometry() {
        let published: Vec<_> = published_assets().collect();
        assert_eq!(published.len(), LayerKind::ALL.len() + 1);
        assert!(published.contains(&(FIELD_GEOMETRY_ASSET, AssetKind::FeatureCollection)));
    }

    #[test]
    fn test_boundary_has_no_legend_and_no_clip() {
        assert!(LayerKind::StudyBoundary.legend().is_empty());
        assert!(!LayerKind::StudyBoundary.clip_to_boundary());
        assert!(LayerKind::RandomForest.clip_to_boundary());
    }

    #[test]
    fn test_classification_legend_has_five_classes() {
        assert_eq!(LayerKind::RandomForest.legend().len(), 5);
        assert_eq!(LayerKind::Svm.legend().len(), 5);
    }

    #[test]
    fn test_display_params_opacity() {
        let params = LayerKind::NdviThreshold.display_params().with_opacity(0.0);
        assert_eq!(params.opacity, 0.0);
        assert_eq!(params.min, Some(0.0));
        assert_eq!(params.max, Some(1.0));
    }
}
