use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A lng/lat pair, serialized as a bare two-element array (GeoJSON position).
pub type Position = [f64; 2];

/// Identity assigned by the drawing toolkit. Opaque to this crate: ids may be
/// strings or JSON numbers and two ids are equal only on exact match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Text(String),
    Number(Number),
}

impl FeatureId {
    pub fn text(s: impl Into<String>) -> FeatureId {
        FeatureId::Text(s.into())
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Text(s) => f.write_str(s),
            FeatureId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Raw geometry as the toolkit hands it over. Ring counts and ring lengths
/// are deliberately unconstrained; "quad" is a derived classification
/// (see [`crate::quad::extract_quad`]), not a type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    /// Any foreign geometry type. Parses without failing the surrounding
    /// document; dropped at the import/event boundary.
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    pub fn polygon(rings: Vec<Vec<Position>>) -> Geometry {
        Geometry::Polygon { coordinates: rings }
    }
}

/// One drawn or imported region: toolkit identity plus current geometry.
/// Geometry is only ever replaced wholesale; the toolkit owns vertex editing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Geometry) -> Feature {
        Feature { id, geometry }
    }
}

/// Metadata attached to a feature identity. Field names follow the host's
/// property bag on the wire (`includeInGeoJSON`, `fillImageUrl`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaProperties {
    pub name: String,
    #[serde(rename = "includeInGeoJSON")]
    pub include_in_geojson: bool,
    pub fill_image_url: Option<String>,
    pub image_opacity: f64,
}

impl AreaProperties {
    pub const DEFAULT_IMAGE_OPACITY: f64 = 0.5;

    pub fn named(name: String) -> AreaProperties {
        AreaProperties {
            name,
            include_in_geojson: true,
            fill_image_url: None,
            image_opacity: Self::DEFAULT_IMAGE_OPACITY,
        }
    }
}
