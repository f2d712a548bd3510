//! GeoJSON bridge: export of the included features, decoding of toolkit
//! event payloads, and the permissive file import.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Feature, FeatureId, Geometry};
use crate::AreaStore;

/// Base name of the download artifact.
pub const EXPORT_FILENAME: &str = "areas.geojson";

/// What an import did: the accepted features, for the host to push into the
/// drawing toolkit, and how many input entries failed the per-feature
/// requirements and were skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportOutcome {
    pub features: Vec<Feature>,
    pub skipped: usize,
}

#[derive(Deserialize)]
struct FeatureDe {
    id: Option<FeatureId>,
    geometry: Option<Geometry>,
    // Kept as a raw value: a null, missing, or non-object bag simply means
    // "no name", never a malformed feature.
    properties: Option<Value>,
}

pub(crate) fn export_value(store: &AreaStore) -> Value {
    #[derive(Serialize)]
    struct PropertiesSer<'a> {
        name: &'a str,
    }
    #[derive(Serialize)]
    struct FeatureSer<'a> {
        #[serde(rename = "type")]
        kind: &'static str,
        id: &'a FeatureId,
        geometry: &'a Geometry,
        properties: PropertiesSer<'a>,
    }
    #[derive(Serialize)]
    struct CollectionSer<'a> {
        #[serde(rename = "type")]
        kind: &'static str,
        features: Vec<FeatureSer<'a>>,
    }

    let features = store
        .iter()
        .filter(|(_, _, props)| props.include_in_geojson)
        .map(|(id, geometry, props)| FeatureSer {
            kind: "Feature",
            id,
            geometry,
            properties: PropertiesSer { name: &props.name },
        })
        .collect();
    serde_json::to_value(CollectionSer {
        kind: "FeatureCollection",
        features,
    })
    .unwrap()
}

/// Decodes a toolkit event's `features` array. Entries without an id or a
/// polygon geometry are dropped; whatever properties the toolkit attached
/// are stripped.
pub fn parse_event_features(v: &Value) -> Vec<Feature> {
    let Some(list) = v.as_array() else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|item| {
            let de: FeatureDe = serde_json::from_value(item.clone()).ok()?;
            match (de.id, de.geometry) {
                (Some(id), Some(geometry @ Geometry::Polygon { .. })) => {
                    Some(Feature { id, geometry })
                }
                _ => None,
            }
        })
        .collect()
}

/// Decodes only the identities from a toolkit event's `features` array.
/// Delete and selection events need nothing else, and an id must survive
/// even when the rest of the feature does not decode.
pub fn parse_event_ids(v: &Value) -> Vec<FeatureId> {
    let Some(list) = v.as_array() else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|item| item.get("id"))
        .filter_map(|id| serde_json::from_value(id.clone()).ok())
        .collect()
}

/// GeoJSON rendition of a feature batch, shaped for the toolkit's imperative
/// "add geometry" call (import pushes accepted features back into the
/// toolkit so they become editable).
pub fn features_to_value(features: &[Feature]) -> Value {
    Value::Array(
        features
            .iter()
            .map(|f| {
                serde_json::json!({
                    "type": "Feature",
                    "id": f.id,
                    "geometry": f.geometry,
                    "properties": {},
                })
            })
            .collect(),
    )
}

fn feature_name(de: &FeatureDe) -> Option<String> {
    de.properties
        .as_ref()
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

pub(crate) fn import_impl(
    store: &mut AreaStore,
    v: Value,
) -> Result<ImportOutcome, (&'static str, String)> {
    let Some(obj) = v.as_object() else {
        return Err((
            "not_feature_collection",
            "document is not a JSON object".to_string(),
        ));
    };
    let tag = obj.get("type").and_then(Value::as_str);
    if tag != Some("FeatureCollection") {
        return Err((
            "not_feature_collection",
            format!("expected type \"FeatureCollection\", got {tag:?}"),
        ));
    }
    let Some(list) = obj.get("features").and_then(Value::as_array) else {
        return Err((
            "bad_features",
            "\"features\" is missing or not an array".to_string(),
        ));
    };

    let mut batch = Vec::new();
    let mut skipped = 0usize;
    for item in list {
        let Ok(de) = serde_json::from_value::<FeatureDe>(item.clone()) else {
            skipped += 1;
            continue;
        };
        let name = feature_name(&de);
        // A feature needs an identity and a polygon geometry; images are
        // never restored from a file, only attached afterwards by the user.
        let (Some(id), Some(geometry @ Geometry::Polygon { .. })) = (de.id, de.geometry) else {
            skipped += 1;
            continue;
        };
        batch.push((Feature { id, geometry }, name));
    }

    let features: Vec<Feature> = batch.iter().map(|(f, _)| f.clone()).collect();
    store.import_features(batch);
    Ok(ImportOutcome { features, skipped })
}
