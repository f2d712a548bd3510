use serde::Serialize;

use crate::model::{FeatureId, Position};
use crate::quad::extract_quad;
use crate::AreaStore;

/// One image-overlay draw instruction for the map renderer: drape
/// `image_url` over the four corners at the given opacity, keyed by the
/// owning feature so the renderer can replace or remove it later.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayInstruction {
    pub id: FeatureId,
    pub corners: [Position; 4],
    pub image_url: String,
    pub opacity: f64,
}

/// Derives the full overlay set from the store. Pure and recomputed from
/// scratch on every call; output follows store insertion order.
///
/// An image bound to a geometry that no longer classifies as a quad is
/// skipped rather than treated as an error: the store clears such bindings
/// reactively, but the projector tolerates the transient.
pub fn overlay_instructions(store: &AreaStore) -> Vec<OverlayInstruction> {
    let mut out = Vec::new();
    for (id, geometry, props) in store.iter() {
        let Some(url) = &props.fill_image_url else {
            continue;
        };
        let Some(corners) = extract_quad(geometry) else {
            continue;
        };
        out.push(OverlayInstruction {
            id: id.clone(),
            corners,
            image_url: url.clone(),
            opacity: props.image_opacity,
        });
    }
    out
}
