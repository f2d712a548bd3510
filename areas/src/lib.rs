pub mod model;
pub mod project;
pub mod quad;
pub mod throttle;
mod geojson;

pub use geojson::{
    features_to_value, parse_event_features, parse_event_ids, ImportOutcome, EXPORT_FILENAME,
};
pub use project::{overlay_instructions, OverlayInstruction};

use model::{AreaProperties, Feature, FeatureId, Geometry};
use quad::extract_quad;

/// What a mutation did, beyond the store's own state: whether anything
/// observable changed, and which image handles the caller must now revoke.
///
/// Image urls point at host-side resources (`URL.createObjectURL` blobs),
/// so the actual release has to happen at the boundary; the store reports
/// each handle exactly once, at the moment its binding goes away.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreEffects {
    pub changed: bool,
    pub released: Vec<String>,
}

struct AreaEntry {
    id: FeatureId,
    geometry: Geometry,
    props: AreaProperties,
}

/// The authoritative feature/property map.
///
/// Geometry and metadata live in one entry per identity, so the two can
/// never drift apart; insertion order is preserved for the overlay
/// projector and the export bridge. All mutation entry points silently
/// no-op on unknown identities: deletes and updates can race during rapid
/// toolkit edits, and an update must never resurrect a deleted feature.
#[derive(Default)]
pub struct AreaStore {
    entries: Vec<AreaEntry>,
    selected: Option<FeatureId>,
}

impl AreaStore {
    pub fn new() -> AreaStore {
        AreaStore::default()
    }

    fn entry_mut(&mut self, id: &FeatureId) -> Option<&mut AreaEntry> {
        self.entries.iter_mut().find(|e| e.id == *id)
    }

    fn entry(&self, id: &FeatureId) -> Option<&AreaEntry> {
        self.entries.iter().find(|e| e.id == *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<FeatureId> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.entry(id).is_some()
    }

    pub fn geometry(&self, id: &FeatureId) -> Option<&Geometry> {
        self.entry(id).map(|e| &e.geometry)
    }

    pub fn properties(&self, id: &FeatureId) -> Option<&AreaProperties> {
        self.entry(id).map(|e| &e.props)
    }

    pub fn selected(&self) -> Option<&FeatureId> {
        self.selected.as_ref()
    }

    pub fn included_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.props.include_in_geojson)
            .count()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FeatureId, &Geometry, &AreaProperties)> {
        self.entries.iter().map(|e| (&e.id, &e.geometry, &e.props))
    }

    /// Replaces geometry per incoming identity. Runs on every update, the
    /// committed mouse-up kind and the throttled drag-tick kind alike.
    ///
    /// When a replacement stops classifying as a quad, any bound image is
    /// unbound here and the handle reported for release; an image may only
    /// stay attached while its geometry still has four corners.
    pub fn apply_geometry_update(&mut self, features: Vec<Feature>) -> StoreEffects {
        let mut fx = StoreEffects::default();
        for f in features {
            let Some(entry) = self.entry_mut(&f.id) else {
                continue;
            };
            entry.geometry = f.geometry;
            fx.changed = true;
            if entry.props.fill_image_url.is_some() && extract_quad(&entry.geometry).is_none() {
                fx.released.extend(entry.props.fill_image_url.take());
            }
        }
        fx
    }

    /// Records freshly drawn features with default properties.
    ///
    /// Names count up from the current property count at the start of the
    /// batch; after deletions the counter restarts lower, so names can
    /// repeat. Long-standing behavior the export format never depended on.
    pub fn create_features(&mut self, features: Vec<Feature>) -> StoreEffects {
        self.create_named(features.into_iter().map(|f| (f, None)).collect())
    }

    /// The import-side create: an input-supplied name wins over the
    /// generated `Area <n>`, and images always start unbound.
    pub fn import_features(&mut self, features: Vec<(Feature, Option<String>)>) -> StoreEffects {
        self.create_named(features)
    }

    fn create_named(&mut self, features: Vec<(Feature, Option<String>)>) -> StoreEffects {
        let mut fx = StoreEffects::default();
        let mut counter = self.entries.len() + 1;
        for (f, name) in features {
            let name = name.unwrap_or_else(|| format!("Area {counter}"));
            counter += 1;
            let props = AreaProperties::named(name);
            match self.entry_mut(&f.id) {
                Some(entry) => {
                    entry.geometry = f.geometry;
                    entry.props = props;
                }
                None => self.entries.push(AreaEntry {
                    id: f.id,
                    geometry: f.geometry,
                    props,
                }),
            }
            fx.changed = true;
        }
        fx
    }

    /// Removes geometry and properties together. Bound images are reported
    /// for release, and a removed feature that was selected clears the
    /// selection.
    pub fn delete_features(&mut self, ids: &[FeatureId]) -> StoreEffects {
        let mut fx = StoreEffects::default();
        self.entries.retain(|e| {
            if ids.contains(&e.id) {
                fx.changed = true;
                if let Some(url) = &e.props.fill_image_url {
                    fx.released.push(url.clone());
                }
                false
            } else {
                true
            }
        });
        if let Some(sel) = &self.selected {
            if ids.contains(sel) {
                self.selected = None;
            }
        }
        fx
    }

    /// Wholesale metadata replace, used by the properties panel. Never
    /// touches geometry and never releases image handles; image changes go
    /// through [`AreaStore::set_fill_image`].
    pub fn update_properties(&mut self, id: &FeatureId, props: AreaProperties) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.props = props;
                true
            }
            None => false,
        }
    }

    /// Attaches, replaces, or clears a feature's image binding. A replaced
    /// or cleared handle is reported exactly once; attaching is refused
    /// while the geometry is not a quad.
    pub fn set_fill_image(&mut self, id: &FeatureId, url: Option<String>) -> StoreEffects {
        let mut fx = StoreEffects::default();
        let Some(entry) = self.entry_mut(id) else {
            return fx;
        };
        if url.is_some() && extract_quad(&entry.geometry).is_none() {
            return fx;
        }
        if entry.props.fill_image_url == url {
            return fx;
        }
        if let Some(old) = entry.props.fill_image_url.take() {
            fx.released.push(old);
        }
        entry.props.fill_image_url = url;
        fx.changed = true;
        fx
    }

    pub fn set_name(&mut self, id: &FeatureId, name: String) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.props.name = name;
                true
            }
            None => false,
        }
    }

    pub fn set_include_in_geojson(&mut self, id: &FeatureId, include: bool) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.props.include_in_geojson = include;
                true
            }
            None => false,
        }
    }

    /// Clamped to [0, 1]; the strict boundary variant rejects out-of-range
    /// values instead. Non-finite input is dropped.
    pub fn set_image_opacity(&mut self, id: &FeatureId, opacity: f64) -> bool {
        if !opacity.is_finite() {
            return false;
        }
        match self.entry_mut(id) {
            Some(entry) => {
                entry.props.image_opacity = opacity.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Exactly one id selects it; zero or several clear the selection.
    /// Selection is UI focus only: it survives neither deletion of the
    /// selected feature nor export.
    pub fn set_selection(&mut self, ids: &[FeatureId]) {
        self.selected = match ids {
            [only] => Some(only.clone()),
            _ => None,
        };
    }

    /// Current overlay draw set, in insertion order.
    pub fn overlays(&self) -> Vec<OverlayInstruction> {
        project::overlay_instructions(self)
    }

    pub fn export_value(&self) -> serde_json::Value {
        geojson::export_value(self)
    }

    pub fn export_json(&self) -> String {
        geojson::export_value(self).to_string()
    }

    /// Merges a feature collection into the store. `None` means the
    /// document was not a feature collection and nothing happened.
    pub fn import_value(&mut self, v: serde_json::Value) -> Option<ImportOutcome> {
        geojson::import_impl(self, v).ok()
    }

    pub fn import_value_strict(
        &mut self,
        v: serde_json::Value,
    ) -> Result<ImportOutcome, (&'static str, String)> {
        geojson::import_impl(self, v)
    }

    pub fn import_json(&mut self, text: &str) -> Option<ImportOutcome> {
        let v = serde_json::from_str(text).ok()?;
        self.import_value(v)
    }
}
