use crate::AreaBoard;
use crate::{error, interop};
use areas::model::AreaProperties;
use areas::quad::extract_quad;
use areas::throttle::LiveThrottle;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
impl AreaBoard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> AreaBoard {
        AreaBoard::rs_new(LiveThrottle::DEFAULT_WINDOW_MS)
    }

    pub fn with_throttle_window(window_ms: f64) -> AreaBoard {
        AreaBoard::rs_new(window_ms)
    }

    pub fn throttle_window_ms(&self) -> f64 {
        self.throttle.window_ms()
    }

    pub fn feature_count(&self) -> u32 {
        self.inner.len() as u32
    }

    pub fn included_count(&self) -> u32 {
        self.inner.included_count() as u32
    }

    // Toolkit event stream. Each entry point takes the event's `features`
    // array. Commit-class events flush any deferred drag tick first.

    pub fn on_create(&mut self, features: JsValue) -> bool {
        let batch = interop::decode_event_features(&features);
        let flushed = self.apply_pending();
        let fx = self.inner.create_features(batch);
        interop::revoke_object_urls(&fx.released);
        flushed || fx.changed
    }

    /// Finalized geometry update (mouse-up), applied synchronously.
    pub fn on_update(&mut self, features: JsValue) -> bool {
        let batch = interop::decode_event_features(&features);
        let flushed = self.apply_pending();
        let changed = self.apply_batch(batch);
        flushed || changed
    }

    pub fn on_delete(&mut self, features: JsValue) -> bool {
        let ids = interop::decode_event_ids(&features);
        let flushed = self.apply_pending();
        let fx = self.inner.delete_features(&ids);
        interop::revoke_object_urls(&fx.released);
        flushed || fx.changed
    }

    pub fn on_selection_change(&mut self, features: JsValue) -> bool {
        let ids = interop::decode_event_ids(&features);
        let flushed = self.apply_pending();
        let before = self.inner.selected().cloned();
        self.inner.set_selection(&ids);
        flushed || self.inner.selected() != before.as_ref()
    }

    /// Drag-in-progress geometry, fired by the host's decorated drag
    /// handlers once per tick. Routed through the throttle; returns whether
    /// anything was applied right now.
    pub fn on_live_update(&mut self, features: JsValue, now_ms: f64) -> bool {
        let batch = interop::decode_event_features(&features);
        if batch.is_empty() {
            return false;
        }
        match self.throttle.offer(now_ms, batch) {
            Some(due) => self.apply_batch(due),
            None => false,
        }
    }

    /// Trailing-edge pump; the host calls this from its frame loop so the
    /// final tick of a drag lands once the throttle window elapses.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.throttle.poll(now_ms) {
            Some(due) => self.apply_batch(due),
            None => false,
        }
    }

    pub fn has_pending_live_update(&self) -> bool {
        self.throttle.has_pending()
    }

    // Derived render state and metadata reads.

    pub fn overlays(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.overlays()).unwrap()
    }

    pub fn ids(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.ids()).unwrap()
    }

    pub fn selected_id(&self) -> JsValue {
        match self.inner.selected() {
            Some(id) => serde_wasm_bindgen::to_value(id).unwrap(),
            None => JsValue::NULL,
        }
    }

    pub fn properties(&self, id: JsValue) -> JsValue {
        let Some(id) = interop::decode_id(&id) else {
            return JsValue::NULL;
        };
        match self.inner.properties(&id) {
            Some(props) => serde_wasm_bindgen::to_value(props).unwrap(),
            None => JsValue::NULL,
        }
    }

    /// Whether the properties panel may offer the background-image control
    /// for this feature.
    pub fn supports_background_image(&self, id: JsValue) -> bool {
        let Some(id) = interop::decode_id(&id) else {
            return false;
        };
        self.inner
            .geometry(&id)
            .is_some_and(|g| extract_quad(g).is_some())
    }

    // Metadata writes from the properties panel.

    pub fn update_properties(&mut self, id: JsValue, props: JsValue) -> bool {
        let Some(id) = interop::decode_id(&id) else {
            return false;
        };
        let Ok(props) = serde_wasm_bindgen::from_value::<AreaProperties>(props) else {
            return false;
        };
        self.inner.update_properties(&id, props)
    }

    pub fn set_name(&mut self, id: JsValue, name: String) -> bool {
        let Some(id) = interop::decode_id(&id) else {
            return false;
        };
        self.inner.set_name(&id, name)
    }

    pub fn set_include_in_geojson(&mut self, id: JsValue, include: bool) -> bool {
        let Some(id) = interop::decode_id(&id) else {
            return false;
        };
        self.inner.set_include_in_geojson(&id, include)
    }

    pub fn set_image_opacity(&mut self, id: JsValue, opacity: f64) -> bool {
        let Some(id) = interop::decode_id(&id) else {
            return false;
        };
        self.inner.set_image_opacity(&id, opacity)
    }

    pub fn set_image_opacity_res(&mut self, id: JsValue, opacity: f64) -> JsValue {
        if !opacity.is_finite() {
            return error::non_finite("opacity");
        }
        if !(0.0..=1.0).contains(&opacity) {
            return error::out_of_range("opacity", 0.0, 1.0, opacity);
        }
        let Some(id) = interop::decode_id(&id) else {
            return error::undecodable_id();
        };
        if !self.inner.contains(&id) {
            return error::invalid_id(&id.to_string());
        }
        error::ok(JsValue::from_bool(self.inner.set_image_opacity(&id, opacity)))
    }

    /// Binds a freshly created object URL to a feature, releasing any image
    /// it previously carried. Refused while the geometry is not a quad.
    pub fn attach_image(&mut self, id: JsValue, url: String) -> bool {
        let Some(id) = interop::decode_id(&id) else {
            return false;
        };
        let fx = self.inner.set_fill_image(&id, Some(url));
        interop::revoke_object_urls(&fx.released);
        fx.changed
    }

    pub fn attach_image_res(&mut self, id: JsValue, url: String) -> JsValue {
        let Some(id) = interop::decode_id(&id) else {
            return error::undecodable_id();
        };
        let Some(geometry) = self.inner.geometry(&id) else {
            return error::invalid_id(&id.to_string());
        };
        if extract_quad(geometry).is_none() {
            return error::not_a_quad(&id.to_string());
        }
        let fx = self.inner.set_fill_image(&id, Some(url));
        interop::revoke_object_urls(&fx.released);
        error::ok(JsValue::from_bool(fx.changed))
    }

    pub fn clear_image(&mut self, id: JsValue) -> bool {
        let Some(id) = interop::decode_id(&id) else {
            return false;
        };
        let fx = self.inner.set_fill_image(&id, None);
        interop::revoke_object_urls(&fx.released);
        fx.changed
    }

    // Export / import.

    pub fn export_enabled(&self) -> bool {
        self.inner.included_count() > 0
    }

    pub fn export_geojson(&self) -> String {
        self.inner.export_json()
    }

    pub fn export_filename() -> String {
        areas::EXPORT_FILENAME.to_string()
    }

    /// Merges a feature-collection document into the store. Returns the
    /// accepted features as a GeoJSON array for the host to push into the
    /// drawing toolkit, or `null` when the document is not a feature
    /// collection (the import then did nothing).
    pub fn import_geojson(&mut self, text: &str) -> JsValue {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(text) else {
            return JsValue::NULL;
        };
        match self.inner.import_value(v) {
            Some(outcome) => {
                if outcome.skipped > 0 {
                    interop::warn(&format!(
                        "import: skipped {} invalid feature(s)",
                        outcome.skipped
                    ));
                }
                serde_wasm_bindgen::to_value(&areas::features_to_value(&outcome.features)).unwrap()
            }
            None => JsValue::NULL,
        }
    }

    pub fn import_geojson_res(&mut self, text: &str) -> JsValue {
        let v = match serde_json::from_str::<serde_json::Value>(text) {
            Ok(v) => v,
            Err(e) => return error::bad_json(&e.to_string()),
        };
        match self.inner.import_value_strict(v) {
            Ok(outcome) => {
                if outcome.skipped > 0 {
                    interop::warn(&format!(
                        "import: skipped {} invalid feature(s)",
                        outcome.skipped
                    ));
                }
                error::ok(
                    serde_wasm_bindgen::to_value(&areas::features_to_value(&outcome.features))
                        .unwrap(),
                )
            }
            Err((code, message)) => error::err(code, message, None),
        }
    }
}
