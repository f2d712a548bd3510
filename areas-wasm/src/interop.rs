use areas::model::{Feature, FeatureId};
use wasm_bindgen::JsValue;

/// Releases host-side image resources. `revokeObjectURL` on anything that
/// is not a live object URL is a no-op, so this never fails loudly.
pub fn revoke_object_urls(urls: &[String]) {
    for url in urls {
        let _ = web_sys::Url::revoke_object_url(url);
    }
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

pub fn decode_id(v: &JsValue) -> Option<FeatureId> {
    serde_wasm_bindgen::from_value(v.clone()).ok()
}

/// Decodes a toolkit event's `features` array; anything undecodable
/// degrades to an empty batch rather than an error.
pub fn decode_event_features(v: &JsValue) -> Vec<Feature> {
    serde_wasm_bindgen::from_value::<serde_json::Value>(v.clone())
        .map(|v| areas::parse_event_features(&v))
        .unwrap_or_default()
}

pub fn decode_event_ids(v: &JsValue) -> Vec<FeatureId> {
    serde_wasm_bindgen::from_value::<serde_json::Value>(v.clone())
        .map(|v| areas::parse_event_ids(&v))
        .unwrap_or_default()
}
