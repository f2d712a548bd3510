use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

use areas::model::Feature;
use areas::throttle::LiveThrottle;

/// The store plus its live-update throttle, owned as one unit behind the
/// wasm boundary. The JS host forwards every drawing-toolkit event here.
#[wasm_bindgen]
pub struct AreaBoard {
    pub(crate) inner: areas::AreaStore,
    pub(crate) throttle: LiveThrottle,
}

impl AreaBoard {
    pub fn rs_new(window_ms: f64) -> AreaBoard {
        AreaBoard {
            inner: areas::AreaStore::new(),
            throttle: LiveThrottle::new(window_ms),
        }
    }

    /// Applies a geometry batch and revokes whatever image handles the
    /// store unbound along the way.
    pub(crate) fn apply_batch(&mut self, batch: Vec<Feature>) -> bool {
        let fx = self.inner.apply_geometry_update(batch);
        interop::revoke_object_urls(&fx.released);
        fx.changed
    }

    /// Flushes a deferred live update into the store. Every commit-class
    /// event goes through here first: stale drag state must never be
    /// applied after the commit it precedes.
    pub(crate) fn apply_pending(&mut self) -> bool {
        match self.throttle.flush() {
            Some(batch) => self.apply_batch(batch),
            None => false,
        }
    }
}
