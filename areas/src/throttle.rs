use crate::model::Feature;

/// Rate limiter for the toolkit's drag-in-progress geometry stream.
///
/// Leading+trailing coalescing over caller-supplied timestamps: the first
/// call of a burst passes straight through, later calls inside the window
/// replace the pending payload, and the pending payload surfaces either on
/// [`LiveThrottle::poll`] once the window has elapsed or on
/// [`LiveThrottle::flush`] when a commit-class event must not run ahead of
/// stale drag state. The latest payload always survives; only intermediate
/// ones are dropped.
///
/// Timestamps are explicit so the throttle has no clock of its own: the
/// browser host feeds it `performance.now()` and tests feed it whatever
/// they like.
#[derive(Debug)]
pub struct LiveThrottle {
    window_ms: f64,
    last_fired_at: Option<f64>,
    pending: Option<Vec<Feature>>,
}

impl LiveThrottle {
    /// Matches the window the interactive tool ships with; dragging stays
    /// smooth while image-backed layers re-render at most ~5x per second.
    pub const DEFAULT_WINDOW_MS: f64 = 200.0;

    pub fn new(window_ms: f64) -> LiveThrottle {
        LiveThrottle {
            window_ms: if window_ms.is_finite() && window_ms > 0.0 {
                window_ms
            } else {
                Self::DEFAULT_WINDOW_MS
            },
            last_fired_at: None,
            pending: None,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Offers a live-update payload. Returns it back when it should be
    /// applied immediately (leading edge), otherwise retains it as the
    /// pending trailing payload, replacing any earlier one.
    pub fn offer(&mut self, now_ms: f64, features: Vec<Feature>) -> Option<Vec<Feature>> {
        match self.last_fired_at {
            Some(fired) if now_ms - fired < self.window_ms => {
                self.pending = Some(features);
                None
            }
            _ => {
                self.last_fired_at = Some(now_ms);
                Some(features)
            }
        }
    }

    /// Surfaces the pending payload once the window has elapsed. The host
    /// calls this from its frame loop so a drag's trailing state lands even
    /// when the burst just stops.
    pub fn poll(&mut self, now_ms: f64) -> Option<Vec<Feature>> {
        if self.pending.is_none() {
            return None;
        }
        match self.last_fired_at {
            Some(fired) if now_ms - fired < self.window_ms => None,
            _ => {
                self.last_fired_at = Some(now_ms);
                self.pending.take()
            }
        }
    }

    /// Unconditionally surrenders the pending payload. Commit-class events
    /// (create, finalize-update, delete, selection change) flush first so a
    /// deferred drag tick can never be applied after the state it describes
    /// is gone.
    pub fn flush(&mut self) -> Option<Vec<Feature>> {
        self.pending.take()
    }
}

impl Default for LiveThrottle {
    fn default() -> LiveThrottle {
        LiveThrottle::new(Self::DEFAULT_WINDOW_MS)
    }
}
