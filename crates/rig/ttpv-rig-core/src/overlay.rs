//! Transient emotion glyph drawn above a rig.

use serde::{Deserialize, Serialize};

/// Counts down on its own clock; may outlive the animation that set it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionOverlay {
    pub glyph: String,
    pub remaining_ms: f32,
}

impl EmotionOverlay {
    pub fn new(glyph: impl Into<String>, duration_ms: f32) -> Self {
        Self {
            glyph: glyph.into(),
            remaining_ms: duration_ms,
        }
    }

    /// Consume `dt_ms`; returns false once the overlay has expired.
    #[inline]
    pub fn elapse(&mut self, dt_ms: f32) -> bool {
        self.remaining_ms -= dt_ms;
        self.remaining_ms > 0.0
    }
}
