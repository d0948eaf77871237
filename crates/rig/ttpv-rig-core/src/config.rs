//! Stage configuration.
//!
//! Every field has a default, so a host may pass `{}` or only the fields it
//! cares about.

use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// Pointer hit box around a rig's nominal position, independent of pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    /// Left edge relative to the rig position.
    pub offset_x: f32,
    /// Top edge relative to the rig position.
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for HitBox {
    fn default() -> Self {
        Self {
            offset_x: -40.0,
            offset_y: -100.0,
            width: 80.0,
            height: 200.0,
        }
    }
}

/// Margins a dragged rig is clamped into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for DragBounds {
    fn default() -> Self {
        Self {
            left: 50.0,
            right: 50.0,
            top: 100.0,
            bottom: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub view_width: u32,
    pub view_height: u32,
    /// Maximum number of concurrent rigs.
    pub max_rigs: usize,
    /// Target tick rate; hosts use it to size `dt`.
    pub tick_hz: u32,
    pub hit_box: HitBox,
    pub drag_bounds: DragBounds,
    /// Edge length of a freshly loaded head image.
    pub head_size: u32,
    pub body_color: [u8; 4],
    /// Clear colour used when no background image is loaded.
    pub clear_color: [u8; 4],
    pub breathing_period_ms: f32,
    pub emotion_glyph: String,
    pub emotion_duration_ms: f32,
    /// Half-range of the smile shake, in pixels.
    pub smile_jitter: i32,
    /// Seed for the shake generator; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            view_width: 800,
            view_height: 600,
            max_rigs: 4,
            tick_hz: 60,
            hit_box: HitBox::default(),
            drag_bounds: DragBounds::default(),
            head_size: 70,
            body_color: [60, 60, 60, 255],
            clear_color: [255, 255, 255, 255],
            breathing_period_ms: 3000.0,
            emotion_glyph: "\u{1F604}".to_string(),
            emotion_duration_ms: 2000.0,
            smile_jitter: 2,
            rng_seed: None,
        }
    }
}

impl StageConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        let cfg: StageConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), RigError> {
        let fail = |reason: &str| {
            Err(RigError::Config {
                reason: reason.to_string(),
            })
        };
        if self.view_width == 0 || self.view_height == 0 {
            return fail("view size must be non-zero");
        }
        if self.max_rigs == 0 {
            return fail("max_rigs must be at least 1");
        }
        if self.tick_hz == 0 {
            return fail("tick_hz must be non-zero");
        }
        if self.head_size == 0 {
            return fail("head_size must be non-zero");
        }
        if !(self.breathing_period_ms > 0.0) {
            return fail("breathing_period_ms must be positive");
        }
        if !(self.emotion_duration_ms >= 0.0) {
            return fail("emotion_duration_ms must not be negative");
        }
        if self.smile_jitter < 0 {
            return fail("smile_jitter must not be negative");
        }
        Ok(())
    }

    /// Nominal tick length in milliseconds.
    #[inline]
    pub fn tick_ms(&self) -> f32 {
        1000.0 / self.tick_hz as f32
    }

    /// Where new rigs are placed.
    #[inline]
    pub fn spawn_point(&self) -> glam::Vec2 {
        glam::Vec2::new(self.view_width as f32 / 2.0, self.view_height as f32 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_constants() {
        let cfg = StageConfig::default();
        assert_eq!((cfg.view_width, cfg.view_height), (800, 600));
        assert_eq!(cfg.max_rigs, 4);
        assert_eq!(cfg.spawn_point(), glam::Vec2::new(400.0, 300.0));
        assert!((cfg.tick_ms() - 1000.0 / 60.0).abs() < 1e-4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = StageConfig::from_json(r#"{ "view_width": 1280, "rng_seed": 7 }"#).unwrap();
        assert_eq!(cfg.view_width, 1280);
        assert_eq!(cfg.view_height, 600);
        assert_eq!(cfg.rng_seed, Some(7));
        assert_eq!(cfg.hit_box, HitBox::default());
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = StageConfig::from_json(r#"{ "max_rigs": 0 }"#).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(StageConfig::from_json("{ view_width: }").is_err());
    }
}
