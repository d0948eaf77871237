//! Scene compositor.
//!
//! Per rig, parts are painted in `PartName::DRAW_ORDER`; rigs are painted in
//! scene order, so later rigs cover earlier ones.

mod framebuffer;
mod surface;

pub use framebuffer::{FrameBuffer, GlyphLabel};
pub use surface::{DisplayList, DrawCommand, Surface};

use glam::Vec2;

use crate::config::StageConfig;
use crate::part::PartName;
use crate::pose::resolve;
use crate::rig::Rig;
use crate::scene::Scene;

/// Emotion glyphs sit this far above the rig position.
const GLYPH_LIFT: f32 = 100.0;

#[derive(Clone, Debug)]
pub struct Renderer {
    clear_color: [u8; 4],
}

impl Renderer {
    pub fn new(cfg: &StageConfig) -> Self {
        Self {
            clear_color: cfg.clear_color,
        }
    }

    /// Paint the scene without touching any state.
    pub fn draw<S: Surface + ?Sized>(&self, scene: &Scene, surface: &mut S) {
        surface.clear(self.clear_color);
        if let Some(bg) = scene.background() {
            surface.draw_image(bg, Vec2::ZERO);
        }
        for rig in scene.rigs() {
            self.draw_rig(rig, surface);
        }
    }

    fn draw_rig<S: Surface + ?Sized>(&self, rig: &Rig, surface: &mut S) {
        for part in resolve(rig) {
            if part.name == PartName::Head {
                // No image means nothing to draw for the head slot.
                if let Some(head) = rig.head_image() {
                    surface.draw_image_rotated(head, part.center(), part.angle);
                }
            } else {
                surface.fill_quad(part.corners(), rig.body_color);
            }
        }
        if let Some(overlay) = rig.emotion() {
            surface.draw_glyph(&overlay.glyph, rig.position() - Vec2::new(0.0, GLYPH_LIFT));
        }
    }

    /// Paint, then count overlays down by the tick length.
    pub fn render<S: Surface + ?Sized>(&self, scene: &mut Scene, surface: &mut S, dt_ms: f32) {
        self.draw(scene, surface);
        scene.expire_overlays(dt_ms);
    }
}
