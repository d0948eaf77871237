//! Drawing target abstraction and a recording implementation.

use glam::Vec2;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// What the renderer needs from a drawing target.
///
/// Coordinates are view pixels, y down. Angles are degrees, positive
/// clockwise on screen.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: [u8; 4]);

    /// Unrotated blit with its top-left corner at `top_left`.
    fn draw_image(&mut self, image: &RgbaImage, top_left: Vec2);

    /// Fill a convex quad given by its four corners in order.
    fn fill_quad(&mut self, corners: [Vec2; 4], color: [u8; 4]);

    /// Blit `image` rotated by `angle` about its centre, centred on `center`.
    fn draw_image_rotated(&mut self, image: &RgbaImage, center: Vec2, angle: f32);

    /// Text whose bottom-centre sits at `anchor`.
    fn draw_glyph(&mut self, text: &str, anchor: Vec2);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: [u8; 4],
    },
    Image {
        width: u32,
        height: u32,
        top_left: Vec2,
    },
    Quad {
        corners: [Vec2; 4],
        color: [u8; 4],
    },
    RotatedImage {
        width: u32,
        height: u32,
        center: Vec2,
        angle: f32,
    },
    Glyph {
        text: String,
        anchor: Vec2,
    },
}

/// A surface that records commands instead of producing pixels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn quads(&self) -> impl Iterator<Item = &[Vec2; 4]> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Quad { corners, .. } => Some(corners),
            _ => None,
        })
    }

    pub fn glyphs(&self) -> impl Iterator<Item = (&str, Vec2)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Glyph { text, anchor } => Some((text.as_str(), *anchor)),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Clearing also drops everything recorded so far.
    fn clear(&mut self, color: [u8; 4]) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { color });
    }

    fn draw_image(&mut self, image: &RgbaImage, top_left: Vec2) {
        self.commands.push(DrawCommand::Image {
            width: image.width(),
            height: image.height(),
            top_left,
        });
    }

    fn fill_quad(&mut self, corners: [Vec2; 4], color: [u8; 4]) {
        self.commands.push(DrawCommand::Quad { corners, color });
    }

    fn draw_image_rotated(&mut self, image: &RgbaImage, center: Vec2, angle: f32) {
        self.commands.push(DrawCommand::RotatedImage {
            width: image.width(),
            height: image.height(),
            center,
            angle,
        });
    }

    fn draw_glyph(&mut self, text: &str, anchor: Vec2) {
        self.commands.push(DrawCommand::Glyph {
            text: text.to_string(),
            anchor,
        });
    }
}
