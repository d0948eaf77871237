//! Raster surface backed by a `tiny_skia::Pixmap`.
//!
//! The pixmap holds premultiplied RGBA; everything read back through
//! `pixel` and `to_rgba8` is demultiplied. Text is not rasterised: glyphs
//! are recorded as labels for the host to composite on top.

use glam::Vec2;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tiny_skia::{
    Color, ColorU8, FillRule, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};

use super::surface::Surface;
use crate::error::RigError;

/// Text the host should draw over the frame, bottom-centre at `anchor`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphLabel {
    pub text: String,
    pub anchor: Vec2,
}

#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pixmap: Pixmap,
    labels: Vec<GlyphLabel>,
}

/// Premultiply straight-alpha pixels into a pixmap. `None` for empty images.
fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let data = image
        .pixels()
        .flat_map(|p| {
            let c = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Result<Self, RigError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| RigError::Config {
            reason: format!("cannot allocate a {width}x{height} frame"),
        })?;
        Ok(Self {
            pixmap,
            labels: Vec::new(),
        })
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    pub fn labels(&self) -> &[GlyphLabel] {
        &self.labels
    }
}

impl Surface for FrameBuffer {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self, color: [u8; 4]) {
        let [r, g, b, a] = color;
        self.pixmap.fill(Color::from_rgba8(r, g, b, a));
        self.labels.clear();
    }

    fn draw_image(&mut self, image: &RgbaImage, top_left: Vec2) {
        let Some(src) = to_pixmap(image) else {
            return;
        };
        self.pixmap.draw_pixmap(
            top_left.x.round() as i32,
            top_left.y.round() as i32,
            src.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn fill_quad(&mut self, corners: [Vec2; 4], color: [u8; 4]) {
        let mut pb = PathBuilder::new();
        pb.move_to(corners[0].x, corners[0].y);
        for c in &corners[1..] {
            pb.line_to(c.x, c.y);
        }
        pb.close();
        // Degenerate quads produce no path.
        let Some(path) = pb.finish() else {
            return;
        };
        let [r, g, b, a] = color;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn draw_image_rotated(&mut self, image: &RgbaImage, center: Vec2, angle: f32) {
        let Some(src) = to_pixmap(image) else {
            return;
        };
        let xform = Transform::from_translate(center.x, center.y)
            .pre_rotate(angle)
            .pre_translate(-(src.width() as f32) / 2.0, -(src.height() as f32) / 2.0);
        self.pixmap
            .draw_pixmap(0, 0, src.as_ref(), &PixmapPaint::default(), xform, None);
    }

    fn draw_glyph(&mut self, text: &str, anchor: Vec2) {
        self.labels.push(GlyphLabel {
            text: text.to_string(),
            anchor,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn frame(w: u32, h: u32) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h).unwrap();
        fb.clear(WHITE);
        fb
    }

    #[test]
    fn zero_sized_frames_are_refused() {
        assert!(matches!(
            FrameBuffer::new(0, 10),
            Err(RigError::Config { .. })
        ));
    }

    #[test]
    fn quad_fill_covers_interior_only() {
        let mut fb = frame(10, 10);
        fb.fill_quad(
            [
                Vec2::new(2.0, 2.0),
                Vec2::new(6.0, 2.0),
                Vec2::new(6.0, 6.0),
                Vec2::new(2.0, 6.0),
            ],
            RED,
        );
        assert_eq!(fb.pixel(3, 3), Some(RED));
        assert_eq!(fb.pixel(5, 5), Some(RED));
        assert_eq!(fb.pixel(6, 6), Some(WHITE));
        assert_eq!(fb.pixel(1, 3), Some(WHITE));
    }

    #[test]
    fn half_alpha_blends() {
        let mut fb = frame(1, 1);
        fb.fill_quad(
            [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::ONE, Vec2::new(0.0, 1.0)],
            [0, 0, 0, 128],
        );
        let px = fb.pixel(0, 0).unwrap();
        assert!(px[0] > 120 && px[0] < 135, "{px:?}");
        assert_eq!(px[3], 255);
    }

    #[test]
    fn rotated_quarter_turn_swaps_extent() {
        let mut fb = frame(20, 20);
        let bar = RgbaImage::from_pixel(8, 2, Rgba(RED));
        fb.draw_image_rotated(&bar, Vec2::new(10.0, 10.0), 90.0);
        // Horizontal bar becomes vertical.
        assert_eq!(fb.pixel(10, 7), Some(RED));
        assert_eq!(fb.pixel(10, 12), Some(RED));
        assert_eq!(fb.pixel(6, 10), Some(WHITE));
    }

    #[test]
    fn offscreen_draws_are_clipped() {
        let mut fb = frame(4, 4);
        let img = RgbaImage::from_pixel(3, 3, Rgba(RED));
        fb.draw_image(&img, Vec2::new(-2.0, -2.0));
        assert_eq!(fb.pixel(0, 0), Some(RED));
        assert_eq!(fb.pixel(1, 1), Some(WHITE));
        fb.fill_quad([Vec2::splat(-10.0); 4], RED);
        assert_eq!(fb.pixel(3, 3), Some(WHITE));
    }

    #[test]
    fn readback_is_straight_alpha() {
        let mut fb = FrameBuffer::new(2, 1).unwrap();
        fb.clear([0, 0, 0, 0]);
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128]));
        fb.draw_image(&img, Vec2::ZERO);
        let bytes = fb.to_rgba8();
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes[3], 128);
        assert!((bytes[0] as i32 - 200).abs() <= 2, "{bytes:?}");
        assert_eq!(&bytes[4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn glyphs_become_labels_until_cleared() {
        let mut fb = frame(4, 4);
        fb.draw_glyph("!", Vec2::new(2.0, 1.0));
        assert_eq!(fb.labels().len(), 1);
        fb.clear(WHITE);
        assert!(fb.labels().is_empty());
    }
}
