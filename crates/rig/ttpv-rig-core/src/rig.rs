//! One on-screen character: parts, appearance, playback and overlay.

use glam::Vec2;
use image::RgbaImage;
use rand::rngs::StdRng;

use crate::animation::{AnimationId, AnimationLibrary, OffsetWrite, PoseFrame};
use crate::error::RigError;
use crate::ids::RigHandle;
use crate::overlay::EmotionOverlay;
use crate::part::{PartName, PartSet};
use crate::playback::{Playback, PlaybackMode, Step};
use crate::pose::ExplicitPose;

#[derive(Clone, Debug)]
pub struct Rig {
    handle: RigHandle,
    /// Asset identifier the head image was loaded from.
    source: String,
    /// Centre of the body in view coordinates.
    position: Vec2,
    /// Transient jitter/lift added at draw time.
    render_offset: Vec2,
    parts: PartSet,
    head_image: Option<RgbaImage>,
    pub body_color: [u8; 4],
    playback: Playback,
    emotion: Option<EmotionOverlay>,
}

impl Rig {
    pub fn new(
        handle: RigHandle,
        source: impl Into<String>,
        position: Vec2,
        head_size: u32,
        head_image: Option<RgbaImage>,
    ) -> Self {
        let mut rig = Self {
            handle,
            source: source.into(),
            position,
            render_offset: Vec2::ZERO,
            parts: PartSet::standard(head_size),
            head_image: None,
            body_color: [60, 60, 60, 255],
            playback: Playback::new(),
            emotion: None,
        };
        rig.set_head_image(head_image);
        rig
    }

    #[inline]
    pub fn handle(&self) -> RigHandle {
        self.handle
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[inline]
    pub fn render_offset(&self) -> Vec2 {
        self.render_offset
    }

    /// Position plus render offset: the origin parts are resolved against.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.render_offset
    }

    #[inline]
    pub fn parts(&self) -> &PartSet {
        &self.parts
    }

    #[inline]
    pub fn parts_mut(&mut self) -> &mut PartSet {
        &mut self.parts
    }

    #[inline]
    pub fn angle(&self, part: PartName) -> f32 {
        self.parts.angle(part)
    }

    #[inline]
    pub fn set_angle(&mut self, part: PartName, degrees: f32) {
        self.parts.set_angle(part, degrees);
    }

    /// String-keyed angle write; fails with `UnknownPart`.
    pub fn set_angle_by_name(&mut self, part: &str, degrees: f32) -> Result<(), RigError> {
        self.parts.by_name_mut(part)?.angle = degrees;
        Ok(())
    }

    #[inline]
    pub fn set_part_offset(&mut self, part: PartName, offset: Vec2) {
        self.parts.get_mut(part).offset = offset;
    }

    #[inline]
    pub fn head_image(&self) -> Option<&RgbaImage> {
        self.head_image.as_ref()
    }

    /// Swap the head image; the head part takes the image's size.
    pub fn set_head_image(&mut self, image: Option<RgbaImage>) {
        if let Some(img) = &image {
            self.parts.get_mut(PartName::Head).size =
                Vec2::new(img.width() as f32, img.height() as f32);
        }
        self.head_image = image;
    }

    /// Resize the head slot without an image (the slot renders nothing).
    pub fn set_head_size(&mut self, size: Vec2) {
        self.parts.get_mut(PartName::Head).size = size;
    }

    #[inline]
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    #[inline]
    pub fn mode(&self) -> PlaybackMode {
        self.playback.mode()
    }

    #[inline]
    pub fn emotion(&self) -> Option<&EmotionOverlay> {
        self.emotion.as_ref()
    }

    pub fn set_emotion(&mut self, overlay: EmotionOverlay) {
        self.emotion = Some(overlay);
    }

    /// Count the overlay down; it clears itself at or below zero.
    pub fn expire_emotion(&mut self, dt_ms: f32) {
        if let Some(overlay) = &mut self.emotion {
            if !overlay.elapse(dt_ms) {
                self.emotion = None;
            }
        }
    }

    /// Start `animation` from zero, cancelling breathing or any running animation.
    pub fn trigger(&mut self, animation: AnimationId) {
        self.playback.trigger(animation);
    }

    pub fn enable_breathing(&mut self) -> Result<(), RigError> {
        self.playback.enable_breathing()
    }

    /// All angles and the render offset to zero, breathing off, Idle.
    pub fn reset_to_stand(&mut self) {
        self.parts.zero_angles();
        self.render_offset = Vec2::ZERO;
        self.playback.stop();
    }

    /// Apply a discrete pose. Cancels playback and breathing.
    pub fn set_pose(&mut self, pose: &ExplicitPose) {
        self.playback.stop();
        self.render_offset = Vec2::ZERO;
        for (part, degrees) in &pose.angles {
            self.parts.set_angle(*part, *degrees);
        }
    }

    /// Advance playback and write the resulting pose. Returns the animation
    /// that completed on this tick, if any.
    pub fn advance(
        &mut self,
        dt_ms: f32,
        clock_ms: f64,
        library: &AnimationLibrary,
        rng: &mut StdRng,
    ) -> Option<AnimationId> {
        match self.playback.advance(dt_ms, clock_ms, library, rng) {
            Step::Hold => None,
            Step::Apply(pose) => {
                self.apply(pose);
                None
            }
            Step::Finished(animation) => {
                self.reset_to_stand();
                Some(animation)
            }
        }
    }

    fn apply(&mut self, pose: PoseFrame) {
        for (part, degrees) in pose.angles {
            self.parts.set_angle(part, degrees);
        }
        match pose.offset {
            Some(OffsetWrite::Set(offset)) => self.render_offset = offset,
            Some(OffsetWrite::Vertical(lift)) => self.render_offset.y = lift,
            None => {}
        }
        if let Some(overlay) = pose.emotion {
            self.emotion = Some(overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rig() -> Rig {
        Rig::new(RigHandle(0), "hero.png", Vec2::new(400.0, 300.0), 70, None)
    }

    #[test]
    fn fresh_rig_is_neutral() {
        let r = rig();
        assert!(r.parts().iter().all(|p| p.angle == 0.0));
        assert_eq!(r.render_offset(), Vec2::ZERO);
        assert_eq!(r.mode(), PlaybackMode::Idle);
        assert!(r.emotion().is_none());
    }

    #[test]
    fn head_takes_image_size() {
        let mut r = rig();
        r.set_head_image(Some(RgbaImage::new(90, 90)));
        assert_eq!(r.parts().get(PartName::Head).size, Vec2::splat(90.0));
        r.set_head_image(None);
        assert!(r.head_image().is_none());
    }

    #[test]
    fn unknown_part_is_rejected() {
        let mut r = rig();
        assert!(r.set_angle_by_name("tail", 3.0).is_err());
        r.set_angle_by_name("neck", 3.0).unwrap();
        assert_eq!(r.angle(PartName::Neck), 3.0);
    }

    #[test]
    fn set_pose_stops_breathing() {
        let mut r = rig();
        let lib = AnimationLibrary::default();
        let mut rng = StdRng::seed_from_u64(0);
        r.enable_breathing().unwrap();
        r.advance(16.0, 750.0, &lib, &mut rng);
        assert!(r.render_offset().y > 0.0);
        r.set_pose(&ExplicitPose::slouch());
        assert_eq!(r.mode(), PlaybackMode::Idle);
        assert_eq!(r.angle(PartName::RightArm), 25.0);
        assert_eq!(r.render_offset(), Vec2::ZERO);
    }

    #[test]
    fn overlay_counts_down() {
        let mut r = rig();
        r.set_emotion(EmotionOverlay::new(":)", 2000.0));
        r.expire_emotion(1999.0);
        assert!(r.emotion().is_some());
        r.expire_emotion(2.0);
        assert!(r.emotion().is_none());
    }
}
