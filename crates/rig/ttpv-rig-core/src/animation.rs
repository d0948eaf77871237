//! Procedural animation catalog.
//!
//! Each discrete animation is a frame count, a duration and a pure function
//! from frame index to a whole-body pose. Breathing is separate: it is driven
//! by the stage clock and never terminates.

use std::f32::consts::{PI, TAU};
use std::fmt;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::StageConfig;
use crate::overlay::EmotionOverlay;
use crate::part::PartName;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationId {
    Wave,
    Smile,
    Nod,
}

impl AnimationId {
    pub const ALL: [AnimationId; 3] = [AnimationId::Wave, AnimationId::Smile, AnimationId::Nod];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wave => "wave",
            Self::Smile => "smile",
            Self::Nod => "nod",
        }
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a pose frame writes the rig's render offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OffsetWrite {
    Set(Vec2),
    /// Replace only the vertical component.
    Vertical(f32),
}

/// Everything one frame writes into a rig. Parts not listed keep their angle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseFrame {
    pub angles: Vec<(PartName, f32)>,
    pub offset: Option<OffsetWrite>,
    pub emotion: Option<EmotionOverlay>,
}

impl PoseFrame {
    #[inline]
    fn angle(mut self, part: PartName, degrees: f32) -> Self {
        self.angles.push((part, degrees));
        self
    }

    /// Both frames written in order: `later` wins wherever it writes.
    pub fn then(mut self, later: PoseFrame) -> PoseFrame {
        self.angles.extend(later.angles);
        self.offset = match (self.offset, later.offset) {
            (Some(OffsetWrite::Set(base)), Some(OffsetWrite::Vertical(lift))) => {
                Some(OffsetWrite::Set(Vec2::new(base.x, lift)))
            }
            (base, None) => base,
            (_, later) => later,
        };
        self.emotion = later.emotion.or(self.emotion);
        self
    }

    /// Angle this frame assigns to `part`, if any.
    pub fn angle_of(&self, part: PartName) -> Option<f32> {
        self.angles
            .iter()
            .rev()
            .find_map(|(p, a)| (*p == part).then_some(*a))
    }
}

/// Knobs shared by every animation, taken from the stage config.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationTuning {
    pub emotion_glyph: String,
    pub emotion_duration_ms: f32,
    pub smile_jitter: i32,
    pub breathing_period_ms: f32,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self::from(&StageConfig::default())
    }
}

impl From<&StageConfig> for AnimationTuning {
    fn from(cfg: &StageConfig) -> Self {
        Self {
            emotion_glyph: cfg.emotion_glyph.clone(),
            emotion_duration_ms: cfg.emotion_duration_ms,
            smile_jitter: cfg.smile_jitter,
            breathing_period_ms: cfg.breathing_period_ms,
        }
    }
}

pub type UpdateFn = fn(u32, &AnimationTuning, &mut StdRng) -> PoseFrame;

/// Immutable description of one discrete animation.
#[derive(Clone)]
pub struct AnimationDefinition {
    pub id: AnimationId,
    pub frames: u32,
    pub duration_ms: f32,
    update: UpdateFn,
}

impl fmt::Debug for AnimationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationDefinition")
            .field("id", &self.id)
            .field("frames", &self.frames)
            .field("duration_ms", &self.duration_ms)
            .finish_non_exhaustive()
    }
}

impl AnimationDefinition {
    #[inline]
    pub fn frame_duration_ms(&self) -> f32 {
        self.duration_ms / self.frames as f32
    }

    /// `floor(elapsed / (D / F))`; a value `>= frames` means the animation is over.
    #[inline]
    pub fn frame_at(&self, elapsed_ms: f32) -> u32 {
        (elapsed_ms.max(0.0) / self.frame_duration_ms()).floor() as u32
    }

    #[inline]
    pub fn is_complete_at(&self, elapsed_ms: f32) -> bool {
        self.frame_at(elapsed_ms) >= self.frames
    }
}

fn wave(frame: u32, _: &AnimationTuning, _: &mut StdRng) -> PoseFrame {
    let swing = (frame as f32 * PI / 3.0).sin();
    PoseFrame::default()
        .angle(PartName::RightArm, -90.0 + 45.0 * swing)
        .angle(PartName::Head, 5.0 * swing)
        .angle(PartName::Neck, 0.0)
        .angle(PartName::Body, 0.0)
        .angle(PartName::LeftArm, 0.0)
        .angle(PartName::LeftLeg, 0.0)
        .angle(PartName::RightLeg, 0.0)
}

fn smile(frame: u32, tuning: &AnimationTuning, rng: &mut StdRng) -> PoseFrame {
    let j = tuning.smile_jitter;
    let shake = rng.random_range(-j..=j) as f32;
    let mut pose = PoseFrame {
        offset: Some(OffsetWrite::Set(Vec2::splat(shake))),
        ..Default::default()
    };
    if frame == 0 {
        pose.emotion = Some(EmotionOverlay::new(
            tuning.emotion_glyph.clone(),
            tuning.emotion_duration_ms,
        ));
    }
    pose
}

/// Triangular profile peaking halfway through.
#[inline]
fn nod_amount(frame: u32) -> f32 {
    let p = frame as f32 / 3.0;
    if p <= 0.5 {
        2.0 * p
    } else {
        2.0 * (1.0 - p)
    }
}

fn nod(frame: u32, _: &AnimationTuning, _: &mut StdRng) -> PoseFrame {
    let amount = nod_amount(frame);
    PoseFrame::default()
        .angle(PartName::Head, 20.0 * amount)
        .angle(PartName::Neck, 10.0 * amount)
}

/// Shared, immutable registry of the discrete animations plus the breathing loop.
#[derive(Clone, Debug)]
pub struct AnimationLibrary {
    /// Indexed by `AnimationId as usize`.
    items: [AnimationDefinition; 3],
    tuning: AnimationTuning,
}

impl AnimationLibrary {
    pub fn new(tuning: AnimationTuning) -> Self {
        let def = |id, frames, duration_ms, update| AnimationDefinition {
            id,
            frames,
            duration_ms,
            update,
        };
        Self {
            items: [
                def(AnimationId::Wave, 6, 1200.0, wave as UpdateFn),
                def(AnimationId::Smile, 4, 800.0, smile as UpdateFn),
                def(AnimationId::Nod, 4, 2000.0, nod as UpdateFn),
            ],
            tuning,
        }
    }

    #[inline]
    pub fn tuning(&self) -> &AnimationTuning {
        &self.tuning
    }

    #[inline]
    pub fn get(&self, id: AnimationId) -> &AnimationDefinition {
        &self.items[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationDefinition> {
        self.items.iter()
    }

    /// Pose for `frame` of animation `id`.
    pub fn sample(&self, id: AnimationId, frame: u32, rng: &mut StdRng) -> PoseFrame {
        (self.get(id).update)(frame, &self.tuning, rng)
    }

    /// Breathing pose at stage time `clock_ms`.
    pub fn breathing(&self, clock_ms: f64) -> PoseFrame {
        let period = self.tuning.breathing_period_ms as f64;
        let progress = (clock_ms.rem_euclid(period) / period) as f32;
        let breath = 2.0 * (progress * TAU).sin();
        PoseFrame {
            offset: Some(OffsetWrite::Vertical(breath.abs())),
            ..Default::default()
        }
        .angle(PartName::Body, 0.5 * breath)
        .angle(PartName::Head, 0.3 * breath)
        .angle(PartName::LeftArm, breath)
        .angle(PartName::RightArm, breath)
    }
}

impl Default for AnimationLibrary {
    fn default() -> Self {
        Self::new(AnimationTuning::default())
    }
}
