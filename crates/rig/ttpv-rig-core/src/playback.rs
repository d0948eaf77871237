//! Per-rig playback state machine.
//!
//! States: `Idle` (initial), `Playing { animation, elapsed_ms }`, `Breathing`.
//! Playing and Breathing are mutually exclusive by construction.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationId, AnimationLibrary, PoseFrame};
use crate::error::RigError;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlaybackMode {
    Idle,
    Playing {
        animation: AnimationId,
        elapsed_ms: f32,
    },
    Breathing,
}

impl PlaybackMode {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing { .. } => "playing",
            Self::Breathing => "breathing",
        }
    }
}

/// Result of one `advance` call, for the owning rig to apply.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Nothing new to write this tick.
    Hold,
    /// Write this pose into the rig.
    Apply(PoseFrame),
    /// The animation ran its full duration; the rig must reset to stand.
    Finished(AnimationId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Playback {
    mode: PlaybackMode,
    /// Last frame index whose pose was written, so each frame applies once.
    applied_frame: Option<u32>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            mode: PlaybackMode::Idle,
            applied_frame: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    #[inline]
    pub fn is_breathing(&self) -> bool {
        matches!(self.mode, PlaybackMode::Breathing)
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self.mode, PlaybackMode::Idle)
    }

    #[inline]
    pub fn current_animation(&self) -> Option<AnimationId> {
        match self.mode {
            PlaybackMode::Playing { animation, .. } => Some(animation),
            _ => None,
        }
    }

    /// Frame index of the running animation.
    pub fn current_frame(&self, library: &AnimationLibrary) -> Option<u32> {
        match self.mode {
            PlaybackMode::Playing {
                animation,
                elapsed_ms,
            } => Some(library.get(animation).frame_at(elapsed_ms)),
            _ => None,
        }
    }

    /// Start `animation` from zero, cancelling whatever was active.
    pub fn trigger(&mut self, animation: AnimationId) {
        self.mode = PlaybackMode::Playing {
            animation,
            elapsed_ms: 0.0,
        };
        self.applied_frame = None;
    }

    /// Only legal from Idle.
    pub fn enable_breathing(&mut self) -> Result<(), RigError> {
        if !self.is_idle() {
            return Err(RigError::InvalidTransition {
                from: self.mode.name().to_string(),
                to: PlaybackMode::Breathing.name().to_string(),
            });
        }
        self.mode = PlaybackMode::Breathing;
        Ok(())
    }

    /// Back to Idle with breathing off.
    pub fn stop(&mut self) {
        self.mode = PlaybackMode::Idle;
        self.applied_frame = None;
    }

    /// Advance by `dt_ms`. `clock_ms` is the stage clock, used by breathing.
    pub fn advance(
        &mut self,
        dt_ms: f32,
        clock_ms: f64,
        library: &AnimationLibrary,
        rng: &mut StdRng,
    ) -> Step {
        match &mut self.mode {
            PlaybackMode::Idle => Step::Hold,
            PlaybackMode::Breathing => Step::Apply(library.breathing(clock_ms)),
            PlaybackMode::Playing {
                animation,
                elapsed_ms,
            } => {
                let animation = *animation;
                *elapsed_ms += dt_ms.max(0.0);
                let def = library.get(animation);
                let frame = def.frame_at(*elapsed_ms);
                if self.applied_frame.is_none() {
                    // Frame 0 always runs first, however long the first tick.
                    let first = library.sample(animation, 0, rng);
                    if frame == 0 || frame >= def.frames {
                        self.applied_frame = Some(0);
                        return Step::Apply(first);
                    }
                    self.applied_frame = Some(frame);
                    return Step::Apply(first.then(library.sample(animation, frame, rng)));
                }
                if frame >= def.frames {
                    self.stop();
                    return Step::Finished(animation);
                }
                if self.applied_frame == Some(frame) {
                    return Step::Hold;
                }
                self.applied_frame = Some(frame);
                Step::Apply(library.sample(animation, frame, rng))
            }
        }
    }
}
