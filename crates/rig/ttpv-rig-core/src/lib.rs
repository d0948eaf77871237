//! TTPV rig core (engine-agnostic)
//!
//! A procedural 2D character rig: seven rectangular/image parts per rig,
//! formula-driven animations, a per-rig playback state machine, pointer and
//! widget interaction, and a compositor that draws into any [`Surface`].
//! [`Stage`] ties these into a single-threaded fixed-rate tick.

pub mod animation;
pub mod assets;
pub mod config;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod interaction;
pub mod outputs;
pub mod overlay;
pub mod part;
pub mod playback;
pub mod pose;
pub mod render;
pub mod rig;
pub mod scene;
pub mod stage;

// Re-exports for consumers (adapters)
pub use animation::{AnimationDefinition, AnimationId, AnimationLibrary, AnimationTuning, PoseFrame};
pub use assets::{AssetCategory, AssetProvider, MemoryAssets};
pub use config::{DragBounds, HitBox, StageConfig};
pub use error::RigError;
pub use ids::{ResourceHandle, RigHandle};
pub use inputs::{ButtonId, InputEvent, SliderId};
pub use interaction::Controller;
pub use outputs::{Outputs, ResourceEntry, StageEvent};
pub use overlay::EmotionOverlay;
pub use part::{Anchor, Part, PartName, PartSet};
pub use playback::{Playback, PlaybackMode};
pub use pose::{ExplicitPose, PosePreset, ResolvedPart};
pub use render::{DisplayList, DrawCommand, FrameBuffer, GlyphLabel, Renderer, Surface};
pub use rig::Rig;
pub use scene::Scene;
pub use stage::Stage;

pub type Result<T> = std::result::Result<T, RigError>;
