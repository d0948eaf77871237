//! Input contracts for the stage.
//!
//! Hosts translate their own windowing/widget events into these and queue
//! them; the stage drains the queue at the start of every tick.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationId;
use crate::assets::AssetCategory;
use crate::ids::{ResourceHandle, RigHandle};
use crate::pose::PosePreset;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    ButtonPressed { button: ButtonId },
    SliderChanged { slider: SliderId, value: f32 },
}

impl InputEvent {
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerMove { .. } => "pointer_move",
            Self::ButtonPressed { .. } => "button_pressed",
            Self::SliderChanged { .. } => "slider_changed",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ButtonId {
    OpenPicker { category: AssetCategory },
    PickResource { resource: ResourceHandle },
    SelectRig { rig: RigHandle },
    RemoveRig { rig: RigHandle },
    PlayAnimation { animation: AnimationId },
    ApplyPose { pose: PosePreset },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderId {
    HeadOffsetX,
    HeadOffsetY,
    HeadSize,
}

impl SliderId {
    /// Range a host slider should offer. Values outside it are still accepted.
    pub fn range(&self) -> (f32, f32) {
        match self {
            Self::HeadOffsetX => (-50.0, 50.0),
            Self::HeadOffsetY => (-100.0, 0.0),
            Self::HeadSize => (40.0, 120.0),
        }
    }
}
