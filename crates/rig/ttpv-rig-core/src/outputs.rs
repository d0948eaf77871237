//! Output contracts from the stage.
//!
//! Each tick returns the semantic events it produced. Pixels go to the
//! caller's surface, not through here.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationId;
use crate::assets::AssetCategory;
use crate::error::RigError;
use crate::ids::{ResourceHandle, RigHandle};
use crate::pose::PosePreset;

/// One picker row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub handle: ResourceHandle,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StageEvent {
    RigAdded {
        rig: RigHandle,
        source: String,
    },
    RigRemoved {
        rig: RigHandle,
    },
    AnimationStarted {
        rig: RigHandle,
        animation: AnimationId,
    },
    AnimationFinished {
        rig: RigHandle,
        animation: AnimationId,
    },
    BreathingStarted {
        rig: RigHandle,
    },
    PoseApplied {
        rig: RigHandle,
        pose: PosePreset,
    },
    PickerOpened {
        category: AssetCategory,
        entries: Vec<ResourceEntry>,
    },
    BackgroundChanged {
        /// `None` when the picked background failed to load.
        id: Option<String>,
    },
    /// An input was dropped; the tick continued.
    Rejected {
        category: String,
        reason: String,
    },
}

impl StageEvent {
    pub fn rejected(err: &RigError) -> Self {
        Self::Rejected {
            category: err.category().to_string(),
            reason: err.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<StageEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
