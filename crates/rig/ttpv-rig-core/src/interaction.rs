//! Interaction controller: turns input events into scene and rig mutations.
//!
//! The controller owns the open picker's table mapping resource handles
//! back to asset identifiers.

use glam::Vec2;
use hashbrown::HashMap;

use crate::assets::{load_or_none, AssetCategory, AssetProvider};
use crate::config::StageConfig;
use crate::error::RigError;
use crate::ids::{IdAllocator, ResourceHandle, RigHandle};
use crate::inputs::{ButtonId, InputEvent, SliderId};
use crate::outputs::{Outputs, ResourceEntry, StageEvent};
use crate::part::PartName;
use crate::pose::{ExplicitPose, PosePreset};
use crate::rig::Rig;
use crate::scene::Scene;

#[derive(Debug, Default)]
struct Picker {
    category: Option<AssetCategory>,
    entries: HashMap<ResourceHandle, String>,
}

#[derive(Debug)]
pub struct Controller {
    picker: Picker,
    ids: IdAllocator<ResourceHandle>,
    spawn: Vec2,
    head_size: u32,
    body_color: [u8; 4],
}

impl Controller {
    pub fn new(cfg: &StageConfig) -> Self {
        Self {
            picker: Picker::default(),
            ids: IdAllocator::new(),
            spawn: cfg.spawn_point(),
            head_size: cfg.head_size,
            body_color: cfg.body_color,
        }
    }

    /// Category of the open picker, if any.
    pub fn picker_category(&self) -> Option<AssetCategory> {
        self.picker.category
    }

    /// Run one event to completion.
    pub fn handle<A: AssetProvider + ?Sized>(
        &mut self,
        event: &InputEvent,
        scene: &mut Scene,
        assets: &A,
        outputs: &mut Outputs,
    ) -> Result<(), RigError> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                if let Some(rig) = scene.begin_drag(Vec2::new(x, y)) {
                    log::debug!("drag start on rig {}", rig.0);
                }
                Ok(())
            }
            InputEvent::PointerUp { .. } => {
                scene.end_drag();
                Ok(())
            }
            InputEvent::PointerMove { x, y } => {
                scene.drag_to(Vec2::new(x, y));
                Ok(())
            }
            InputEvent::ButtonPressed { button } => self.press(button, scene, assets, outputs),
            InputEvent::SliderChanged { slider, value } => {
                self.slide(slider, value, scene, assets)
            }
        }
    }

    fn press<A: AssetProvider + ?Sized>(
        &mut self,
        button: ButtonId,
        scene: &mut Scene,
        assets: &A,
        outputs: &mut Outputs,
    ) -> Result<(), RigError> {
        match button {
            ButtonId::OpenPicker { category } => {
                self.open_picker(category, assets, outputs);
                Ok(())
            }
            ButtonId::PickResource { resource } => self.pick(resource, scene, assets, outputs),
            ButtonId::SelectRig { rig } => scene.select(rig),
            ButtonId::RemoveRig { rig } => {
                scene.remove_rig(rig)?;
                log::debug!("rig {} removed", rig.0);
                outputs.push_event(StageEvent::RigRemoved { rig });
                Ok(())
            }
            ButtonId::PlayAnimation { animation } => {
                let target = scene.selected_mut()?;
                target.trigger(animation);
                let rig = target.handle();
                log::debug!("rig {} plays {animation}", rig.0);
                outputs.push_event(StageEvent::AnimationStarted { rig, animation });
                Ok(())
            }
            ButtonId::ApplyPose { pose } => {
                let target = scene.selected_mut()?;
                let rig = target.handle();
                apply_preset(target, pose)?;
                outputs.push_event(StageEvent::PoseApplied { rig, pose });
                if pose == PosePreset::Breathe {
                    log::debug!("rig {} breathing", rig.0);
                    outputs.push_event(StageEvent::BreathingStarted { rig });
                }
                Ok(())
            }
        }
    }

    fn slide<A: AssetProvider + ?Sized>(
        &mut self,
        slider: SliderId,
        value: f32,
        scene: &mut Scene,
        assets: &A,
    ) -> Result<(), RigError> {
        let target = scene.selected_mut()?;
        match slider {
            SliderId::HeadOffsetX => target.parts_mut().get_mut(PartName::Head).offset.x = value,
            SliderId::HeadOffsetY => target.parts_mut().get_mut(PartName::Head).offset.y = value,
            SliderId::HeadSize => {
                // Saturating cast; oversized heads are refused by `load_scaled`.
                let size = value.max(1.0) as u32;
                let image = load_or_none(assets, AssetCategory::Avatar, target.source(), size, size);
                target.set_head_size(Vec2::splat(size as f32));
                target.set_head_image(image);
            }
        }
        Ok(())
    }

    fn open_picker<A: AssetProvider + ?Sized>(
        &mut self,
        category: AssetCategory,
        assets: &A,
        outputs: &mut Outputs,
    ) {
        self.picker.entries.clear();
        let entries: Vec<ResourceEntry> = assets
            .list(category)
            .into_iter()
            .map(|id| {
                let handle = self.ids.alloc();
                self.picker.entries.insert(handle, id.clone());
                ResourceEntry { handle, id }
            })
            .collect();
        self.picker.category = Some(category);
        log::debug!("{category} picker opened with {} entries", entries.len());
        outputs.push_event(StageEvent::PickerOpened { category, entries });
    }

    /// Drop the open picker without picking anything.
    pub fn close_picker(&mut self) {
        self.picker.category = None;
        self.picker.entries.clear();
    }

    fn pick<A: AssetProvider + ?Sized>(
        &mut self,
        resource: ResourceHandle,
        scene: &mut Scene,
        assets: &A,
        outputs: &mut Outputs,
    ) -> Result<(), RigError> {
        let (Some(category), Some(id)) = (
            self.picker.category,
            self.picker.entries.get(&resource).cloned(),
        ) else {
            return Err(RigError::selection(format!(
                "resource {} is not in the open picker",
                resource.0
            )));
        };
        let result = match category {
            AssetCategory::Avatar => self.add_avatar(&id, scene, assets, outputs).map(|_| ()),
            AssetCategory::Background => {
                load_background(&id, scene, assets, outputs);
                Ok(())
            }
        };
        self.close_picker();
        result
    }

    /// Spawn a rig whose head is avatar `id`. A missing image still spawns
    /// the rig, headless.
    pub fn add_avatar<A: AssetProvider + ?Sized>(
        &mut self,
        id: &str,
        scene: &mut Scene,
        assets: &A,
        outputs: &mut Outputs,
    ) -> Result<RigHandle, RigError> {
        if scene.is_full() {
            return Err(RigError::CapacityExceeded {
                capacity: scene.capacity(),
            });
        }
        let size = self.head_size;
        let image = load_or_none(assets, AssetCategory::Avatar, id, size, size);
        let (spawn, color) = (self.spawn, self.body_color);
        let handle = scene.add_rig(|handle| {
            let mut rig = Rig::new(handle, id, spawn, size, image);
            rig.body_color = color;
            rig
        })?;
        log::debug!("rig {} added from {id}", handle.0);
        outputs.push_event(StageEvent::RigAdded {
            rig: handle,
            source: id.to_string(),
        });
        Ok(handle)
    }
}

/// Replace the scene background with `id`, scaled to the view.
pub fn load_background<A: AssetProvider + ?Sized>(
    id: &str,
    scene: &mut Scene,
    assets: &A,
    outputs: &mut Outputs,
) {
    let view = scene.view_size();
    let image = load_or_none(
        assets,
        AssetCategory::Background,
        id,
        view.x as u32,
        view.y as u32,
    );
    let loaded = image.as_ref().map(|_| id.to_string());
    scene.set_background(loaded.clone(), image);
    outputs.push_event(StageEvent::BackgroundChanged { id: loaded });
}

/// Apply a menu pose to one rig.
pub fn apply_preset(rig: &mut Rig, preset: PosePreset) -> Result<(), RigError> {
    match preset {
        PosePreset::Stand => rig.reset_to_stand(),
        PosePreset::Breathe => {
            rig.reset_to_stand();
            rig.enable_breathing()?;
        }
        PosePreset::Slouch => rig.set_pose(&ExplicitPose::slouch()),
    }
    Ok(())
}
