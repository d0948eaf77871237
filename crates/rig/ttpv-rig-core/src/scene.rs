//! The stage's owned world: rigs in draw order, background, selection.

use glam::Vec2;
use image::RgbaImage;

use crate::config::{DragBounds, HitBox, StageConfig};
use crate::error::RigError;
use crate::ids::{IdAllocator, RigHandle};
use crate::rig::Rig;

#[derive(Debug)]
pub struct Scene {
    rigs: Vec<Rig>,
    background: Option<RgbaImage>,
    background_id: Option<String>,
    /// Target of the action menu and sliders.
    selected: Option<RigHandle>,
    /// Rig following the pointer between down and up.
    dragging: Option<RigHandle>,
    view: Vec2,
    capacity: usize,
    hit_box: HitBox,
    drag_bounds: DragBounds,
    /// Sum of every tick's `dt`, in milliseconds.
    clock_ms: f64,
    ids: IdAllocator<RigHandle>,
}

impl Scene {
    pub fn new(cfg: &StageConfig) -> Self {
        Self {
            rigs: Vec::with_capacity(cfg.max_rigs),
            background: None,
            background_id: None,
            selected: None,
            dragging: None,
            view: Vec2::new(cfg.view_width as f32, cfg.view_height as f32),
            capacity: cfg.max_rigs,
            hit_box: cfg.hit_box,
            drag_bounds: cfg.drag_bounds,
            clock_ms: 0.0,
            ids: IdAllocator::new(),
        }
    }

    #[inline]
    pub fn view_size(&self) -> Vec2 {
        self.view
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rigs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rigs.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.rigs.len() >= self.capacity
    }

    #[inline]
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub(crate) fn advance_clock(&mut self, dt_ms: f32) {
        self.clock_ms += dt_ms.max(0.0) as f64;
    }

    pub fn rigs(&self) -> &[Rig] {
        &self.rigs
    }

    pub fn rigs_mut(&mut self) -> &mut [Rig] {
        &mut self.rigs
    }

    pub fn handles(&self) -> Vec<RigHandle> {
        self.rigs.iter().map(Rig::handle).collect()
    }

    pub fn index_of(&self, handle: RigHandle) -> Option<usize> {
        self.rigs.iter().position(|r| r.handle() == handle)
    }

    pub fn rig(&self, handle: RigHandle) -> Option<&Rig> {
        self.rigs.iter().find(|r| r.handle() == handle)
    }

    pub fn rig_mut(&mut self, handle: RigHandle) -> Option<&mut Rig> {
        self.rigs.iter_mut().find(|r| r.handle() == handle)
    }

    /// Like [`Scene::rig_mut`], failing with `InvalidSelection`.
    pub fn require_mut(&mut self, handle: RigHandle) -> Result<&mut Rig, RigError> {
        self.rig_mut(handle)
            .ok_or_else(|| RigError::selection(format!("no rig with handle {}", handle.0)))
    }

    /// Append a rig built by `build` with a freshly allocated handle.
    /// A full scene is left untouched.
    pub fn add_rig(&mut self, build: impl FnOnce(RigHandle) -> Rig) -> Result<RigHandle, RigError> {
        if self.is_full() {
            return Err(RigError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let handle = self.ids.alloc();
        self.rigs.push(build(handle));
        Ok(handle)
    }

    /// Remove a rig; selection and drag pointing at it are cleared.
    pub fn remove_rig(&mut self, handle: RigHandle) -> Result<Rig, RigError> {
        let idx = self
            .index_of(handle)
            .ok_or_else(|| RigError::selection(format!("no rig with handle {}", handle.0)))?;
        if self.selected == Some(handle) {
            self.selected = None;
        }
        if self.dragging == Some(handle) {
            self.dragging = None;
        }
        Ok(self.rigs.remove(idx))
    }

    #[inline]
    pub fn selected(&self) -> Option<RigHandle> {
        self.selected
    }

    pub fn select(&mut self, handle: RigHandle) -> Result<(), RigError> {
        if self.index_of(handle).is_none() {
            return Err(RigError::selection(format!("no rig with handle {}", handle.0)));
        }
        self.selected = Some(handle);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The menu-selected rig, or `InvalidSelection`.
    pub fn selected_mut(&mut self) -> Result<&mut Rig, RigError> {
        let handle = self
            .selected
            .ok_or_else(|| RigError::selection("no rig selected"))?;
        self.require_mut(handle)
    }

    #[inline]
    pub fn dragging(&self) -> Option<RigHandle> {
        self.dragging
    }

    /// First rig in scene order whose hit box contains `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<RigHandle> {
        let hb = self.hit_box;
        self.rigs
            .iter()
            .find(|rig| {
                let left = rig.position().x + hb.offset_x;
                let top = rig.position().y + hb.offset_y;
                point.x >= left
                    && point.x < left + hb.width
                    && point.y >= top
                    && point.y < top + hb.height
            })
            .map(Rig::handle)
    }

    /// Start dragging whatever lies under `point`.
    pub fn begin_drag(&mut self, point: Vec2) -> Option<RigHandle> {
        self.dragging = self.hit_test(point);
        self.dragging
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Clamp a position into the draggable area of the view.
    pub fn clamp_to_view(&self, point: Vec2) -> Vec2 {
        let b = self.drag_bounds;
        let min = Vec2::new(b.left, b.top);
        let max = Vec2::new(self.view.x - b.right, self.view.y - b.bottom).max(min);
        point.clamp(min, max)
    }

    /// Move the drag target to `point`. Returns false when nothing is dragged.
    pub fn drag_to(&mut self, point: Vec2) -> bool {
        let Some(handle) = self.dragging else {
            return false;
        };
        let clamped = self.clamp_to_view(point);
        match self.rig_mut(handle) {
            Some(rig) => {
                rig.set_position(clamped);
                true
            }
            None => {
                self.dragging = None;
                false
            }
        }
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn background_id(&self) -> Option<&str> {
        self.background_id.as_deref()
    }

    pub fn set_background(&mut self, id: Option<String>, image: Option<RgbaImage>) {
        self.background_id = id;
        self.background = image;
    }

    /// Count every rig's emotion overlay down by `dt_ms`.
    pub fn expire_overlays(&mut self, dt_ms: f32) {
        for rig in &mut self.rigs {
            rig.expire_emotion(dt_ms);
        }
    }
}
