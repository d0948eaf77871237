//! The tick loop.
//!
//! One `tick` runs, in order: drain queued input events, advance every rig's
//! playback, render. Nothing inside a tick blocks, and a rejected event never
//! stops the tick.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::{AnimationId, AnimationLibrary, AnimationTuning};
use crate::assets::{AssetCategory, AssetProvider, MemoryAssets};
use crate::config::StageConfig;
use crate::error::RigError;
use crate::ids::RigHandle;
use crate::inputs::InputEvent;
use crate::interaction::{apply_preset, load_background, Controller};
use crate::outputs::{Outputs, StageEvent};
use crate::pose::PosePreset;
use crate::render::{Renderer, Surface};
use crate::scene::Scene;

#[cfg(feature = "os-rng")]
fn unseeded_rng() -> StdRng {
    StdRng::from_os_rng()
}

#[cfg(not(feature = "os-rng"))]
fn unseeded_rng() -> StdRng {
    log::debug!("no rng_seed and no OS entropy; seeding with 0");
    StdRng::seed_from_u64(0)
}

pub struct Stage<A: AssetProvider = MemoryAssets> {
    cfg: StageConfig,
    scene: Scene,
    controller: Controller,
    library: AnimationLibrary,
    renderer: Renderer,
    assets: A,
    rng: StdRng,
    queue: VecDeque<InputEvent>,
    /// Events produced between ticks, delivered with the next tick.
    pending: Outputs,
    outputs: Outputs,
}

impl<A: AssetProvider> Stage<A> {
    /// Build a stage and load the first listed background, if any.
    pub fn new(cfg: StageConfig, assets: A) -> Result<Self, RigError> {
        cfg.validate()?;
        let rng = match cfg.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => unseeded_rng(),
        };
        let mut stage = Self {
            scene: Scene::new(&cfg),
            controller: Controller::new(&cfg),
            library: AnimationLibrary::new(AnimationTuning::from(&cfg)),
            renderer: Renderer::new(&cfg),
            assets,
            rng,
            queue: VecDeque::new(),
            pending: Outputs::default(),
            outputs: Outputs::default(),
            cfg,
        };
        if let Some(first) = stage.assets.list(AssetCategory::Background).into_iter().next() {
            load_background(&first, &mut stage.scene, &stage.assets, &mut stage.pending);
        }
        Ok(stage)
    }

    pub fn config(&self) -> &StageConfig {
        &self.cfg
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    /// Events returned by the most recent tick.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Queue an event for the next tick's drain phase.
    pub fn enqueue(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn enqueue_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.queue.extend(events);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Run one event now instead of waiting for the next tick.
    pub fn apply(&mut self, event: &InputEvent) -> Result<(), RigError> {
        self.controller
            .handle(event, &mut self.scene, &self.assets, &mut self.pending)
    }

    pub fn add_avatar(&mut self, id: &str) -> Result<RigHandle, RigError> {
        self.controller
            .add_avatar(id, &mut self.scene, &self.assets, &mut self.pending)
    }

    pub fn remove_rig(&mut self, rig: RigHandle) -> Result<(), RigError> {
        self.apply(&InputEvent::ButtonPressed {
            button: crate::inputs::ButtonId::RemoveRig { rig },
        })
    }

    pub fn trigger(&mut self, rig: RigHandle, animation: AnimationId) -> Result<(), RigError> {
        self.scene.require_mut(rig)?.trigger(animation);
        log::debug!("rig {} plays {animation}", rig.0);
        self.pending
            .push_event(StageEvent::AnimationStarted { rig, animation });
        Ok(())
    }

    pub fn apply_pose(&mut self, rig: RigHandle, pose: PosePreset) -> Result<(), RigError> {
        apply_preset(self.scene.require_mut(rig)?, pose)?;
        self.pending.push_event(StageEvent::PoseApplied { rig, pose });
        if pose == PosePreset::Breathe {
            self.pending.push_event(StageEvent::BreathingStarted { rig });
        }
        Ok(())
    }

    pub fn set_background(&mut self, id: &str) {
        load_background(id, &mut self.scene, &self.assets, &mut self.pending);
    }

    /// Advance the stage by `dt_ms` and paint into `surface`.
    pub fn tick<S: Surface + ?Sized>(&mut self, dt_ms: f32, surface: &mut S) -> &Outputs {
        let dt_ms = dt_ms.max(0.0);
        self.outputs.clear();
        self.outputs.events.append(&mut self.pending.events);

        // 1) drain input
        while let Some(event) = self.queue.pop_front() {
            if let Err(err) =
                self.controller
                    .handle(&event, &mut self.scene, &self.assets, &mut self.outputs)
            {
                if err.is_recoverable() {
                    log::warn!("{} rejected: {err}", event.kind());
                } else {
                    log::error!("{} failed: {err}", event.kind());
                }
                self.outputs.push_event(StageEvent::rejected(&err));
            }
        }

        // 2) advance playback
        self.scene.advance_clock(dt_ms);
        let clock_ms = self.scene.clock_ms();
        for rig in self.scene.rigs_mut() {
            if let Some(animation) = rig.advance(dt_ms, clock_ms, &self.library, &mut self.rng) {
                log::debug!("rig {} finished {animation}", rig.handle().0);
                self.outputs.push_event(StageEvent::AnimationFinished {
                    rig: rig.handle(),
                    animation,
                });
            }
        }

        // 3) render
        self.renderer.render(&mut self.scene, surface, dt_ms);

        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::ButtonId;
    use crate::render::DisplayList;

    fn seeded() -> StageConfig {
        StageConfig {
            rng_seed: Some(9),
            ..Default::default()
        }
    }

    #[test]
    fn invalid_config_is_refused() {
        let cfg = StageConfig {
            max_rigs: 0,
            ..Default::default()
        };
        assert!(Stage::new(cfg, MemoryAssets::new()).is_err());
    }

    #[test]
    fn rejected_events_do_not_stop_the_drain() {
        let mut stage = Stage::new(seeded(), MemoryAssets::new()).unwrap();
        let rig = stage.add_avatar("hero.png").unwrap();
        stage.enqueue(InputEvent::ButtonPressed {
            button: ButtonId::SelectRig { rig: RigHandle(77) },
        });
        stage.enqueue(InputEvent::ButtonPressed {
            button: ButtonId::SelectRig { rig },
        });
        let mut list = DisplayList::new(800, 600);
        let out = stage.tick(16.0, &mut list);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, StageEvent::Rejected { category, .. } if category == "selection")));
        assert!(out.events.contains(&StageEvent::RigAdded {
            rig,
            source: "hero.png".into()
        }));
        assert_eq!(stage.scene().selected(), Some(rig));
        assert_eq!(stage.pending_events(), 0);
    }

    #[test]
    fn out_of_tick_events_arrive_once() {
        let mut stage = Stage::new(seeded(), MemoryAssets::new()).unwrap();
        stage.add_avatar("hero.png").unwrap();
        let mut list = DisplayList::new(800, 600);
        assert_eq!(stage.tick(16.0, &mut list).events.len(), 1);
        assert!(stage.tick(16.0, &mut list).is_empty());
    }

    #[test]
    fn clock_accumulates_dt() {
        let mut stage = Stage::new(seeded(), MemoryAssets::new()).unwrap();
        let mut list = DisplayList::new(800, 600);
        stage.tick(10.0, &mut list);
        stage.tick(-5.0, &mut list);
        stage.tick(6.5, &mut list);
        assert_eq!(stage.scene().clock_ms(), 16.5);
    }
}
