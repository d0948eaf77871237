use glam::Vec2;
use image::RgbaImage;
use ttpv_rig_core::{
    AnimationId, AssetCategory, DisplayList, MemoryAssets, PartName, PlaybackMode, PosePreset,
    RigError, RigHandle, Stage, StageConfig, StageEvent,
};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn stage_with_rig() -> (Stage, RigHandle, DisplayList) {
    let cfg = StageConfig {
        rng_seed: Some(11),
        ..Default::default()
    };
    let mut assets = MemoryAssets::new();
    assets.insert(AssetCategory::Avatar, "hero.png", RgbaImage::new(16, 16));
    let mut stage = Stage::new(cfg, assets).unwrap();
    let rig = stage.add_avatar("hero.png").unwrap();
    (stage, rig, DisplayList::new(800, 600))
}

fn angle(stage: &Stage, rig: RigHandle, part: PartName) -> f32 {
    stage.scene().rig(rig).unwrap().angle(part)
}

fn mode(stage: &Stage, rig: RigHandle) -> PlaybackMode {
    stage.scene().rig(rig).unwrap().mode()
}

#[test]
fn every_animation_returns_to_neutral_at_its_duration() {
    for id in AnimationId::ALL {
        let (mut stage, rig, mut list) = stage_with_rig();
        let duration = stage.library().get(id).duration_ms;
        stage.trigger(rig, id).unwrap();

        let mut finished = false;
        let mut elapsed = 0.0;
        while elapsed < duration {
            elapsed += 16.0;
            let out = stage.tick(16.0, &mut list);
            finished |= out.events.contains(&StageEvent::AnimationFinished { rig, animation: id });
        }
        assert!(finished, "{id} never reported completion");

        let r = stage.scene().rig(rig).unwrap();
        assert_eq!(r.mode(), PlaybackMode::Idle, "{id}");
        assert!(r.parts().iter().all(|p| p.angle == 0.0), "{id}");
        assert_eq!(r.render_offset(), Vec2::ZERO, "{id}");
    }
}

#[test]
fn wave_frame_zero_and_three() {
    let (mut stage, rig, mut list) = stage_with_rig();
    stage.trigger(rig, AnimationId::Wave).unwrap();

    stage.tick(16.0, &mut list);
    assert!(approx(angle(&stage, rig, PartName::RightArm), -90.0, 1e-4));
    assert!(approx(angle(&stage, rig, PartName::Head), 0.0, 1e-4));

    // Frame 3 covers [600, 800).
    stage.tick(600.0, &mut list);
    let frame = stage
        .scene()
        .rig(rig)
        .unwrap()
        .playback()
        .current_frame(stage.library());
    assert_eq!(frame, Some(3));
    assert!(approx(angle(&stage, rig, PartName::Head), 0.0, 1e-4));
    assert!(approx(angle(&stage, rig, PartName::RightArm), -90.0, 1e-3));
}

#[test]
fn wave_zeroes_a_previous_pose() {
    let (mut stage, rig, mut list) = stage_with_rig();
    stage.apply_pose(rig, PosePreset::Slouch).unwrap();
    assert_eq!(angle(&stage, rig, PartName::LeftLeg), -5.0);
    stage.trigger(rig, AnimationId::Wave).unwrap();
    stage.tick(16.0, &mut list);
    for part in [PartName::Body, PartName::LeftArm, PartName::LeftLeg, PartName::RightLeg, PartName::Neck] {
        assert_eq!(angle(&stage, rig, part), 0.0, "{part}");
    }
}

#[test]
fn nod_stays_non_negative_and_peaks_mid_way() {
    let (mut stage, rig, mut list) = stage_with_rig();
    stage.trigger(rig, AnimationId::Nod).unwrap();
    let mut peak: f32 = 0.0;
    for _ in 0..130 {
        stage.tick(16.0, &mut list);
        let head = angle(&stage, rig, PartName::Head);
        let neck = angle(&stage, rig, PartName::Neck);
        assert!(head >= 0.0 && head <= 20.0, "head {head}");
        assert!(approx(neck, head / 2.0, 1e-4));
        peak = peak.max(head);
    }
    assert!(approx(peak, 40.0 / 3.0, 1e-3), "peak {peak}");
    assert_eq!(mode(&stage, rig), PlaybackMode::Idle);
}

#[test]
fn smile_jitters_within_two_pixels() {
    let (mut stage, rig, mut list) = stage_with_rig();
    stage.trigger(rig, AnimationId::Smile).unwrap();
    for _ in 0..4 {
        stage.tick(200.0 - 1.0, &mut list);
        let offset = stage.scene().rig(rig).unwrap().render_offset();
        assert_eq!(offset.x, offset.y);
        assert!(offset.x.abs() <= 2.0);
    }
}

#[test]
fn breathing_and_animation_are_exclusive() {
    let (mut stage, rig, mut list) = stage_with_rig();
    stage.apply_pose(rig, PosePreset::Breathe).unwrap();
    stage.tick(750.0, &mut list);
    assert_eq!(mode(&stage, rig), PlaybackMode::Breathing);
    assert!(approx(angle(&stage, rig, PartName::LeftArm), 2.0, 1e-3));

    stage.trigger(rig, AnimationId::Smile).unwrap();
    let r = stage.scene().rig(rig).unwrap();
    assert!(!r.playback().is_breathing());
    assert_eq!(r.playback().current_animation(), Some(AnimationId::Smile));

    for _ in 0..60 {
        stage.tick(16.0, &mut list);
        assert!(!stage.scene().rig(rig).unwrap().playback().is_breathing());
    }
    assert_eq!(mode(&stage, rig), PlaybackMode::Idle);
    // Breathing does not come back on its own.
    stage.tick(750.0, &mut list);
    assert_eq!(angle(&stage, rig, PartName::LeftArm), 0.0);
}

#[test]
fn breathing_cannot_start_mid_animation() {
    let (mut stage, rig, _) = stage_with_rig();
    stage.trigger(rig, AnimationId::Nod).unwrap();
    let err = stage
        .scene_mut()
        .rig_mut(rig)
        .unwrap()
        .enable_breathing()
        .unwrap_err();
    assert!(matches!(err, RigError::InvalidTransition { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn retrigger_restarts_from_zero() {
    let (mut stage, rig, mut list) = stage_with_rig();
    stage.trigger(rig, AnimationId::Wave).unwrap();
    stage.tick(1000.0, &mut list);
    stage.trigger(rig, AnimationId::Wave).unwrap();
    stage.tick(16.0, &mut list);
    assert!(approx(angle(&stage, rig, PartName::RightArm), -90.0, 1e-4));
    // The first run would have finished by now; the restart keeps playing.
    stage.tick(400.0, &mut list);
    assert!(matches!(mode(&stage, rig), PlaybackMode::Playing { .. }));
}

#[test]
fn stand_preset_cancels_everything() {
    let (mut stage, rig, mut list) = stage_with_rig();
    stage.trigger(rig, AnimationId::Wave).unwrap();
    stage.tick(16.0, &mut list);
    stage.apply_pose(rig, PosePreset::Stand).unwrap();
    let r = stage.scene().rig(rig).unwrap();
    assert_eq!(r.mode(), PlaybackMode::Idle);
    assert!(r.parts().iter().all(|p| p.angle == 0.0));
}
