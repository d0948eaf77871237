use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use std::hint::black_box;
use ttpv_rig_core::{
    AnimationId, AssetCategory, DisplayList, FrameBuffer, MemoryAssets, PosePreset, Stage,
    StageConfig,
};

fn full_stage() -> Stage {
    let mut assets = MemoryAssets::new();
    assets.insert(
        AssetCategory::Background,
        "bg.png",
        RgbaImage::from_pixel(64, 48, Rgba([90, 140, 200, 255])),
    );
    for i in 0..4 {
        assets.insert(
            AssetCategory::Avatar,
            format!("a{i}.png"),
            RgbaImage::from_pixel(32, 32, Rgba([220, 180, 150, 200])),
        );
    }
    let cfg = StageConfig {
        rng_seed: Some(0),
        ..Default::default()
    };
    let mut stage = Stage::new(cfg, assets).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| stage.add_avatar(&format!("a{i}.png")).unwrap())
        .collect();
    stage.trigger(handles[0], AnimationId::Wave).unwrap();
    stage.trigger(handles[1], AnimationId::Nod).unwrap();
    stage.trigger(handles[2], AnimationId::Smile).unwrap();
    stage.apply_pose(handles[3], PosePreset::Breathe).unwrap();
    stage
}

fn tick_benchmark(c: &mut Criterion) {
    c.bench_function("tick_four_rigs_display_list", |b| {
        let mut stage = full_stage();
        let dt = stage.config().tick_ms();
        let mut list = DisplayList::new(800, 600);
        b.iter(|| {
            black_box(stage.tick(black_box(dt), &mut list).events.len());
        })
    });

    c.bench_function("tick_four_rigs_framebuffer", |b| {
        let mut stage = full_stage();
        let dt = stage.config().tick_ms();
        let mut fb = FrameBuffer::new(800, 600).unwrap();
        b.iter(|| {
            black_box(stage.tick(black_box(dt), &mut fb).events.len());
        })
    });
}

criterion_group!(benches, tick_benchmark);
criterion_main!(benches);
