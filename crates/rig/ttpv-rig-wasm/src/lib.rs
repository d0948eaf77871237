use image::RgbaImage;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use ttpv_rig_core::{
    AnimationId, AssetCategory, AssetProvider, FrameBuffer, InputEvent, MemoryAssets,
    PlaybackMode, RigHandle, Stage, StageConfig,
};

#[wasm_bindgen]
pub struct TtpvStage {
    core: Stage<MemoryAssets>,
    frame: FrameBuffer,
}

/// Snapshot row returned by `rigs()`.
#[derive(Serialize)]
struct RigInfo<'a> {
    rig: u32,
    source: &'a str,
    x: f32,
    y: f32,
    mode: PlaybackMode,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_category(category: &str) -> Result<AssetCategory, JsError> {
    swb::from_value(JsValue::from_str(category))
        .map_err(|e| JsError::new(&format!("unknown asset category '{category}': {e}")))
}

#[wasm_bindgen]
impl TtpvStage {
    /// Create a stage. Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new TtpvStage({ view_width: 1280, view_height: 720 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TtpvStage, JsError> {
        console_error_panic_hook::set_once();

        let mut cfg: StageConfig = if jsvalue_is_undefined_or_null(&config) {
            StageConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        // No OS entropy on wasm32-unknown-unknown; seed from the JS side instead.
        if cfg.rng_seed.is_none() {
            cfg.rng_seed = Some((js_sys::Math::random() * u32::MAX as f64) as u64);
        }
        let core = Stage::new(cfg, MemoryAssets::new())
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        let (width, height) = (core.config().view_width, core.config().view_height);
        let frame = FrameBuffer::new(width, height)
            .map_err(|e| JsError::new(&format!("frame error: {e}")))?;
        Ok(TtpvStage { core, frame })
    }

    /// Register an encoded PNG/JPEG under `category` ("avatar" | "background").
    #[wasm_bindgen(js_name = add_asset)]
    pub fn add_asset(&mut self, category: &str, id: String, bytes: &[u8]) -> Result<(), JsError> {
        let category = parse_category(category)?;
        self.core
            .assets_mut()
            .insert_encoded(category, id, bytes)
            .map_err(|e| JsError::new(&format!("add_asset error: {e}")))
    }

    /// Register raw RGBA8 pixels (e.g. from `ImageData.data`).
    #[wasm_bindgen(js_name = add_asset_rgba)]
    pub fn add_asset_rgba(
        &mut self,
        category: &str,
        id: String,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<(), JsError> {
        let category = parse_category(category)?;
        let image = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
            JsError::new(&format!("add_asset_rgba: buffer does not hold {width}x{height} RGBA pixels"))
        })?;
        self.core.assets_mut().insert(category, id, image);
        Ok(())
    }

    /// Reload the background from the first listed background asset.
    #[wasm_bindgen(js_name = use_first_background)]
    pub fn use_first_background(&mut self) {
        if let Some(first) = self.core.assets().list(AssetCategory::Background).into_iter().next() {
            self.core.set_background(&first);
        }
    }

    /// Spawn a rig from an avatar asset. Returns the rig handle.
    #[wasm_bindgen(js_name = add_avatar)]
    pub fn add_avatar(&mut self, id: &str) -> Result<u32, JsError> {
        let rig = self
            .core
            .add_avatar(id)
            .map_err(|e| JsError::new(&format!("add_avatar error: {e}")))?;
        Ok(rig.0)
    }

    /// Start `animation` ("wave" | "smile" | "nod") on a rig.
    #[wasm_bindgen]
    pub fn trigger(&mut self, rig: u32, animation: &str) -> Result<(), JsError> {
        let animation: AnimationId = swb::from_value(JsValue::from_str(animation))
            .map_err(|e| JsError::new(&format!("unknown animation '{animation}': {e}")))?;
        self.core
            .trigger(RigHandle(rig), animation)
            .map_err(|e| JsError::new(&format!("trigger error: {e}")))
    }

    /// Advance by `dt_ms` with an optional array of input events. Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn tick(&mut self, dt_ms: f32, events: JsValue) -> Result<JsValue, JsError> {
        if !jsvalue_is_undefined_or_null(&events) {
            let events: Vec<InputEvent> = swb::from_value(events)
                .map_err(|e| JsError::new(&format!("events error: {e}")))?;
            self.core.enqueue_all(events);
        }
        let out = self.core.tick(dt_ms, &mut self.frame);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// RGBA8 pixels of the last rendered frame.
    #[wasm_bindgen]
    pub fn frame(&self) -> Vec<u8> {
        self.frame.to_rgba8()
    }

    /// Glyph labels of the last frame, for the host to draw as text.
    #[wasm_bindgen]
    pub fn labels(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.frame.labels()).map_err(|e| JsError::new(&format!("labels error: {e}")))
    }

    /// Current scene as JSON: rig handles, positions and playback modes.
    #[wasm_bindgen]
    pub fn rigs(&self) -> Result<JsValue, JsError> {
        let rigs: Vec<RigInfo> = self
            .core
            .scene()
            .rigs()
            .iter()
            .map(|r| RigInfo {
                rig: r.handle().0,
                source: r.source(),
                x: r.position().x,
                y: r.position().y,
                mode: r.mode(),
            })
            .collect();
        swb::to_value(&rigs).map_err(|e| JsError::new(&format!("rigs error: {e}")))
    }

    /// Nominal tick length in ms, for hosts scheduling their own loop.
    #[wasm_bindgen(getter)]
    pub fn tick_ms(&self) -> f32 {
        self.core.config().tick_ms()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.core.config().view_width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.core.config().view_height
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
