//! Asset provider boundary.
//!
//! The core never touches the filesystem. Hosts implement [`AssetProvider`]
//! (or fill a [`MemoryAssets`]) and the stage asks it for identifiers and
//! decoded pixels.

use std::fmt;

use hashbrown::HashMap;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::RigError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Avatar,
    Background,
}

impl AssetCategory {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avatar => "avatar",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait AssetProvider {
    /// Ordered identifiers available in `category`.
    fn list(&self, category: AssetCategory) -> Vec<String>;

    /// Decoded RGBA pixels for `id`.
    fn load(&self, category: AssetCategory, id: &str) -> Result<RgbaImage, RigError>;
}

fn unavailable(category: AssetCategory, id: &str, reason: impl Into<String>) -> RigError {
    RigError::AssetUnavailable {
        category: category.as_str().to_string(),
        id: id.to_string(),
        reason: reason.into(),
    }
}

/// In-memory provider. Listing order is insertion order.
#[derive(Default, Debug, Clone)]
pub struct MemoryAssets {
    order: HashMap<AssetCategory, Vec<String>>,
    images: HashMap<(AssetCategory, String), RgbaImage>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register already decoded pixels. Re-inserting an id replaces its image
    /// but keeps its listing position.
    pub fn insert(&mut self, category: AssetCategory, id: impl Into<String>, image: RgbaImage) {
        let id = id.into();
        let order = self.order.entry(category).or_default();
        if !order.iter().any(|existing| *existing == id) {
            order.push(id.clone());
        }
        self.images.insert((category, id), image);
    }

    /// Decode PNG/JPEG bytes and register the result.
    pub fn insert_encoded(
        &mut self,
        category: AssetCategory,
        id: impl Into<String>,
        bytes: &[u8],
    ) -> Result<(), RigError> {
        let id = id.into();
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| unavailable(category, &id, err.to_string()))?;
        self.insert(category, id, decoded.to_rgba8());
        Ok(())
    }

    pub fn remove(&mut self, category: AssetCategory, id: &str) -> bool {
        if let Some(order) = self.order.get_mut(&category) {
            order.retain(|existing| existing != id);
        }
        self.images.remove(&(category, id.to_string())).is_some()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetProvider for MemoryAssets {
    fn list(&self, category: AssetCategory) -> Vec<String> {
        self.order.get(&category).cloned().unwrap_or_default()
    }

    fn load(&self, category: AssetCategory, id: &str) -> Result<RgbaImage, RigError> {
        self.images
            .get(&(category, id.to_string()))
            .cloned()
            .ok_or_else(|| unavailable(category, id, "not found"))
    }
}

/// Largest resize target, in pixels.
pub const MAX_SCALED_PIXELS: u64 = 4096 * 4096;

/// Load `id` and resize it to `width`×`height`.
///
/// Targets above [`MAX_SCALED_PIXELS`] are refused before any allocation.
pub fn load_scaled<A: AssetProvider + ?Sized>(
    assets: &A,
    category: AssetCategory,
    id: &str,
    width: u32,
    height: u32,
) -> Result<RgbaImage, RigError> {
    let img = assets.load(category, id)?;
    if img.width() == width && img.height() == height {
        return Ok(img);
    }
    if width == 0 || height == 0 {
        return Err(unavailable(category, id, "zero target size"));
    }
    if width as u64 * height as u64 > MAX_SCALED_PIXELS {
        return Err(unavailable(
            category,
            id,
            format!("target size {width}x{height} is too large"),
        ));
    }
    Ok(imageops::resize(&img, width, height, FilterType::Triangle))
}

/// Like [`load_scaled`], but a failure degrades to "no image" with a warning.
pub fn load_or_none<A: AssetProvider + ?Sized>(
    assets: &A,
    category: AssetCategory,
    id: &str,
    width: u32,
    height: u32,
) -> Option<RgbaImage> {
    match load_scaled(assets, category, id, width, height) {
        Ok(img) => Some(img),
        Err(err) => {
            log::warn!("{err}; rendering without an image");
            None
        }
    }
}
