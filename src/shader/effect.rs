use std::sync::Arc;

use crate::foundation::core::{Affine, FilterQuality, TileMode};
use crate::render::bitmap::Bitmap;

/// Accelerated drawing backend that can consume image effects instead of shading spans.
pub trait AccelBackend {
    /// Current device transform.
    fn matrix(&self) -> Affine;

    /// Largest texture side the backend accepts.
    fn max_texture_dim(&self) -> u32 {
        u32::from(u16::MAX)
    }
}

/// Backend-neutral description of a textured draw.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageEffect {
    /// Texture contents.
    pub bitmap: Arc<Bitmap>,
    /// Tile mode per axis.
    pub tile_modes: (TileMode, TileMode),
    /// Texture filter.
    pub filter: FilterQuality,
    /// Paint alpha to modulate with.
    pub alpha: u8,
    /// Device space to texel space.
    pub device_to_texel: Affine,
}
