use crate::foundation::error::{PicshadeError, PicshadeResult};

/// Environment override for [`RasterOpts::max_tile_dim`].
pub const ENV_MAX_TILE_DIM: &str = "PICSHADE_MAX_TILE_DIM";
/// Environment override for [`RasterOpts::max_tile_bytes`].
pub const ENV_MAX_TILE_BYTES: &str = "PICSHADE_MAX_TILE_BYTES";

/// Limits applied when a picture is rasterized into a tile.
///
/// A tile that would exceed either limit is treated as an allocation failure: the shader
/// reports no bitmap rather than allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOpts {
    /// Largest tile side in pixels. Never above `u16::MAX` (the pixmap limit).
    pub max_tile_dim: u32,
    /// Largest tile allocation in bytes (4 bytes per pixel).
    pub max_tile_bytes: usize,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            max_tile_dim: u32::from(u16::MAX),
            max_tile_bytes: 256 * 1024 * 1024,
        }
    }
}

impl RasterOpts {
    /// Return options with a different side limit, capped at `u16::MAX`.
    pub fn with_max_tile_dim(mut self, dim: u32) -> Self {
        self.max_tile_dim = dim.min(u32::from(u16::MAX));
        self
    }

    /// Return options with a different byte limit.
    pub fn with_max_tile_bytes(mut self, bytes: usize) -> Self {
        self.max_tile_bytes = bytes;
        self
    }

    /// Defaults overridden by `PICSHADE_MAX_TILE_DIM` / `PICSHADE_MAX_TILE_BYTES` when set.
    pub fn from_env() -> PicshadeResult<Self> {
        let mut opts = Self::default();
        if let Some(dim) = read_env_number(ENV_MAX_TILE_DIM)? {
            opts = opts.with_max_tile_dim(u32::try_from(dim).unwrap_or(u32::MAX));
        }
        if let Some(bytes) = read_env_number(ENV_MAX_TILE_BYTES)? {
            opts = opts.with_max_tile_bytes(bytes);
        }
        Ok(opts)
    }

    /// Whether a `width x height` tile fits the limits.
    pub fn admits(&self, width: u32, height: u32) -> bool {
        if width > self.max_tile_dim || height > self.max_tile_dim {
            return false;
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .is_some_and(|bytes| bytes <= self.max_tile_bytes)
    }
}

fn read_env_number(key: &str) -> PicshadeResult<Option<usize>> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| PicshadeError::validation(format!("{key}='{v}' is not a number: {e}"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(PicshadeError::validation(format!("{key}: {e}"))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
