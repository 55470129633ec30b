use crate::foundation::error::{PicshadeError, PicshadeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Sampling behaviour outside a tile's bounds, per axis.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TileMode {
    /// Extend the edge pixel.
    #[default]
    Clamp,
    /// Tile the image.
    Repeat,
    /// Tile the image, reflecting every other copy.
    Mirror,
}

impl TileMode {
    /// Number of tile modes (and the exclusive upper bound of their wire values).
    pub const COUNT: u32 = 3;

    /// Stable wire value.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Clamp => 0,
            Self::Repeat => 1,
            Self::Mirror => 2,
        }
    }

    /// Parse a wire value written by [`TileMode::as_u32`].
    pub fn from_u32(v: u32) -> PicshadeResult<Self> {
        match v {
            0 => Ok(Self::Clamp),
            1 => Ok(Self::Repeat),
            2 => Ok(Self::Mirror),
            other => Err(PicshadeError::decode(format!("invalid tile mode {other}"))),
        }
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Repeat => "repeat",
            Self::Mirror => "mirror",
        }
    }

    /// Map an integer texel coordinate into `0..len`.
    ///
    /// `len` must be > 0.
    #[inline]
    pub fn tile(self, coord: i32, len: i32) -> i32 {
        debug_assert!(len > 0);
        match self {
            Self::Clamp => coord.clamp(0, len - 1),
            Self::Repeat => coord.rem_euclid(len),
            Self::Mirror => {
                let period = len.saturating_mul(2);
                let m = coord.rem_euclid(period);
                if m >= len { period - 1 - m } else { m }
            }
        }
    }
}

impl std::fmt::Display for TileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Texel filtering used by bitmap shading.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FilterQuality {
    /// Nearest-neighbour sampling.
    #[default]
    Nearest,
    /// Bilinear sampling of the four closest texels.
    Bilinear,
}

/// Integer raster size; empty when either side is <= 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ISize {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl ISize {
    /// Build a size from components.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is <= 0.
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Round a float size half-up per axis (`floor(v + 0.5)`), saturating at the `i32` range.
    pub fn round_from(size: Size) -> Self {
        fn round(v: f64) -> i32 {
            // `as` saturates and maps NaN to 0, which reads as empty.
            (v + 0.5).floor() as i32
        }
        Self {
            width: round(size.width),
            height: round(size.height),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
