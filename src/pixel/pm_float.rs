//! Four-lane float form of premultiplied colours.
//!
//! `PmFloat` widens a packed [`PmColor`] into one `f32` lane per channel so filtering and
//! modulation can run in float, then narrows back with one of three explicit policies:
//!
//! - [`PmFloat::trunc`]: truncate, no bias.
//! - [`PmFloat::get`]: add 0.5 then truncate (round half up). Lanes must already be in range.
//! - [`PmFloat::clamped`]: round like `get`, then saturate every lane to `[0, 255]`.
//!
//! The 4-wide batch helpers produce exactly the results of four scalar calls.

use std::ops::{Add, Mul};

use crate::pixel::color::{PmColor, debug_assert_premul};

/// Premultiplied colour as four `f32` lanes in r, g, b, a order, each nominally in `[0, 255]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PmFloat([f32; 4]);

impl PmFloat {
    /// Build from raw lanes. Lanes may be out of range; only [`PmFloat::clamped`] tolerates that.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Build from a raw lane array.
    #[inline]
    pub const fn from_lanes(lanes: [f32; 4]) -> Self {
        Self(lanes)
    }

    /// The raw lanes.
    #[inline]
    pub const fn lanes(self) -> [f32; 4] {
        self.0
    }

    /// Alpha lane.
    #[inline]
    pub const fn a(self) -> f32 {
        self.0[3]
    }

    /// Exact widen of a packed colour.
    #[inline]
    pub fn from_pm_color(c: PmColor) -> Self {
        debug_assert_premul(c);
        let [r, g, b, a] = c.to_bytes();
        Self([f32::from(r), f32::from(g), f32::from(b), f32::from(a)])
    }

    /// Lanes in `[0, 255]` with every colour lane <= alpha.
    pub fn is_valid(self) -> bool {
        let a = self.0[3];
        (0.0..=255.0).contains(&a) && self.0[..3].iter().all(|&c| (0.0..=a).contains(&c))
    }

    /// Narrow by truncation toward zero, keeping the low byte of each lane.
    #[inline]
    pub fn trunc(self) -> PmColor {
        let c = self.narrow();
        debug_assert_premul(c);
        c
    }

    /// Round half up and narrow. Lanes are expected to be in range already; lanes that are not
    /// wrap through their low byte and the result is unspecified.
    #[inline]
    pub fn get(self) -> PmColor {
        let rounded = self + HALF;
        if self.is_valid() {
            rounded.trunc()
        } else {
            rounded.narrow()
        }
    }

    #[inline]
    fn narrow(self) -> PmColor {
        PmColor::from_bytes(self.0.map(|l| l as i32 as u8))
    }

    /// Round half up and saturate each lane to `[0, 255]`.
    #[inline]
    pub fn clamped(self) -> PmColor {
        let c = PmColor::from_bytes(self.0.map(round_saturate));
        debug_assert_premul(c);
        c
    }

    /// Widen four packed colours.
    pub fn from_4_pm_colors(colors: &[PmColor; 4]) -> [PmFloat; 4] {
        colors.map(Self::from_pm_color)
    }

    /// [`PmFloat::get`] applied to four colours.
    pub fn to_4_pm_colors(colors: &[PmFloat; 4]) -> [PmColor; 4] {
        colors.map(Self::get)
    }

    /// [`PmFloat::clamped`] applied to four colours, run as one pass over all 16 lanes.
    pub fn clamp_to_4_pm_colors(colors: &[PmFloat; 4]) -> [PmColor; 4] {
        let mut lanes = [0.0f32; 16];
        for (dst, src) in lanes.chunks_exact_mut(4).zip(colors) {
            dst.copy_from_slice(&src.0);
        }
        let bytes = lanes.map(round_saturate);

        let mut out = [PmColor::TRANSPARENT; 4];
        for (dst, px) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *dst = PmColor::from_bytes([px[0], px[1], px[2], px[3]]);
            debug_assert_premul(*dst);
        }
        out
    }
}

const HALF: PmFloat = PmFloat([0.5; 4]);

#[inline]
fn round_saturate(lane: f32) -> u8 {
    ((lane + 0.5) as i32).clamp(0, 255) as u8
}

impl Add for PmFloat {
    type Output = PmFloat;

    #[inline]
    fn add(self, rhs: PmFloat) -> PmFloat {
        let [a, b] = [self.0, rhs.0];
        PmFloat([a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]])
    }
}

impl Mul<f32> for PmFloat {
    type Output = PmFloat;

    #[inline]
    fn mul(self, k: f32) -> PmFloat {
        PmFloat(self.0.map(|l| l * k))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/pm_float.rs"]
mod tests;
