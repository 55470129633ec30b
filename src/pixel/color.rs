use crate::foundation::math::mul_div255_u8;

/// Premultiplied RGBA packed into one `u32`.
///
/// Byte `i` of the little-endian representation is channel `i` (r, g, b, a), which matches the
/// RGBA8 byte layout of rasterized tiles.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PmColor(pub u32);

impl PmColor {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);

    /// Pack already-premultiplied channels.
    #[inline]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_le_bytes([r, g, b, a]))
    }

    /// Premultiply straight-alpha channels and pack them.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a16 = u16::from(a);
        Self::from_rgba(
            mul_div255_u8(u16::from(r), a16),
            mul_div255_u8(u16::from(g), a16),
            mul_div255_u8(u16::from(b), a16),
            a,
        )
    }

    /// Pack four bytes in r, g, b, a order.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Channels in r, g, b, a order.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        self.to_bytes()[0]
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        self.to_bytes()[1]
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        self.to_bytes()[2]
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.to_bytes()[3]
    }

    /// True when every colour channel is <= alpha.
    #[inline]
    pub const fn is_premul_valid(self) -> bool {
        let [r, g, b, a] = self.to_bytes();
        r <= a && g <= a && b <= a
    }

    /// Pack into RGB565, dropping alpha (the colour is already premultiplied).
    #[inline]
    pub const fn to_rgb565(self) -> u16 {
        let [r, g, b, _] = self.to_bytes();
        ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
    }

    /// Undo premultiplication, rounding to nearest.
    pub fn to_straight_rgba8(self) -> [u8; 4] {
        let [r, g, b, a] = self.to_bytes();
        if a == 0 {
            return [0, 0, 0, 0];
        }
        let a32 = u32::from(a);
        let unpremul = |c: u8| -> u8 { ((u32::from(c) * 255 + a32 / 2) / a32).min(255) as u8 };
        [unpremul(r), unpremul(g), unpremul(b), a]
    }
}

/// Debug-only premultiplied validity check.
#[inline]
pub(crate) fn debug_assert_premul(c: PmColor) {
    debug_assert!(
        c.is_premul_valid(),
        "premultiplied colour has a channel above alpha: {:?}",
        c.to_bytes()
    );
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/color.rs"]
mod tests;
