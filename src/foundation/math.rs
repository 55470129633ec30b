use crate::foundation::core::{Affine, Vec2};

/// Tolerance below which a scalar counts as zero.
pub(crate) const NEARLY_ZERO: f64 = 1.0 / 4096.0;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[inline]
pub(crate) fn nearly_zero(v: f64, tolerance: f64) -> bool {
    v.abs() <= tolerance
}

/// Result of decomposing the upper 2x2 of a transform as `R(rot2) * S(scale) * R(rot1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposition {
    /// First rotation, as a (cos, sin) pair.
    pub rotation1: Vec2,
    /// Scale factors along the rotated axes. Components may be negative for reflections.
    pub scale: Vec2,
    /// Second rotation, as a (cos, sin) pair.
    pub rotation2: Vec2,
}

/// Decompose the linear part of `m` by polar decomposition followed by an eigen decomposition
/// of the symmetric factor.
///
/// Returns `None` when the 2x2 part is degenerate (determinant within `NEARLY_ZERO²` of zero)
/// or not finite.
pub fn decompose_upper_2x2(m: Affine) -> Option<Decomposition> {
    let [a, c, b, d, _, _] = m.as_coeffs();
    if ![a, b, c, d].iter().all(|v| v.is_finite()) {
        return None;
    }
    if nearly_zero(a * d - b * c, NEARLY_ZERO * NEARLY_ZERO) {
        return None;
    }

    // Polar step: M = Q * S with Q a rotation and S symmetric.
    let (cos_q, sin_q, sa, sb, sd);
    if (b - c).abs() <= NEARLY_ZERO {
        cos_q = 1.0;
        sin_q = 0.0;
        sa = a;
        sb = b;
        sd = d;
    } else {
        let (cq, sq) = (a + d, c - b);
        let recip_len = 1.0 / (cq * cq + sq * sq).sqrt();
        cos_q = cq * recip_len;
        sin_q = sq * recip_len;
        sa = a * cos_q + c * sin_q;
        sb = b * cos_q + d * sin_q;
        sd = -b * sin_q + d * cos_q;
    }

    // Eigen step on S.
    let (w1, w2, cos1, sin1, cos2, sin2);
    if nearly_zero(sb, NEARLY_ZERO) {
        cos1 = 1.0;
        sin1 = 0.0;
        w1 = sa;
        w2 = sd;
        cos2 = cos_q;
        sin2 = sin_q;
    } else {
        let diff = sa - sd;
        let discriminant = (diff * diff + 4.0 * sb * sb).sqrt();
        let trace = sa + sd;
        if diff > 0.0 {
            w1 = 0.5 * (trace + discriminant);
            w2 = 0.5 * (trace - discriminant);
        } else {
            w1 = 0.5 * (trace - discriminant);
            w2 = 0.5 * (trace + discriminant);
        }

        let (c1, s1) = (sb, w1 - sa);
        let recip_len = 1.0 / (c1 * c1 + s1 * s1).sqrt();
        let (c1, s1) = (c1 * recip_len, s1 * recip_len);

        cos2 = c1 * cos_q - s1 * sin_q;
        sin2 = s1 * cos_q + c1 * sin_q;
        cos1 = c1;
        sin1 = -s1;
    }

    Some(Decomposition {
        rotation1: Vec2::new(cos1, sin1),
        scale: Vec2::new(w1, w2),
        rotation2: Vec2::new(cos2, sin2),
    })
}

/// Per-axis scale that ignores rotation coupling: `(|(sx, kx)|, |(ky, sy)|)`.
///
/// Used when [`decompose_upper_2x2`] rejects the matrix.
pub fn approx_axis_scale(m: Affine) -> Vec2 {
    let [scale_x, skew_y, skew_x, scale_y, _, _] = m.as_coeffs();
    Vec2::new(
        (scale_x * scale_x + skew_x * skew_x).sqrt(),
        (scale_y * scale_y + skew_y * skew_y).sqrt(),
    )
}

/// Rotation-invariant scale of `m`, always non-negative.
pub fn rotation_invariant_scale(m: Affine) -> Vec2 {
    match decompose_upper_2x2(m) {
        Some(dec) => Vec2::new(dec.scale.x.abs(), dec.scale.y.abs()),
        None => approx_axis_scale(m),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
