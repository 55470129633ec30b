use crate::foundation::buffer::{ReadBuffer, WriteBuffer};
use crate::foundation::core::{Affine, FilterQuality};
use crate::foundation::error::PicshadeResult;
use crate::foundation::math::{NEARLY_ZERO, nearly_zero};

/// Per-draw request handed to a shader: device transform plus paint state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextRec {
    /// Transform from the shader's space to device space (before the shader's local matrix).
    pub matrix: Affine,
    /// Paint alpha, 255 = opaque.
    pub paint_alpha: u8,
    /// Texel filter.
    pub filter: FilterQuality,
}

impl ContextRec {
    /// Opaque, nearest-filtered request under `matrix`.
    pub fn new(matrix: Affine) -> Self {
        Self {
            matrix,
            paint_alpha: 255,
            filter: FilterQuality::Nearest,
        }
    }

    /// Set the paint alpha.
    pub fn with_paint_alpha(mut self, alpha: u8) -> Self {
        self.paint_alpha = alpha;
        self
    }

    /// Set the texel filter.
    pub fn with_filter(mut self, filter: FilterQuality) -> Self {
        self.filter = filter;
        self
    }
}

/// Paint state used when building an accelerated effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintState {
    /// Paint alpha, 255 = opaque.
    pub alpha: u8,
    /// Texel filter.
    pub filter: FilterQuality,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            alpha: 255,
            filter: FilterQuality::Nearest,
        }
    }
}

/// State shared by every shader kind: the optional local transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ShaderBase {
    local: Option<Affine>,
}

impl ShaderBase {
    pub(crate) fn new(local: Option<Affine>) -> Self {
        Self { local }
    }

    pub(crate) fn local_matrix(&self) -> Option<Affine> {
        self.local
    }

    pub(crate) fn set_local_matrix(&mut self, local: Option<Affine>) {
        self.local = local;
    }

    /// `matrix * local`, or `matrix` alone without a local transform.
    pub(crate) fn total_matrix(&self, matrix: Affine) -> Affine {
        match self.local {
            Some(local) => matrix * local,
            None => matrix,
        }
    }

    /// Device-to-shader transform, or `None` when the total transform is not usable.
    pub(crate) fn total_inverse(&self, matrix: Affine) -> Option<Affine> {
        let total = self.total_matrix(matrix);
        if !total.as_coeffs().iter().all(|v| v.is_finite()) {
            return None;
        }
        let det = total.determinant();
        if nearly_zero(det, NEARLY_ZERO * NEARLY_ZERO * NEARLY_ZERO) {
            return None;
        }
        let inv = total.inverse();
        inv.as_coeffs().iter().all(|v| v.is_finite()).then_some(inv)
    }

    pub(crate) fn flatten(&self, buf: &mut WriteBuffer) {
        buf.write_bool(self.local.is_some());
        if let Some(local) = self.local {
            buf.write_affine(local);
        }
    }

    pub(crate) fn unflatten(buf: &mut ReadBuffer<'_>) -> PicshadeResult<Self> {
        let local = if buf.read_bool()? {
            Some(buf.read_affine()?)
        } else {
            None
        };
        Ok(Self { local })
    }
}

impl std::fmt::Display for ShaderBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(local) = self.local {
            let [a, b, c, d, e, g] = local.as_coeffs();
            write!(f, " local matrix: [{a} {b} {c} {d} {e} {g}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/base.rs"]
mod tests;
