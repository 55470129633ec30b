//! Shading protocol and the shaders that implement it.

pub(crate) mod base;
pub(crate) mod bitmap_shader;
pub(crate) mod context;
pub(crate) mod effect;
pub(crate) mod picture_context;
pub(crate) mod picture_shader;

use std::sync::Arc;

use crate::foundation::buffer::{ReadBuffer, WriteBuffer};
use crate::foundation::core::Affine;
use crate::foundation::error::{PicshadeError, PicshadeResult};

use self::base::{ContextRec, PaintState};
use self::bitmap_shader::BitmapShader;
use self::context::{ContextStorage, ShaderContext};
use self::effect::{AccelBackend, ImageEffect};
use self::picture_shader::PictureShader;

/// Wire tag identifying a shader implementation in serialized form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// [`BitmapShader`].
    Bitmap,
    /// [`PictureShader`].
    Picture,
}

impl ShaderKind {
    /// Stable wire value.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Bitmap => 1,
            Self::Picture => 2,
        }
    }

    /// Parse a wire value.
    pub fn from_u32(v: u32) -> PicshadeResult<Self> {
        match v {
            1 => Ok(Self::Bitmap),
            2 => Ok(Self::Picture),
            other => Err(PicshadeError::decode(format!("unknown shader kind {other}"))),
        }
    }
}

/// A source of colours for painting.
///
/// Shading a draw goes through [`Shader::create_context`], which places a [`ShaderContext`] into
/// caller-owned [`ContextStorage`] of at least [`Shader::context_size`] bytes. Failure to shade is
/// an absent result.
pub trait Shader: Send + Sync + std::fmt::Debug {
    /// Wire tag of this implementation.
    fn kind(&self) -> ShaderKind;

    /// Optional transform applied before the device matrix.
    fn local_matrix(&self) -> Option<Affine>;

    /// Whether a context can be created for `rec`.
    fn valid_context(&self, rec: &ContextRec) -> bool;

    /// Construct a context for `rec` into `storage`.
    fn create_context<'s>(
        &self,
        rec: &ContextRec,
        storage: &'s mut ContextStorage,
    ) -> Option<&'s mut dyn ShaderContext>;

    /// Upper bound, in bytes, of any context this shader places in storage.
    fn context_size(&self) -> usize;

    /// Write the shader's serialized form, without the kind tag.
    fn flatten(&self, buf: &mut WriteBuffer) -> PicshadeResult<()>;

    /// Describe this shader as an accelerated image effect.
    fn as_new_effect(&self, backend: &dyn AccelBackend, paint: &PaintState) -> Option<ImageEffect>;
}

/// Serialize any shader, prefixed with its kind tag.
pub fn serialize_shader(shader: &dyn Shader) -> PicshadeResult<Vec<u8>> {
    let mut buf = WriteBuffer::new();
    buf.write_u32(shader.kind().as_u32());
    shader.flatten(&mut buf)?;
    Ok(buf.into_bytes())
}

/// Rebuild a shader written by [`serialize_shader`]. Trailing bytes are an error.
pub fn deserialize_shader(bytes: &[u8]) -> PicshadeResult<Arc<dyn Shader>> {
    let mut buf = ReadBuffer::new(bytes);
    let shader: Arc<dyn Shader> = match ShaderKind::from_u32(buf.read_u32()?)? {
        ShaderKind::Bitmap => Arc::new(BitmapShader::unflatten(&mut buf)?),
        ShaderKind::Picture => Arc::new(PictureShader::unflatten(&mut buf)?),
    };
    if buf.remaining() != 0 {
        return Err(PicshadeError::decode(format!(
            "{} trailing bytes after shader",
            buf.remaining()
        )));
    }
    Ok(shader)
}

#[cfg(test)]
#[path = "../../tests/unit/shader/mod.rs"]
mod tests;
