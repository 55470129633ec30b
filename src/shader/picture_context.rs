use std::sync::Arc;

use crate::pixel::color::PmColor;
use crate::shader::Shader;
use crate::shader::base::ContextRec;
use crate::shader::bitmap_shader::BitmapShader;
use crate::shader::context::{ContextStorage, ShadeProc, ShaderContext, ShaderFlags};

/// Per-draw context of a picture shader: forwards everything to the context of the cached
/// bitmap shader, which it keeps alive.
#[derive(Debug)]
pub struct PictureShaderContext {
    bitmap_shader: Arc<BitmapShader>,
    storage: ContextStorage,
}

impl PictureShaderContext {
    /// `rec` must already be validated against `bitmap_shader`.
    pub(crate) fn new(rec: &ContextRec, bitmap_shader: Arc<BitmapShader>) -> Self {
        let mut storage = ContextStorage::with_capacity(bitmap_shader.context_size());
        let created = bitmap_shader.create_context(rec, &mut storage).is_some();
        debug_assert!(created, "validated bitmap shader refused to create a context");
        Self {
            bitmap_shader,
            storage,
        }
    }

    /// The bitmap shader whose context is wrapped.
    pub fn bitmap_shader(&self) -> &Arc<BitmapShader> {
        &self.bitmap_shader
    }
}

impl ShaderContext for PictureShaderContext {
    fn flags(&self) -> ShaderFlags {
        self.storage
            .get()
            .map(|ctx| ctx.flags())
            .unwrap_or_default()
    }

    fn shade_proc(&self) -> Option<ShadeProc<'_>> {
        self.storage.get()?.shade_proc()
    }

    fn shade_span(&mut self, x: i32, y: i32, dst: &mut [PmColor]) {
        match self.storage.get_mut() {
            Some(ctx) => ctx.shade_span(x, y, dst),
            None => dst.fill(PmColor::TRANSPARENT),
        }
    }

    fn shade_span16(&mut self, x: i32, y: i32, dst: &mut [u16]) {
        match self.storage.get_mut() {
            Some(ctx) => ctx.shade_span16(x, y, dst),
            None => dst.fill(0),
        }
    }
}

impl Drop for PictureShaderContext {
    fn drop(&mut self) {
        // Wrapped context first; the storage and the shader reference go with the fields.
        self.storage.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/picture_context.rs"]
mod tests;
