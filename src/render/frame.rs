use std::path::Path;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::foundation::error::{PicshadeError, PicshadeResult};
use crate::pixel::color::PmColor;
use crate::shader::Shader;
use crate::shader::base::ContextRec;
use crate::shader::context::ContextStorage;

/// A shaded frame as tightly packed RGBA8 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8.
    pub data: Vec<u8>,
    /// Whether `data` holds premultiplied colour.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixels with alpha divided back out.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        self.data
            .chunks_exact(4)
            .flat_map(|px| PmColor::from_bytes([px[0], px[1], px[2], px[3]]).to_straight_rgba8())
            .collect()
    }

    /// Write the frame as a straight-alpha PNG.
    pub fn save_png(&self, path: &Path) -> PicshadeResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// How [`shade_frame`] spreads rows over threads.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Shade rows on a rayon pool.
    pub parallel: bool,
    /// Rows handed to a worker at a time.
    pub chunk_size: usize,
    /// Pool size; rayon's default when unset.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

/// Shade a `width x height` frame through `shader`, one span per row.
///
/// Each worker owns its own context storage, so one shader (and its tile cache) is shared by all
/// of them.
#[tracing::instrument(level = "debug", skip(shader, threading), fields(parallel = threading.parallel))]
pub fn shade_frame(
    shader: &dyn Shader,
    rec: &ContextRec,
    width: u32,
    height: u32,
    threading: &RenderThreading,
) -> PicshadeResult<FrameRGBA> {
    if width == 0 || height == 0 {
        return Err(PicshadeError::validation(format!(
            "frame size must be non-zero, got {width}x{height}"
        )));
    }
    if !shader.valid_context(rec) {
        return Err(PicshadeError::render(
            "shader cannot produce a context for this transform",
        ));
    }

    let row_bytes = width as usize * 4;
    let mut data = vec![0u8; row_bytes * height as usize];

    if !threading.parallel {
        let mut worker = RowWorker::new(shader, rec, width);
        for (y, out) in data.chunks_exact_mut(row_bytes).enumerate() {
            worker.shade_row(y as i32, out)?;
        }
    } else {
        let pool = build_thread_pool(threading.threads)?;
        let rows_per_chunk = threading.chunk_size.max(1);
        pool.install(|| {
            data.par_chunks_mut(row_bytes * rows_per_chunk)
                .enumerate()
                .map_init(
                    || RowWorker::new(shader, rec, width),
                    |worker, (chunk_idx, chunk)| -> PicshadeResult<()> {
                        let y0 = chunk_idx * rows_per_chunk;
                        for (i, out) in chunk.chunks_exact_mut(row_bytes).enumerate() {
                            worker.shade_row((y0 + i) as i32, out)?;
                        }
                        Ok(())
                    },
                )
                .collect::<PicshadeResult<()>>()
        })?;
    }

    Ok(FrameRGBA {
        width,
        height,
        data,
        premultiplied: true,
    })
}

/// Per-thread shading state: a live context and a span buffer.
struct RowWorker {
    storage: ContextStorage,
    span: Vec<PmColor>,
}

impl RowWorker {
    fn new(shader: &dyn Shader, rec: &ContextRec, width: u32) -> Self {
        let mut storage = ContextStorage::with_capacity(shader.context_size());
        // A refusal leaves the slot empty and surfaces from `shade_row`.
        let _ = shader.create_context(rec, &mut storage);
        Self {
            storage,
            span: vec![PmColor::TRANSPARENT; width as usize],
        }
    }

    fn shade_row(&mut self, y: i32, out: &mut [u8]) -> PicshadeResult<()> {
        let ctx = self
            .storage
            .get_mut()
            .ok_or_else(|| PicshadeError::render("shader context creation failed"))?;
        ctx.shade_span(0, y, &mut self.span);
        for (dst, px) in out.chunks_exact_mut(4).zip(&self.span) {
            dst.copy_from_slice(&px.to_bytes());
        }
        Ok(())
    }
}

fn build_thread_pool(threads: Option<usize>) -> PicshadeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PicshadeError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PicshadeError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
