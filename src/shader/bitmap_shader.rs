use std::mem::size_of;
use std::sync::Arc;

use crate::foundation::buffer::{ReadBuffer, WriteBuffer};
use crate::foundation::core::{Affine, FilterQuality, Point, TileMode};
use crate::foundation::error::PicshadeResult;
use crate::pixel::color::PmColor;
use crate::pixel::pm_float::PmFloat;
use crate::render::bitmap::Bitmap;
use crate::shader::base::{ContextRec, PaintState, ShaderBase};
use crate::shader::context::{ContextStorage, ShadeProc, ShaderContext, ShaderFlags};
use crate::shader::effect::{AccelBackend, ImageEffect};
use crate::shader::{Shader, ShaderKind};

/// Shader that samples a premultiplied bitmap, tiled per axis.
#[derive(Clone, Debug)]
pub struct BitmapShader {
    bitmap: Arc<Bitmap>,
    tmx: TileMode,
    tmy: TileMode,
    base: ShaderBase,
}

impl BitmapShader {
    /// Sample `bitmap` with the given tile modes, mapped through `local` first when present.
    pub fn new(bitmap: Arc<Bitmap>, tmx: TileMode, tmy: TileMode, local: Option<Affine>) -> Self {
        Self {
            bitmap,
            tmx,
            tmy,
            base: ShaderBase::new(local),
        }
    }

    /// The sampled bitmap.
    pub fn bitmap(&self) -> &Arc<Bitmap> {
        &self.bitmap
    }

    /// Tile modes as `(x, y)`.
    pub fn tile_modes(&self) -> (TileMode, TileMode) {
        (self.tmx, self.tmy)
    }

    pub(crate) fn unflatten(buf: &mut ReadBuffer<'_>) -> PicshadeResult<Self> {
        let base = ShaderBase::unflatten(buf)?;
        let tmx = TileMode::from_u32(buf.read_u32()?)?;
        let tmy = TileMode::from_u32(buf.read_u32()?)?;
        let bitmap = Bitmap::unflatten(buf)?;
        Ok(Self {
            bitmap: Arc::new(bitmap),
            tmx,
            tmy,
            base,
        })
    }

    fn sampler(&self, inverse: Affine, alpha: u8) -> Sampler {
        Sampler {
            bitmap: Arc::clone(&self.bitmap),
            tmx: self.tmx,
            tmy: self.tmy,
            inverse,
            alpha,
        }
    }
}

impl Shader for BitmapShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::Bitmap
    }

    fn local_matrix(&self) -> Option<Affine> {
        self.base.local_matrix()
    }

    fn valid_context(&self, rec: &ContextRec) -> bool {
        !self.bitmap.is_empty() && self.base.total_inverse(rec.matrix).is_some()
    }

    fn create_context<'s>(
        &self,
        rec: &ContextRec,
        storage: &'s mut ContextStorage,
    ) -> Option<&'s mut dyn ShaderContext> {
        if self.bitmap.is_empty() {
            return None;
        }
        let inverse = self.base.total_inverse(rec.matrix)?;
        let sampler = self.sampler(inverse, rec.paint_alpha);
        let ctx = match rec.filter {
            FilterQuality::Nearest if is_translate_only(inverse) => {
                storage.emplace(TranslateContext::new(sampler))
            }
            FilterQuality::Nearest => storage.emplace(NearestContext { sampler }),
            FilterQuality::Bilinear => storage.emplace(BilinearContext { sampler }),
        };
        Some(ctx)
    }

    fn context_size(&self) -> usize {
        size_of::<TranslateContext>()
            .max(size_of::<NearestContext>())
            .max(size_of::<BilinearContext>())
    }

    fn flatten(&self, buf: &mut WriteBuffer) -> PicshadeResult<()> {
        self.base.flatten(buf);
        buf.write_u32(self.tmx.as_u32());
        buf.write_u32(self.tmy.as_u32());
        self.bitmap.flatten(buf)
    }

    fn as_new_effect(&self, backend: &dyn AccelBackend, paint: &PaintState) -> Option<ImageEffect> {
        let max = backend.max_texture_dim();
        if self.bitmap.is_empty() || self.bitmap.width() > max || self.bitmap.height() > max {
            return None;
        }
        let device_to_texel = self.base.total_inverse(backend.matrix())?;
        Some(ImageEffect {
            bitmap: Arc::clone(&self.bitmap),
            tile_modes: (self.tmx, self.tmy),
            filter: paint.filter,
            alpha: paint.alpha,
            device_to_texel,
        })
    }
}

fn is_translate_only(m: Affine) -> bool {
    let [a, b, c, d, _, _] = m.as_coeffs();
    a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0
}

/// Everything a context needs to read texels: the bitmap, its tiling and the device inverse.
#[derive(Debug)]
struct Sampler {
    bitmap: Arc<Bitmap>,
    tmx: TileMode,
    tmy: TileMode,
    inverse: Affine,
    alpha: u8,
}

impl Sampler {
    #[inline]
    fn texel(&self, tx: i32, ty: i32) -> PmColor {
        let (w, h) = (self.bitmap.width() as i32, self.bitmap.height() as i32);
        let x = self.tmx.tile(tx, w);
        let y = self.tmy.tile(ty, h);
        self.bitmap.pixel(x as u32, y as u32)
    }

    /// Shader-space position of the centre of device pixel `(x, y)`.
    #[inline]
    fn map_center(&self, x: i32, y: i32) -> Point {
        self.inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
    }

    fn flags(&self) -> ShaderFlags {
        let mut flags = ShaderFlags::HAS_SPAN16;
        if self.bitmap.is_opaque() && self.alpha == 255 {
            flags |= ShaderFlags::OPAQUE_ALPHA;
        }
        flags
    }

    /// Scale every colour in `dst` by the paint alpha.
    fn modulate(&self, dst: &mut [PmColor]) {
        if self.alpha == 255 {
            return;
        }
        let k = f32::from(self.alpha) / 255.0;
        let mut chunks = dst.chunks_exact_mut(4);
        for chunk in &mut chunks {
            let quad = [chunk[0], chunk[1], chunk[2], chunk[3]];
            let wide = PmFloat::from_4_pm_colors(&quad).map(|c| c * k);
            chunk.copy_from_slice(&PmFloat::to_4_pm_colors(&wide));
        }
        for c in chunks.into_remainder() {
            *c = (PmFloat::from_pm_color(*c) * k).get();
        }
    }
}

/// Nearest sampling when the device inverse is a pure translation: texels advance one per pixel.
#[derive(Debug)]
struct TranslateContext {
    sampler: Sampler,
    dx: i32,
    dy: i32,
}

impl TranslateContext {
    fn new(sampler: Sampler) -> Self {
        let [_, _, _, _, e, f] = sampler.inverse.as_coeffs();
        // floor(x + 0.5 + e) == x + floor(e + 0.5) for integer x.
        Self {
            dx: (e + 0.5).floor() as i32,
            dy: (f + 0.5).floor() as i32,
            sampler,
        }
    }

    fn shade(&self, x: i32, y: i32, dst: &mut [PmColor]) {
        let ty = y.saturating_add(self.dy);
        let tx0 = x.saturating_add(self.dx);
        for (i, d) in dst.iter_mut().enumerate() {
            *d = self.sampler.texel(tx0.saturating_add(i as i32), ty);
        }
        self.sampler.modulate(dst);
    }
}

impl ShaderContext for TranslateContext {
    fn flags(&self) -> ShaderFlags {
        self.sampler.flags()
    }

    fn shade_proc(&self) -> Option<ShadeProc<'_>> {
        Some(Box::new(move |x, y, dst| self.shade(x, y, dst)))
    }

    fn shade_span(&mut self, x: i32, y: i32, dst: &mut [PmColor]) {
        self.shade(x, y, dst);
    }
}

#[derive(Debug)]
struct NearestContext {
    sampler: Sampler,
}

impl ShaderContext for NearestContext {
    fn flags(&self) -> ShaderFlags {
        self.sampler.flags()
    }

    fn shade_span(&mut self, x: i32, y: i32, dst: &mut [PmColor]) {
        for (i, d) in dst.iter_mut().enumerate() {
            let p = self.sampler.map_center(x.saturating_add(i as i32), y);
            *d = self
                .sampler
                .texel(p.x.floor() as i32, p.y.floor() as i32);
        }
        self.sampler.modulate(dst);
    }
}

#[derive(Debug)]
struct BilinearContext {
    sampler: Sampler,
}

impl BilinearContext {
    fn sample(&self, p: Point) -> PmColor {
        // Texel centres sit at half-integers.
        let (fx, fy) = (p.x - 0.5, p.y - 0.5);
        let (x0, y0) = (fx.floor(), fy.floor());
        let (wx, wy) = ((fx - x0) as f32, (fy - y0) as f32);
        let (x0, y0) = (x0 as i32, y0 as i32);
        let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

        let s = &self.sampler;
        let [c00, c10, c01, c11] = PmFloat::from_4_pm_colors(&[
            s.texel(x0, y0),
            s.texel(x1, y0),
            s.texel(x0, y1),
            s.texel(x1, y1),
        ]);
        let mixed = c00 * ((1.0 - wx) * (1.0 - wy))
            + c10 * (wx * (1.0 - wy))
            + c01 * ((1.0 - wx) * wy)
            + c11 * (wx * wy);
        mixed.clamped()
    }
}

impl ShaderContext for BilinearContext {
    fn flags(&self) -> ShaderFlags {
        self.sampler.flags()
    }

    fn shade_span(&mut self, x: i32, y: i32, dst: &mut [PmColor]) {
        for (i, d) in dst.iter_mut().enumerate() {
            *d = self.sample(self.sampler.map_center(x.saturating_add(i as i32), y));
        }
        self.sampler.modulate(dst);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/bitmap_shader.rs"]
mod tests;
