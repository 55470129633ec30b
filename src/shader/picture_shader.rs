use std::mem::size_of;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::foundation::buffer::{ReadBuffer, WriteBuffer};
use crate::foundation::config::RasterOpts;
use crate::foundation::core::{Affine, ISize, Size, TileMode, Vec2};
use crate::foundation::error::{PicshadeError, PicshadeResult};
use crate::foundation::math::rotation_invariant_scale;
use crate::picture::record::Picture;
use crate::picture::playback::rasterize;
use crate::shader::base::{ContextRec, PaintState, ShaderBase};
use crate::shader::bitmap_shader::BitmapShader;
use crate::shader::context::{ContextStorage, ShaderContext};
use crate::shader::effect::{AccelBackend, ImageEffect};
use crate::shader::picture_context::PictureShaderContext;
use crate::shader::{Shader, ShaderKind};

/// Counters describing how a [`PictureShader`]'s tile cache has been used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served from the cached tile.
    pub hits: u64,
    /// Times the picture was rasterized into a new tile.
    pub rasterizations: u64,
}

/// The single cached tile, keyed by the scale and local transform it was rendered for.
#[derive(Debug)]
struct CacheEntry {
    tile_scale: Vec2,
    local_matrix: Affine,
    shader: Arc<BitmapShader>,
}

/// Shader that paints a [`Picture`] as a repeating image.
///
/// The picture is rasterized into a tile at the resolution the current transform needs and then
/// sampled through a [`BitmapShader`]. The most recent tile is cached: draws that resolve to the
/// same scale and local transform reuse it without rasterizing again. One shader may be shared
/// across threads; the cache is the only mutable state and is guarded by a mutex.
pub struct PictureShader {
    picture: Arc<Picture>,
    tmx: TileMode,
    tmy: TileMode,
    base: ShaderBase,
    raster: RasterOpts,
    cache: Mutex<Option<CacheEntry>>,
    hits: AtomicU64,
    rasterizations: AtomicU64,
}

impl std::fmt::Debug for PictureShader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PictureShader")
            .field("width", &self.picture.width())
            .field("height", &self.picture.height())
            .field("tmx", &self.tmx)
            .field("tmy", &self.tmy)
            .field("local", &self.base.local_matrix())
            .field("stats", &self.cache_stats())
            .finish()
    }
}

impl PictureShader {
    /// Build a picture shader. `None` when the picture is missing or has an empty side.
    pub fn create(picture: Option<Arc<Picture>>, tmx: TileMode, tmy: TileMode) -> Option<Self> {
        Self::create_with_local_matrix(picture, tmx, tmy, None)
    }

    /// Like [`PictureShader::create`], with a local transform applied before the device matrix.
    pub fn create_with_local_matrix(
        picture: Option<Arc<Picture>>,
        tmx: TileMode,
        tmy: TileMode,
        local: Option<Affine>,
    ) -> Option<Self> {
        let picture = picture?;
        if picture.is_empty() {
            return None;
        }
        Some(Self {
            picture,
            tmx,
            tmy,
            base: ShaderBase::new(local),
            raster: RasterOpts::default(),
            cache: Mutex::new(None),
            hits: AtomicU64::new(0),
            rasterizations: AtomicU64::new(0),
        })
    }

    /// Limits applied when rasterizing tiles.
    pub fn with_raster_opts(mut self, opts: RasterOpts) -> Self {
        self.raster = opts;
        self
    }

    /// Return the shader with `local` as its local transform.
    pub fn with_local_matrix(mut self, local: Affine) -> Self {
        self.set_local_matrix(Some(local));
        self
    }

    /// Replace the local transform. The cached tile is kept and revalidated on the next draw.
    pub fn set_local_matrix(&mut self, local: Option<Affine>) {
        self.base.set_local_matrix(local);
    }

    /// The shaded picture.
    pub fn picture(&self) -> &Arc<Picture> {
        &self.picture
    }

    /// Tile modes as `(x, y)`.
    pub fn tile_modes(&self) -> (TileMode, TileMode) {
        (self.tmx, self.tmy)
    }

    /// Snapshot of the cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            rasterizations: self.rasterizations.load(Ordering::Relaxed),
        }
    }

    /// Bitmap shader for drawing under `matrix`, from the cache or freshly rasterized.
    ///
    /// `None` when the tile would be empty or cannot be allocated.
    pub fn ref_bitmap_shader(&self, matrix: Affine) -> Option<Arc<BitmapShader>> {
        let m = self.base.total_matrix(matrix);
        let scale = rotation_invariant_scale(m);
        let pic_size = Size::new(
            f64::from(self.picture.width()),
            f64::from(self.picture.height()),
        );
        let tile_size = ISize::round_from(Size::new(
            scale.x * pic_size.width,
            scale.y * pic_size.height,
        ));
        if tile_size.is_empty() {
            tracing::trace!(?scale, "picture tile collapses to nothing");
            return None;
        }
        let tile_scale = Vec2::new(
            f64::from(tile_size.width) / pic_size.width,
            f64::from(tile_size.height) / pic_size.height,
        );
        let local = self.base.local_matrix().unwrap_or(Affine::IDENTITY);

        // The slot is only ever replaced wholesale, so a poisoned lock still guards a valid entry.
        let mut slot = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = slot.as_ref()
            && entry.tile_scale == tile_scale
            && entry.local_matrix == local
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(?tile_scale, "picture tile cache hit");
            return Some(Arc::clone(&entry.shader));
        }

        tracing::debug!(
            w = tile_size.width,
            h = tile_size.height,
            sx = tile_scale.x,
            sy = tile_scale.y,
            "picture tile cache miss"
        );
        let bitmap = rasterize(&self.picture, tile_size, tile_scale, &self.raster)?;
        self.rasterizations.fetch_add(1, Ordering::Relaxed);

        let shader = Arc::new(BitmapShader::new(
            Arc::new(bitmap),
            self.tmx,
            self.tmy,
            Some(local * Affine::scale_non_uniform(1.0 / tile_scale.x, 1.0 / tile_scale.y)),
        ));
        let entry = slot.insert(CacheEntry {
            tile_scale,
            local_matrix: local,
            shader,
        });
        Some(Arc::clone(&entry.shader))
    }

    fn valid_internal(&self, rec: &ContextRec) -> Option<Arc<BitmapShader>> {
        self.base.total_inverse(rec.matrix)?;
        let bitmap_shader = self.ref_bitmap_shader(rec.matrix)?;
        bitmap_shader
            .valid_context(rec)
            .then_some(bitmap_shader)
    }

    pub(crate) fn unflatten(buf: &mut ReadBuffer<'_>) -> PicshadeResult<Self> {
        let base = ShaderBase::unflatten(buf)?;
        let tmx = TileMode::from_u32(buf.read_u32()?)?;
        let tmy = TileMode::from_u32(buf.read_u32()?)?;
        let picture = Picture::unflatten(buf)?;
        Self::create_with_local_matrix(Some(picture), tmx, tmy, base.local_matrix())
            .ok_or_else(|| PicshadeError::decode("picture shader with empty picture"))
    }
}

impl Shader for PictureShader {
    fn kind(&self) -> ShaderKind {
        ShaderKind::Picture
    }

    fn local_matrix(&self) -> Option<Affine> {
        self.base.local_matrix()
    }

    fn valid_context(&self, rec: &ContextRec) -> bool {
        self.valid_internal(rec).is_some()
    }

    fn create_context<'s>(
        &self,
        rec: &ContextRec,
        storage: &'s mut ContextStorage,
    ) -> Option<&'s mut dyn ShaderContext> {
        let bitmap_shader = self.valid_internal(rec)?;
        Some(storage.emplace(PictureShaderContext::new(rec, bitmap_shader)))
    }

    fn context_size(&self) -> usize {
        size_of::<PictureShaderContext>()
    }

    fn flatten(&self, buf: &mut WriteBuffer) -> PicshadeResult<()> {
        self.base.flatten(buf);
        buf.write_u32(self.tmx.as_u32());
        buf.write_u32(self.tmy.as_u32());
        self.picture.flatten(buf)
    }

    fn as_new_effect(&self, backend: &dyn AccelBackend, paint: &PaintState) -> Option<ImageEffect> {
        self.ref_bitmap_shader(backend.matrix())?
            .as_new_effect(backend, paint)
    }
}

impl std::fmt::Display for PictureShader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PictureShader: [{}:{}] ({}, {})",
            self.picture.width(),
            self.picture.height(),
            self.tmx,
            self.tmy
        )?;
        std::fmt::Display::fmt(&self.base, f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/picture_shader.rs"]
mod tests;
