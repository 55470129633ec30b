use crate::foundation::buffer::{ReadBuffer, WriteBuffer};
use crate::foundation::error::{PicshadeError, PicshadeResult};
use crate::pixel::color::PmColor;

/// Row-major premultiplied raster sampled by bitmap shaders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<PmColor>,
    opaque: bool,
}

impl Bitmap {
    /// Allocate a fully transparent bitmap, reporting allocation failure instead of aborting.
    pub fn try_new_transparent(width: u32, height: u32) -> PicshadeResult<Self> {
        let len = pixel_count(width, height)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|e| {
            PicshadeError::render(format!("failed to allocate {width}x{height} bitmap: {e}"))
        })?;
        pixels.resize(len, PmColor::TRANSPARENT);
        Ok(Self {
            width,
            height,
            pixels,
            opaque: false,
        })
    }

    /// Wrap existing pixels. `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<PmColor>) -> PicshadeResult<Self> {
        if pixels.len() != pixel_count(width, height)? {
            return Err(PicshadeError::validation(format!(
                "bitmap pixel count {} does not match {width}x{height}",
                pixels.len()
            )));
        }
        let opaque = !pixels.is_empty() && pixels.iter().all(|p| p.a() == 255);
        Ok(Self {
            width,
            height,
            pixels,
            opaque,
        })
    }

    /// Copy out of a `vello_cpu` pixmap (premultiplied RGBA8).
    pub(crate) fn copy_from_pixmap(&mut self, pixmap: &vello_cpu::Pixmap) -> PicshadeResult<()> {
        if u32::from(pixmap.width()) != self.width || u32::from(pixmap.height()) != self.height {
            return Err(PicshadeError::render("pixmap size mismatch"));
        }
        for (dst, px) in self
            .pixels
            .iter_mut()
            .zip(pixmap.data_as_u8_slice().chunks_exact(4))
        {
            *dst = PmColor::from_bytes([px[0], px[1], px[2], px[3]]);
        }
        self.opaque = !self.pixels.is_empty() && self.pixels.iter().all(|p| p.a() == 255);
        Ok(())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// True when every pixel has alpha 255.
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[PmColor] {
        &self.pixels
    }

    /// Pixel at an in-bounds coordinate.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> PmColor {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Pixels as tightly packed premultiplied RGBA8 bytes.
    pub fn to_rgba8_premul(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }

    pub(crate) fn flatten(&self, buf: &mut WriteBuffer) -> PicshadeResult<()> {
        buf.write_u32(self.width);
        buf.write_u32(self.height);
        buf.write_byte_array(&self.to_rgba8_premul())
    }

    pub(crate) fn unflatten(buf: &mut ReadBuffer<'_>) -> PicshadeResult<Self> {
        let width = buf.read_u32()?;
        let height = buf.read_u32()?;
        let bytes = buf.read_byte_array()?;
        if bytes.len() % 4 != 0 {
            return Err(PicshadeError::decode("bitmap byte length is not a multiple of 4"));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| PmColor::from_bytes([px[0], px[1], px[2], px[3]]))
            .collect();
        Self::from_pixels(width, height, pixels)
            .map_err(|e| PicshadeError::decode(format!("bitmap: {e}")))
    }
}

fn pixel_count(width: u32, height: u32) -> PicshadeResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| PicshadeError::validation("bitmap dimensions overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/bitmap.rs"]
mod tests;
