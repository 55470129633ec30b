//! Little-endian byte buffers used to flatten shaders and pictures.

use crate::foundation::core::Affine;
use crate::foundation::error::{PicshadeError, PicshadeResult};

/// Append-only writer for flattened objects.
#[derive(Clone, Debug, Default)]
pub struct WriteBuffer {
    bytes: Vec<u8>,
}

impl WriteBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a `u32`.
    pub fn write_u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    /// Write a boolean as a `u32` (0 or 1).
    pub fn write_bool(&mut self, v: bool) {
        self.write_u32(u32::from(v));
    }

    /// Write an `f64`.
    pub fn write_f64(&mut self, v: f64) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    /// Write the six coefficients of an affine transform.
    pub fn write_affine(&mut self, m: Affine) {
        for c in m.as_coeffs() {
            self.write_f64(c);
        }
    }

    /// Write a `u32` length prefix followed by `bytes`.
    pub fn write_byte_array(&mut self, bytes: &[u8]) -> PicshadeResult<()> {
        let len: u32 = bytes
            .len()
            .try_into()
            .map_err(|_| PicshadeError::validation("byte array exceeds u32 length"))?;
        self.write_u32(len);
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Cursor over flattened bytes. Every read fails with [`PicshadeError::Decode`] on truncation.
#[derive(Clone, Debug)]
pub struct ReadBuffer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ReadBuffer<'a> {
    /// Start reading at the beginning of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> PicshadeResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                PicshadeError::decode(format!(
                    "unexpected end of buffer: need {n} bytes at offset {}, have {}",
                    self.pos,
                    self.bytes.len().saturating_sub(self.pos)
                ))
            })?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> PicshadeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read a `u32`.
    pub fn read_u32(&mut self) -> PicshadeResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read a boolean written by [`WriteBuffer::write_bool`].
    pub fn read_bool(&mut self) -> PicshadeResult<bool> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(PicshadeError::decode(format!("invalid bool value {other}"))),
        }
    }

    /// Read an `f64`.
    pub fn read_f64(&mut self) -> PicshadeResult<f64> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Read an affine transform written by [`WriteBuffer::write_affine`].
    pub fn read_affine(&mut self) -> PicshadeResult<Affine> {
        let mut coeffs = [0.0; 6];
        for c in &mut coeffs {
            *c = self.read_f64()?;
        }
        Ok(Affine::new(coeffs))
    }

    /// Read a length-prefixed byte array.
    pub fn read_byte_array(&mut self) -> PicshadeResult<&'a [u8]> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/buffer.rs"]
mod tests;
