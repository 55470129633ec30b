use std::sync::Arc;

use crate::foundation::buffer::{ReadBuffer, WriteBuffer};
use crate::foundation::core::{Affine, BezPath, Rect};
use crate::foundation::error::{PicshadeError, PicshadeResult};

const PICTURE_MAGIC: u32 = u32::from_le_bytes(*b"PICT");
const PICTURE_VERSION: u32 = 1;

fn identity() -> Affine {
    Affine::IDENTITY
}

fn is_identity(a: &Affine) -> bool {
    *a == Affine::IDENTITY
}

/// One recorded drawing command. Colours are straight (non-premultiplied) RGBA8.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PictureOp {
    /// Fill an axis-aligned rectangle.
    FillRect {
        /// Rectangle in picture space (before `transform`).
        rect: Rect,
        /// Straight RGBA8 colour.
        color: [u8; 4],
        /// Transform applied to the geometry.
        #[serde(default = "identity", skip_serializing_if = "is_identity")]
        transform: Affine,
    },
    /// Fill an SVG path (non-zero winding).
    FillPath {
        /// SVG path data.
        d: String,
        /// Straight RGBA8 colour.
        color: [u8; 4],
        /// Transform applied to the geometry.
        #[serde(default = "identity", skip_serializing_if = "is_identity")]
        transform: Affine,
    },
    /// Stroke an SVG path with a fixed width.
    StrokePath {
        /// SVG path data.
        d: String,
        /// Stroke width in picture units.
        width: f64,
        /// Straight RGBA8 colour.
        color: [u8; 4],
        /// Transform applied to the geometry.
        #[serde(default = "identity", skip_serializing_if = "is_identity")]
        transform: Affine,
    },
}

/// JSON document form of a picture.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PictureDesc {
    /// Picture width in picture units.
    pub width: u32,
    /// Picture height in picture units.
    pub height: u32,
    /// Drawing commands in playback order.
    #[serde(default)]
    pub ops: Vec<PictureOp>,
}

/// Immutable recorded drawing with a fixed integer size.
///
/// Pictures are shared through `Arc`; every shader built from the same recording holds a
/// reference and the recording is freed when the last holder drops it.
#[derive(Clone, Debug)]
pub struct Picture {
    width: u32,
    height: u32,
    ops: Vec<PictureOp>,
    // Parsed geometry for path ops, index-aligned with `ops`.
    paths: Vec<Option<BezPath>>,
}

impl PartialEq for Picture {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.ops == other.ops
    }
}

impl Picture {
    /// Validate a description and freeze it into a picture.
    pub fn from_desc(desc: PictureDesc) -> PicshadeResult<Self> {
        let mut paths = Vec::with_capacity(desc.ops.len());
        for (i, op) in desc.ops.iter().enumerate() {
            let parsed = match op {
                PictureOp::FillRect { .. } => None,
                PictureOp::FillPath { d, .. } => Some(parse_path(i, d)?),
                PictureOp::StrokePath { d, width, .. } => {
                    if !width.is_finite() || *width <= 0.0 {
                        return Err(PicshadeError::validation(format!(
                            "op {i}: stroke width must be finite and > 0"
                        )));
                    }
                    Some(parse_path(i, d)?)
                }
            };
            paths.push(parsed);
        }

        Ok(Self {
            width: desc.width,
            height: desc.height,
            ops: desc.ops,
            paths,
        })
    }

    /// Parse a JSON [`PictureDesc`] document.
    pub fn from_json(bytes: &[u8]) -> PicshadeResult<Self> {
        let desc: PictureDesc = serde_json::from_slice(bytes)
            .map_err(|e| PicshadeError::serde(format!("parse picture JSON: {e}")))?;
        Self::from_desc(desc)
    }

    /// Width in picture units.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in picture units.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Recorded commands.
    pub fn ops(&self) -> &[PictureOp] {
        &self.ops
    }

    /// Description form (for JSON output).
    pub fn to_desc(&self) -> PictureDesc {
        PictureDesc {
            width: self.width,
            height: self.height,
            ops: self.ops.clone(),
        }
    }

    pub(crate) fn path_at(&self, idx: usize) -> Option<&BezPath> {
        self.paths.get(idx).and_then(|p| p.as_ref())
    }

    /// Write the picture's own encoding: magic, version, size, then the JSON command payload.
    pub fn flatten(&self, buf: &mut WriteBuffer) -> PicshadeResult<()> {
        let payload = serde_json::to_vec(&self.ops)
            .map_err(|e| PicshadeError::serde(format!("encode picture ops: {e}")))?;
        buf.write_u32(PICTURE_MAGIC);
        buf.write_u32(PICTURE_VERSION);
        buf.write_u32(self.width);
        buf.write_u32(self.height);
        buf.write_byte_array(&payload)
    }

    /// Read a picture written by [`Picture::flatten`].
    pub fn unflatten(buf: &mut ReadBuffer<'_>) -> PicshadeResult<Arc<Self>> {
        if buf.read_u32()? != PICTURE_MAGIC {
            return Err(PicshadeError::decode("bad picture magic"));
        }
        let version = buf.read_u32()?;
        if version != PICTURE_VERSION {
            return Err(PicshadeError::decode(format!(
                "unsupported picture version {version}"
            )));
        }
        let width = buf.read_u32()?;
        let height = buf.read_u32()?;
        let payload = buf.read_byte_array()?;
        let ops: Vec<PictureOp> = serde_json::from_slice(payload)
            .map_err(|e| PicshadeError::serde(format!("decode picture ops: {e}")))?;
        Ok(Arc::new(Self::from_desc(PictureDesc { width, height, ops })?))
    }
}

fn parse_path(idx: usize, d: &str) -> PicshadeResult<BezPath> {
    BezPath::from_svg(d.trim())
        .map_err(|e| PicshadeError::validation(format!("op {idx}: invalid svg path data: {e}")))
}

/// Builder that records drawing commands into a [`Picture`].
#[derive(Debug)]
pub struct PictureRecorder {
    width: u32,
    height: u32,
    ops: Vec<PictureOp>,
    transform: Affine,
    saved: Vec<Affine>,
}

impl PictureRecorder {
    /// Start recording a `width x height` picture.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            transform: Affine::IDENTITY,
            saved: Vec::new(),
        }
    }

    /// Push the current transform.
    pub fn save(&mut self) -> &mut Self {
        self.saved.push(self.transform);
        self
    }

    /// Pop to the last saved transform. Unbalanced restores reset to identity.
    pub fn restore(&mut self) -> &mut Self {
        self.transform = self.saved.pop().unwrap_or(Affine::IDENTITY);
        self
    }

    /// Pre-concatenate `m` onto the current transform.
    pub fn concat(&mut self, m: Affine) -> &mut Self {
        self.transform = self.transform * m;
        self
    }

    /// Record a rectangle fill.
    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) -> &mut Self {
        self.ops.push(PictureOp::FillRect {
            rect,
            color,
            transform: self.transform,
        });
        self
    }

    /// Record a path fill from SVG path data.
    pub fn fill_path(&mut self, d: impl Into<String>, color: [u8; 4]) -> &mut Self {
        self.ops.push(PictureOp::FillPath {
            d: d.into(),
            color,
            transform: self.transform,
        });
        self
    }

    /// Record a path stroke from SVG path data.
    pub fn stroke_path(&mut self, d: impl Into<String>, width: f64, color: [u8; 4]) -> &mut Self {
        self.ops.push(PictureOp::StrokePath {
            d: d.into(),
            width,
            color,
            transform: self.transform,
        });
        self
    }

    /// Freeze the recording.
    pub fn finish(&mut self) -> PicshadeResult<Arc<Picture>> {
        let desc = PictureDesc {
            width: self.width,
            height: self.height,
            ops: std::mem::take(&mut self.ops),
        };
        self.transform = Affine::IDENTITY;
        self.saved.clear();
        Ok(Arc::new(Picture::from_desc(desc)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/picture/record.rs"]
mod tests;
