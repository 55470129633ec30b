//! picshade paints recorded vector pictures as tiled images.
//!
//! A [`Picture`] is an immutable recording of vector drawing commands. A [`PictureShader`] turns
//! it into a shader: for each draw it works out the resolution the transform calls for,
//! rasterizes the picture into a tile with `vello_cpu`, and samples that tile through a
//! [`BitmapShader`]. The last tile is cached, so repeated draws at the same scale reuse it.
//!
//! - Record a picture with [`PictureRecorder`] (or load a [`PictureDesc`] JSON document)
//! - Wrap it in a [`PictureShader`] with per-axis [`TileMode`]s
//! - Shade spans through [`Shader::create_context`], or a whole frame with [`shade_frame`]
//!
//! Colour math on the bitmap side uses [`PmFloat`], a four-lane float form of the packed
//! premultiplied [`PmColor`].
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;
mod picture;
mod pixel;
mod render;
mod shader;

pub use crate::foundation::buffer::{ReadBuffer, WriteBuffer};
pub use crate::foundation::config::{ENV_MAX_TILE_BYTES, ENV_MAX_TILE_DIM, RasterOpts};
pub use crate::foundation::core::{
    Affine, BezPath, FilterQuality, ISize, Point, Rect, Size, TileMode, Vec2,
};
pub use crate::foundation::error::{PicshadeError, PicshadeResult};
pub use crate::foundation::math::{
    Decomposition, approx_axis_scale, decompose_upper_2x2, rotation_invariant_scale,
};
pub use crate::picture::record::{Picture, PictureDesc, PictureOp, PictureRecorder};
pub use crate::picture::playback::playback;
pub use crate::pixel::color::PmColor;
pub use crate::pixel::pm_float::PmFloat;
pub use crate::render::bitmap::Bitmap;
pub use crate::render::frame::{FrameRGBA, RenderThreading, shade_frame};
pub use crate::shader::base::{ContextRec, PaintState};
pub use crate::shader::bitmap_shader::BitmapShader;
pub use crate::shader::context::{ContextStorage, ShadeProc, ShaderContext, ShaderFlags};
pub use crate::shader::effect::{AccelBackend, ImageEffect};
pub use crate::shader::picture_context::PictureShaderContext;
pub use crate::shader::picture_shader::{CacheStats, PictureShader};
pub use crate::shader::{Shader, ShaderKind, deserialize_shader, serialize_shader};
