use crate::foundation::config::RasterOpts;
use crate::foundation::core::{Affine, BezPath, ISize, Vec2};
use crate::picture::record::{Picture, PictureOp};
use crate::render::bitmap::Bitmap;

/// Replay every recorded command onto `ctx`, with `base` applied before each op's own transform.
pub fn playback(picture: &Picture, ctx: &mut vello_cpu::RenderContext, base: Affine) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for (idx, op) in picture.ops().iter().enumerate() {
        match op {
            PictureOp::FillRect {
                rect,
                color,
                transform,
            } => {
                ctx.set_transform(affine_to_cpu(base * *transform));
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    rect.x0, rect.y0, rect.x1, rect.y1,
                ));
            }
            PictureOp::FillPath {
                color, transform, ..
            } => {
                let Some(path) = picture.path_at(idx) else {
                    continue;
                };
                ctx.set_transform(affine_to_cpu(base * *transform));
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            PictureOp::StrokePath {
                width,
                color,
                transform,
                ..
            } => {
                let Some(path) = picture.path_at(idx) else {
                    continue;
                };
                ctx.set_transform(affine_to_cpu(base * *transform));
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
        }
    }
}

/// Rasterize `picture` into a fresh transparent `size` tile, pre-scaled by `scale`.
///
/// Returns `None` when the tile is empty, exceeds `opts`, or cannot be allocated.
#[tracing::instrument(
    level = "debug",
    skip(picture, opts),
    fields(w = size.width, h = size.height, sx = scale.x, sy = scale.y)
)]
pub(crate) fn rasterize(
    picture: &Picture,
    size: ISize,
    scale: Vec2,
    opts: &RasterOpts,
) -> Option<Bitmap> {
    if size.is_empty() {
        return None;
    }
    let (w, h) = (size.width as u32, size.height as u32);
    if !opts.admits(w, h) {
        tracing::warn!(w, h, ?opts, "picture tile exceeds raster limits");
        return None;
    }
    let (w16, h16): (u16, u16) = (w.try_into().ok()?, h.try_into().ok()?);

    let mut bitmap = match Bitmap::try_new_transparent(w, h) {
        Ok(bm) => bm,
        Err(e) => {
            tracing::warn!(error = %e, "picture tile allocation failed");
            return None;
        }
    };

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    playback(picture, &mut ctx, Affine::scale_non_uniform(scale.x, scale.y));
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);
    if let Err(e) = bitmap.copy_from_pixmap(&pixmap) {
        tracing::warn!(error = %e, "picture tile readback failed");
        return None;
    }
    Some(bitmap)
}

fn color_to_cpu([r, g, b, a]: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/picture/playback.rs"]
mod tests;
