use super::*;
use crate::foundation::core::Rect;
use crate::picture::record::PictureRecorder;
use crate::pixel::color::PmColor;

fn quadrants() -> std::sync::Arc<Picture> {
    PictureRecorder::new(4, 4)
        .fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), [255, 0, 0, 255])
        .fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), [0, 0, 255, 255])
        .finish()
        .unwrap()
}

#[test]
fn rasterize_at_unit_scale_fills_pixel_aligned_rects() {
    let pic = quadrants();
    let bm = rasterize(
        &pic,
        ISize::new(4, 4),
        Vec2::new(1.0, 1.0),
        &RasterOpts::default(),
    )
    .unwrap();
    assert_eq!(bm.pixel(0, 0), PmColor::from_rgba(255, 0, 0, 255));
    assert_eq!(bm.pixel(3, 3), PmColor::from_rgba(0, 0, 255, 255));
    assert_eq!(bm.pixel(3, 0), PmColor::TRANSPARENT);
}

#[test]
fn rasterize_applies_scale() {
    let pic = quadrants();
    let bm = rasterize(
        &pic,
        ISize::new(8, 8),
        Vec2::new(2.0, 2.0),
        &RasterOpts::default(),
    )
    .unwrap();
    assert_eq!((bm.width(), bm.height()), (8, 8));
    assert_eq!(bm.pixel(3, 3), PmColor::from_rgba(255, 0, 0, 255));
    assert_eq!(bm.pixel(4, 4), PmColor::from_rgba(0, 0, 255, 255));
    assert_eq!(bm.pixel(7, 0), PmColor::TRANSPARENT);
}

#[test]
fn rasterize_refuses_empty_and_oversized_tiles() {
    let pic = quadrants();
    let opts = RasterOpts::default().with_max_tile_bytes(4 * 4 * 4);
    assert!(rasterize(&pic, ISize::new(0, 4), Vec2::new(1.0, 1.0), &opts).is_none());
    assert!(rasterize(&pic, ISize::new(5, 4), Vec2::new(1.0, 1.0), &opts).is_none());
    assert!(rasterize(&pic, ISize::new(4, 4), Vec2::new(1.0, 1.0), &opts).is_some());
}
