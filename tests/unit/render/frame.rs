use super::*;
use std::sync::Arc;

use crate::foundation::core::{Affine, TileMode};
use crate::render::bitmap::Bitmap;
use crate::shader::bitmap_shader::BitmapShader;

fn stripes() -> BitmapShader {
    let bm = Bitmap::from_pixels(
        3,
        1,
        vec![
            PmColor::from_rgba(255, 0, 0, 255),
            PmColor::from_rgba(0, 128, 0, 128),
            PmColor::TRANSPARENT,
        ],
    )
    .unwrap();
    BitmapShader::new(Arc::new(bm), TileMode::Repeat, TileMode::Repeat, None)
}

#[test]
fn sequential_frame_writes_premultiplied_rows() {
    let frame = shade_frame(
        &stripes(),
        &ContextRec::new(Affine::IDENTITY),
        4,
        2,
        &RenderThreading::default(),
    )
    .unwrap();
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 4 * 2 * 4);
    assert_eq!(&frame.data[..16], &[255, 0, 0, 255, 0, 128, 0, 128, 0, 0, 0, 0, 255, 0, 0, 255]);
    assert_eq!(&frame.data[..16], &frame.data[16..]);

    let straight = frame.to_straight_rgba8();
    assert_eq!(&straight[4..8], &[0, 255, 0, 128]);
}

#[test]
fn parallel_matches_sequential() {
    let shader = stripes();
    let rec = ContextRec::new(Affine::rotate(0.3) * Affine::scale(2.5));
    let seq = shade_frame(&shader, &rec, 37, 23, &RenderThreading::default()).unwrap();
    let par = shade_frame(
        &shader,
        &rec,
        37,
        23,
        &RenderThreading {
            parallel: true,
            chunk_size: 5,
            threads: Some(3),
        },
    )
    .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn rejects_bad_sizes_threads_and_transforms() {
    let shader = stripes();
    let rec = ContextRec::new(Affine::IDENTITY);
    let seq = RenderThreading::default();
    assert!(matches!(
        shade_frame(&shader, &rec, 0, 4, &seq),
        Err(PicshadeError::Validation(_))
    ));
    assert!(matches!(
        shade_frame(&shader, &ContextRec::new(Affine::scale(0.0)), 4, 4, &seq),
        Err(PicshadeError::Render(_))
    ));
    let zero_threads = RenderThreading {
        parallel: true,
        threads: Some(0),
        ..RenderThreading::default()
    };
    assert!(matches!(
        shade_frame(&shader, &rec, 4, 4, &zero_threads),
        Err(PicshadeError::Validation(_))
    ));
}

#[test]
fn save_png_writes_a_decodable_file() {
    let frame = shade_frame(
        &stripes(),
        &ContextRec::new(Affine::IDENTITY),
        3,
        1,
        &RenderThreading::default(),
    )
    .unwrap();
    let path = std::env::temp_dir().join(format!("picshade-frame-{}.png", std::process::id()));
    frame.save_png(&path).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    let _ = std::fs::remove_file(&path);
    assert_eq!(img.dimensions(), (3, 1));
    assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0, 128]);
}
