use super::*;
use crate::foundation::core::{Rect, TileMode};
use crate::picture::record::PictureRecorder;
use crate::pixel::color::PmColor;
use crate::render::bitmap::Bitmap;

#[test]
fn kind_wire_values() {
    for kind in [ShaderKind::Bitmap, ShaderKind::Picture] {
        assert_eq!(ShaderKind::from_u32(kind.as_u32()).unwrap(), kind);
    }
    assert!(ShaderKind::from_u32(0).is_err());
    assert!(ShaderKind::from_u32(9).is_err());
}

#[test]
fn picture_shader_roundtrips_through_the_kind_tag() {
    let pic = PictureRecorder::new(3, 5)
        .fill_rect(Rect::new(0.0, 0.0, 3.0, 1.0), [0, 255, 0, 255])
        .finish()
        .unwrap();
    let shader = PictureShader::create(Some(pic), TileMode::Repeat, TileMode::Mirror).unwrap();
    let bytes = serialize_shader(&shader).unwrap();
    assert_eq!(&bytes[..4], &2u32.to_le_bytes());

    let back = deserialize_shader(&bytes).unwrap();
    assert_eq!(back.kind(), ShaderKind::Picture);
    assert_eq!(serialize_shader(back.as_ref()).unwrap(), bytes);
}

#[test]
fn bitmap_shader_roundtrips_through_the_kind_tag() {
    let bm = Bitmap::from_pixels(1, 1, vec![PmColor::from_rgba(1, 2, 3, 4)]).unwrap();
    let shader = BitmapShader::new(Arc::new(bm), TileMode::Clamp, TileMode::Repeat, None);
    let bytes = serialize_shader(&shader).unwrap();
    let back = deserialize_shader(&bytes).unwrap();
    assert_eq!(back.kind(), ShaderKind::Bitmap);
    assert_eq!(serialize_shader(back.as_ref()).unwrap(), bytes);
}

#[test]
fn malformed_input_is_a_decode_error() {
    let bm = Bitmap::from_pixels(1, 1, vec![PmColor::TRANSPARENT]).unwrap();
    let shader = BitmapShader::new(Arc::new(bm), TileMode::Clamp, TileMode::Clamp, None);
    let mut bytes = serialize_shader(&shader).unwrap();

    assert!(matches!(
        deserialize_shader(&bytes[..bytes.len() - 1]),
        Err(PicshadeError::Decode(_))
    ));
    bytes.push(0);
    assert!(matches!(
        deserialize_shader(&bytes),
        Err(PicshadeError::Decode(_))
    ));
    assert!(deserialize_shader(&[7, 0, 0, 0]).is_err());
}
