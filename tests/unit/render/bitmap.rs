use super::*;

#[test]
fn transparent_allocation_is_zeroed() {
    let bm = Bitmap::try_new_transparent(3, 2).unwrap();
    assert_eq!(bm.pixels().len(), 6);
    assert!(bm.pixels().iter().all(|p| *p == PmColor::TRANSPARENT));
    assert!(!bm.is_opaque());
}

#[test]
fn from_pixels_checks_length_and_opacity() {
    assert!(Bitmap::from_pixels(2, 2, vec![PmColor::TRANSPARENT; 3]).is_err());

    let opaque = Bitmap::from_pixels(1, 2, vec![PmColor::from_rgba(1, 2, 3, 255); 2]).unwrap();
    assert!(opaque.is_opaque());
    assert_eq!(opaque.pixel(0, 1), PmColor::from_rgba(1, 2, 3, 255));
}

#[test]
fn flatten_roundtrip() {
    let bm = Bitmap::from_pixels(
        2,
        1,
        vec![PmColor::from_rgba(9, 8, 7, 255), PmColor::from_rgba(1, 1, 1, 2)],
    )
    .unwrap();
    let mut w = WriteBuffer::new();
    bm.flatten(&mut w).unwrap();
    let bytes = w.into_bytes();
    let back = Bitmap::unflatten(&mut ReadBuffer::new(&bytes)).unwrap();
    assert_eq!(back, bm);
}

#[test]
fn copies_pixmap_bytes_in_rgba_order() {
    let mut pixmap = vello_cpu::Pixmap::new(2, 1);
    pixmap
        .data_as_u8_slice_mut()
        .copy_from_slice(&[10, 20, 30, 255, 0, 0, 0, 0]);
    let mut bm = Bitmap::try_new_transparent(2, 1).unwrap();
    bm.copy_from_pixmap(&pixmap).unwrap();
    assert_eq!(bm.pixel(0, 0), PmColor::from_rgba(10, 20, 30, 255));
    assert_eq!(bm.pixel(1, 0), PmColor::TRANSPARENT);
    assert!(!bm.is_opaque());
}
