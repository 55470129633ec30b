use super::*;

#[test]
fn channels_pack_in_rgba_byte_order() {
    let c = PmColor::from_rgba(1, 2, 3, 4);
    assert_eq!(c.0, 0x0403_0201);
    assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
    assert_eq!(PmColor::from_bytes(c.to_bytes()), c);
}

#[test]
fn straight_colors_premultiply_with_rounding() {
    let c = PmColor::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_bytes(), [128, 64, 0, 128]);
    assert!(c.is_premul_valid());
    assert!(!PmColor::from_rgba(200, 0, 0, 100).is_premul_valid());
}

#[test]
fn unpremultiply_inverts_opaque_and_clears_transparent() {
    assert_eq!(
        PmColor::from_rgba(10, 20, 30, 255).to_straight_rgba8(),
        [10, 20, 30, 255]
    );
    assert_eq!(PmColor::TRANSPARENT.to_straight_rgba8(), [0, 0, 0, 0]);
    assert_eq!(
        PmColor::from_rgba(64, 0, 0, 128).to_straight_rgba8(),
        [128, 0, 0, 128]
    );
}

#[test]
fn rgb565_truncates_low_bits() {
    assert_eq!(PmColor::from_rgba(255, 255, 255, 255).to_rgb565(), 0xFFFF);
    assert_eq!(PmColor::from_rgba(255, 0, 0, 255).to_rgb565(), 0xF800);
    assert_eq!(PmColor::from_rgba(0, 255, 0, 255).to_rgb565(), 0x07E0);
    assert_eq!(PmColor::from_rgba(0, 0, 7, 255).to_rgb565(), 0);
}
