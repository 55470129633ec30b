use super::*;

#[test]
fn tile_mode_wire_values_roundtrip() {
    for m in [TileMode::Clamp, TileMode::Repeat, TileMode::Mirror] {
        assert_eq!(TileMode::from_u32(m.as_u32()).unwrap(), m);
    }
    assert!(TileMode::from_u32(TileMode::COUNT).is_err());
}

#[test]
fn tile_mode_maps_out_of_range_coords() {
    assert_eq!(TileMode::Clamp.tile(-3, 4), 0);
    assert_eq!(TileMode::Clamp.tile(9, 4), 3);

    assert_eq!(TileMode::Repeat.tile(4, 4), 0);
    assert_eq!(TileMode::Repeat.tile(-1, 4), 3);

    let mirrored: Vec<i32> = (-4..8).map(|x| TileMode::Mirror.tile(x, 4)).collect();
    assert_eq!(mirrored, vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
}

#[test]
fn isize_rounds_half_up() {
    assert_eq!(
        ISize::round_from(Size::new(2.5, 0.49)),
        ISize::new(3, 0)
    );
    assert!(ISize::round_from(Size::new(2.5, 0.49)).is_empty());
    assert!(!ISize::round_from(Size::new(0.5, 0.5)).is_empty());
    assert!(ISize::round_from(Size::new(f64::NAN, 4.0)).is_empty());
}
