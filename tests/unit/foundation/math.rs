use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn decompose_pure_scale() {
    let dec = decompose_upper_2x2(Affine::scale_non_uniform(2.0, 3.0)).unwrap();
    assert!(approx(dec.scale.x, 2.0));
    assert!(approx(dec.scale.y, 3.0));
}

#[test]
fn decompose_ignores_rotation_and_translation() {
    for deg in [0.0f64, 30.0, 45.0, 90.0, 135.0, 270.0] {
        let m = Affine::translate((17.0, -4.0))
            * Affine::rotate(deg.to_radians())
            * Affine::scale_non_uniform(2.0, 0.5);
        let s = rotation_invariant_scale(m);
        let (lo, hi) = (s.x.min(s.y), s.x.max(s.y));
        assert!(approx(lo, 0.5), "deg={deg} scale={s:?}");
        assert!(approx(hi, 2.0), "deg={deg} scale={s:?}");
    }
}

#[test]
fn decompose_rejects_singular_matrices() {
    assert!(decompose_upper_2x2(Affine::scale_non_uniform(1.0, 0.0)).is_none());
    assert!(decompose_upper_2x2(Affine::new([1.0, 2.0, 2.0, 4.0, 0.0, 0.0])).is_none());
    assert!(decompose_upper_2x2(Affine::new([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0])).is_none());
}

#[test]
fn singular_matrices_fall_back_to_axis_scale() {
    // Rank-one: x' = 3x, y' = 4x.
    let m = Affine::new([3.0, 4.0, 0.0, 0.0, 0.0, 0.0]);
    let s = rotation_invariant_scale(m);
    assert!(approx(s.x, 3.0));
    assert!(approx(s.y, 4.0));
}

#[test]
fn reflections_yield_positive_scale() {
    let s = rotation_invariant_scale(Affine::scale_non_uniform(-2.0, 1.0));
    assert!(approx(s.x, 2.0));
    assert!(approx(s.y, 1.0));
}
