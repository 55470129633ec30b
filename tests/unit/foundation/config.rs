use super::*;

#[test]
fn defaults_admit_typical_tiles() {
    let opts = RasterOpts::default();
    assert!(opts.admits(1024, 1024));
    assert!(!opts.admits(u32::from(u16::MAX) + 1, 1));
}

#[test]
fn byte_limit_is_enforced() {
    let opts = RasterOpts::default().with_max_tile_bytes(16 * 16 * 4);
    assert!(opts.admits(16, 16));
    assert!(!opts.admits(16, 17));
}

#[test]
fn dim_limit_is_capped_at_pixmap_max() {
    let opts = RasterOpts::default().with_max_tile_dim(u32::MAX);
    assert_eq!(opts.max_tile_dim, u32::from(u16::MAX));
}
