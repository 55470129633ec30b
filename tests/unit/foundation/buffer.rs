use super::*;

#[test]
fn primitives_are_little_endian_fixed_width() {
    let mut w = WriteBuffer::new();
    w.write_u32(0x0102_0304);
    w.write_bool(true);
    assert_eq!(w.as_bytes(), &[4, 3, 2, 1, 1, 0, 0, 0]);
}

#[test]
fn reader_consumes_in_write_order() {
    let m = Affine::new([1.0, 0.5, -0.25, 2.0, 10.0, -3.0]);
    let mut w = WriteBuffer::new();
    w.write_u32(7);
    w.write_affine(m);
    w.write_byte_array(b"abc").unwrap();
    let bytes = w.into_bytes();

    let mut r = ReadBuffer::new(&bytes);
    assert_eq!(r.read_u32().unwrap(), 7);
    assert_eq!(r.read_affine().unwrap(), m);
    assert_eq!(r.read_byte_array().unwrap(), b"abc");
    assert_eq!(r.remaining(), 0);
}

#[test]
fn truncated_input_is_a_decode_error() {
    let mut r = ReadBuffer::new(&[1, 2]);
    let err = r.read_u32().unwrap_err();
    assert!(err.to_string().contains("decode error:"));

    let mut w = WriteBuffer::new();
    w.write_u32(100);
    let bytes = w.into_bytes();
    assert!(ReadBuffer::new(&bytes).read_byte_array().is_err());
}

#[test]
fn bool_rejects_other_values() {
    let mut w = WriteBuffer::new();
    w.write_u32(2);
    let bytes = w.into_bytes();
    assert!(ReadBuffer::new(&bytes).read_bool().is_err());
}
