use super::*;

fn sample() -> Arc<Picture> {
    PictureRecorder::new(8, 4)
        .fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), [255, 0, 0, 255])
        .save()
        .concat(Affine::translate((4.0, 0.0)))
        .fill_path("M0,0 L4,0 L4,4 L0,4 Z", [0, 0, 255, 128])
        .restore()
        .stroke_path("M0,2 L8,2", 1.0, [0, 255, 0, 255])
        .finish()
        .unwrap()
}

#[test]
fn recorder_captures_current_transform() {
    let pic = sample();
    assert_eq!((pic.width(), pic.height()), (8, 4));
    assert_eq!(pic.ops().len(), 3);
    match &pic.ops()[1] {
        PictureOp::FillPath { transform, .. } => {
            assert_eq!(*transform, Affine::translate((4.0, 0.0)));
        }
        other => panic!("unexpected op {other:?}"),
    }
    match &pic.ops()[2] {
        PictureOp::StrokePath { transform, .. } => assert_eq!(*transform, Affine::IDENTITY),
        other => panic!("unexpected op {other:?}"),
    }
    assert!(pic.path_at(0).is_none());
    assert!(pic.path_at(1).is_some());
}

#[test]
fn invalid_path_data_is_rejected() {
    let err = PictureRecorder::new(4, 4)
        .fill_path("M0,0 X5,5", [0, 0, 0, 255])
        .finish()
        .unwrap_err();
    assert!(err.to_string().contains("validation error:"));

    let err = PictureRecorder::new(4, 4)
        .stroke_path("M0,0 L1,1", 0.0, [0, 0, 0, 255])
        .finish()
        .unwrap_err();
    assert!(err.to_string().contains("stroke width"));
}

#[test]
fn flatten_roundtrip_preserves_content() {
    let pic = sample();
    let mut w = WriteBuffer::new();
    pic.flatten(&mut w).unwrap();
    let bytes = w.into_bytes();

    let mut r = ReadBuffer::new(&bytes);
    let back = Picture::unflatten(&mut r).unwrap();
    assert_eq!(*back, *pic);
    assert_eq!(r.remaining(), 0);
}

#[test]
fn unflatten_rejects_bad_magic() {
    let mut w = WriteBuffer::new();
    w.write_u32(0xDEAD_BEEF);
    let bytes = w.into_bytes();
    assert!(Picture::unflatten(&mut ReadBuffer::new(&bytes)).is_err());
}

#[test]
fn json_documents_parse() {
    let json = br#"{
        "width": 2,
        "height": 2,
        "ops": [
            { "op": "fill_path", "d": "M0,0 L2,0 L2,2 Z", "color": [1, 2, 3, 255] }
        ]
    }"#;
    let pic = Picture::from_json(json).unwrap();
    assert_eq!(pic.ops().len(), 1);
    assert!(!pic.is_empty());

    let empty = Picture::from_desc(PictureDesc {
        width: 0,
        height: 3,
        ops: vec![],
    })
    .unwrap();
    assert!(empty.is_empty());
}
