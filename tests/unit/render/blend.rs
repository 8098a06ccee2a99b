use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn coverage_matches_float_opacity() {
    let dst = [40, 80, 120, 255];
    let src = [255, 255, 255, 255];
    assert_eq!(over_u8(dst, src, 255), over(dst, src, 1.0));
    assert_eq!(over_u8(dst, src, 0), dst);
    assert_eq!(over_u8(dst, src, 128), over(dst, src, 128.0 / 255.0));
}

#[test]
fn scaled_coverage_multiplies() {
    assert_eq!(scaled_coverage(1.0, 200), 200);
    assert_eq!(scaled_coverage(0.0, 255), 0);
    assert_eq!(scaled_coverage(0.5, 255), 128);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    let src = [9u8, 9, 9, 255, 0, 0, 0, 0];
    over_in_place(&mut dst, &src, 1.0).unwrap();
    assert_eq!(dst, [9, 9, 9, 255, 0, 0, 0, 0]);
}
