use super::*;

#[test]
fn viewport_conversions_fall_back_to_one_pixel() {
    let vp = ViewportMetrics::default();
    assert!(!vp.is_measured());
    assert_eq!(vp.width_px(), 1.0);
    assert_eq!(vp.pct_to_px(50.0), 0.5);
    assert_eq!(vp.px_to_pct(10.0), 100.0);
}

#[test]
fn px_to_pct_clamps_to_viewport_bounds() {
    let vp = ViewportMetrics::new(1000, 600);
    assert_eq!(vp.px_to_pct(-40.0), 0.0);
    assert_eq!(vp.px_to_pct(250.0), 25.0);
    assert_eq!(vp.px_to_pct(5000.0), 100.0);
    assert_eq!(vp.px_to_pct(f64::NAN), 0.0);
}

#[test]
fn premul_from_straight_scales_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::opaque(1, 2, 3).a, 255);
}

#[test]
fn enums_use_lowercase_names() {
    assert_eq!(serde_json::to_string(&Lattice::Hex).unwrap(), "\"hex\"");
    assert_eq!(
        serde_json::from_str::<Side>("\"outside\"").unwrap(),
        Side::Outside
    );
    assert_eq!(Side::Inside.opposite(), Side::Outside);
}
