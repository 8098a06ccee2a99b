use super::*;

#[test]
fn wide_image_is_scaled_to_height_and_centred() {
    let fit = CoverFit::new(2000, 1000, ViewportMetrics::new(1000, 600));
    assert!((fit.scale - 0.6).abs() < 1e-12);
    assert!((fit.left - -100.0).abs() < 1e-9);
    assert!(fit.top.abs() < 1e-9);
}

#[test]
fn tall_image_is_scaled_to_width() {
    let fit = CoverFit::new(100, 400, ViewportMetrics::new(200, 100));
    assert_eq!(fit.scale, 2.0);
    assert_eq!(fit.left, 0.0);
    assert_eq!(fit.top, -350.0);
}

#[test]
fn neighbouring_viewport_columns_map_to_neighbouring_image_columns() {
    let fit = CoverFit::new(2000, 1000, ViewportMetrics::new(1000, 600));
    let (a, _) = fit.source_pixel(499.5, 300.5);
    let (b, _) = fit.source_pixel(500.5, 300.5);
    assert_eq!((a, b), (999, 1000));
}

#[test]
fn samples_clamp_at_image_edges() {
    let fit = CoverFit::new(4, 4, ViewportMetrics::new(4, 4));
    assert_eq!(fit.source_pixel(-10.0, -10.0), (0, 0));
    assert_eq!(fit.source_pixel(50.0, 50.0), (3, 3));
}

#[test]
fn unmeasured_viewport_still_produces_a_finite_fit() {
    let fit = CoverFit::new(640, 480, ViewportMetrics::default());
    assert!(fit.scale.is_finite() && fit.scale > 0.0);
}
