use super::*;

fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn radius_round_trips_through_pitch_for_both_lattices() {
    for lattice in [Lattice::Hex, Lattice::Square] {
        for oa in [0.05, 0.2, 0.4, 0.5, 0.75] {
            for d in [0.8, 1.0, 1.5, 1.6, 3.0] {
                for px_per_mm in [1.0, 4.0, 7.5] {
                    let pitch_mm = pitch_mm_from_open_area(oa, d, lattice);
                    let r = hole_radius_px_from_open_area(oa, pitch_mm * px_per_mm, lattice);
                    assert!(
                        close(r, d / 2.0 * px_per_mm, 1e-9),
                        "{lattice:?} oa={oa} d={d} -> r={r}"
                    );
                }
            }
        }
    }
}

#[test]
fn hex_is_denser_than_square_for_equal_holes() {
    let hex = pitch_mm_from_open_area(0.4, 1.6, Lattice::Hex);
    let sq = pitch_mm_from_open_area(0.4, 1.6, Lattice::Square);
    assert!(hex > sq);
    // Stock 40% / 1.6 mm product sits near 2.4 mm pitch on a hex lattice.
    assert!(close(hex, 2.408, 0.01), "{hex}");
}

#[test]
fn open_area_inverts_radius() {
    let r = hole_radius_px_from_open_area(0.3, 10.0, Lattice::Hex);
    assert!(close(open_area_from_radius(r, 10.0, Lattice::Hex), 0.3, 1e-12));
}

#[test]
fn pitch_scales_inversely_with_distance() {
    assert!(close(pitch_px_from_mm(3.0, 4.0, 3.0, 3.0), 12.0, 1e-12));
    assert!(close(pitch_px_from_mm(3.0, 4.0, 6.0, 3.0), 6.0, 1e-12));
}

#[test]
fn pitch_is_clamped_to_sane_pixels() {
    assert_eq!(pitch_px_from_mm(3.0, 4.0, 1000.0, 3.0), 2.0);
    assert_eq!(pitch_px_from_mm(30.0, 4.0, 0.0, 3.0), 64.0);
    // 25 m is the farthest distance; beyond it the pitch stops shrinking.
    assert_eq!(
        pitch_px_from_mm(40.0, 4.0, 25.0, 3.0),
        pitch_px_from_mm(40.0, 4.0, 90.0, 3.0)
    );
}

#[test]
fn radius_scale_interpolates_then_flattens() {
    assert!(close(radius_scale_from_distance(0.5), 0.82, 1e-12));
    assert!(close(radius_scale_from_distance(0.1), 0.82, 1e-12));
    assert!(close(radius_scale_from_distance(1.75), 0.91, 1e-12));
    assert!(close(radius_scale_from_distance(3.0), 1.0, 1e-12));
    assert_eq!(radius_scale_from_distance(12.0), 1.0);
}

#[test]
fn row_step_matches_lattice() {
    assert_eq!(pitch_y(10.0, Lattice::Square), 10.0);
    assert!(close(pitch_y(10.0, Lattice::Hex), 8.660254, 1e-6));
}

#[test]
fn radius_clamp_bounds() {
    assert_eq!(clamp_radius_px(0.01, 10.0), MIN_RADIUS_PX);
    assert_eq!(clamp_radius_px(9.0, 10.0), 5.0);
    assert_eq!(clamp_radius_px(f64::NAN, 10.0), MIN_RADIUS_PX);
    assert_eq!(clamp_radius_px(3.0, 10.0), 3.0);
}
