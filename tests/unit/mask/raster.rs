use super::*;
use crate::mask::bitmap::{CUT, KEEP};

#[test]
fn square_tile_has_one_centred_hole() {
    let m = build_tile(Lattice::Square, 10.0, 3.0, 1).unwrap();
    assert_eq!((m.width(), m.height()), (10, 10));
    assert_eq!(m.layout(), MaskLayout::Tile);
    assert_eq!(m.sample(5.0, 5.0), CUT);
    assert_eq!(m.sample(0.5, 0.5), KEEP);
    // Repeats every pitch in both directions.
    assert_eq!(m.sample(25.0, 45.0), CUT);
    assert_eq!(m.sample(-5.0, -15.0), CUT);
}

#[test]
fn hex_tile_spans_two_rows_with_staggered_holes() {
    let pitch = 12.0;
    let row = pitch_y(pitch, Lattice::Hex);
    let m = build_tile(Lattice::Hex, pitch, 3.0, 1).unwrap();
    assert_eq!(m.width(), 12);
    assert_eq!(m.height(), (2.0 * row).round() as u32);

    assert_eq!(m.sample(pitch / 2.0, 0.5 * row), CUT);
    assert_eq!(m.sample(0.3, 1.5 * row), CUT);
    assert_eq!(m.sample(pitch - 0.3, 1.5 * row), CUT);
    assert_eq!(m.sample(0.5, 0.5 * row), KEEP);
}

#[test]
fn device_pixel_ratio_scales_tile_resolution() {
    let m1 = build_tile(Lattice::Square, 10.0, 3.0, 1).unwrap();
    let m2 = build_tile(Lattice::Square, 10.0, 3.0, 2).unwrap();
    assert_eq!(m2.width(), 2 * m1.width());
    assert_eq!(m2.cell_size(), m1.cell_size());
    assert_eq!(m2.sample(5.0, 5.0), CUT);
}

#[test]
fn tiny_tiles_keep_minimum_resolution() {
    let m = build_tile(Lattice::Square, 2.0, 0.5, 1).unwrap();
    assert_eq!((m.width(), m.height()), (MIN_TILE_PX, MIN_TILE_PX));
}

#[test]
fn viewport_mask_matches_tile_phase() {
    let pitch = 12.0;
    let row = pitch_y(pitch, Lattice::Hex);
    let vp = ViewportMetrics::new(100, 80);
    let full = build_viewport(Lattice::Hex, pitch, 3.0, vp).unwrap();
    let tile = build_tile(Lattice::Hex, pitch, 3.0, 1).unwrap();
    assert_eq!((full.width(), full.height()), (100, 80));

    for j in 0..8 {
        let y = (f64::from(j) + 0.5) * row;
        let x0 = if j % 2 == 0 { pitch / 2.0 } else { 0.0 };
        for i in 0..8 {
            let x = x0 + f64::from(i) * pitch;
            if x < 1.0 || x >= 99.0 || y >= 79.0 {
                continue;
            }
            assert_eq!(full.sample(x, y), CUT, "hole at ({x}, {y})");
            assert_eq!(tile.sample(x, y), CUT, "tile hole at ({x}, {y})");
            // Half a pitch to the side of an even-row hole is solid film in both.
            let fx = x + pitch / 2.0;
            if j % 2 == 0 && fx < 99.0 {
                assert_eq!(full.sample(fx, y), KEEP);
                assert_eq!(tile.sample(fx, y), KEEP);
            }
        }
    }
}

#[test]
fn whole_pixel_square_cells_match_the_viewport_raster_exactly() {
    let vp = ViewportMetrics::new(200, 100);
    let full = build_viewport(Lattice::Square, 12.0, 3.0, vp).unwrap();
    let tile = build_tile(Lattice::Square, 12.0, 3.0, 1).unwrap();
    for y in 0..100 {
        for x in 0..200 {
            let (sx, sy) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
            assert_eq!(tile.sample(sx, sy), full.sample(sx, sy), "({x}, {y})");
        }
    }
}

#[test]
fn fractional_cells_are_stretched_onto_a_rounded_tile() {
    let tile = build_tile(Lattice::Square, 12.6, 3.0, 1).unwrap();
    assert_eq!(tile.width(), 13);
    assert_eq!(tile.cell_size(), (12.6, 12.6));
    assert_eq!(tile.sample(6.3, 6.3), CUT);
    assert_eq!(tile.sample(6.3 + 12.6 * 7.0, 6.3), CUT);
}

#[test]
fn viewport_mask_treats_out_of_bounds_as_film() {
    let m = build_viewport(Lattice::Square, 10.0, 3.0, ViewportMetrics::new(20, 20)).unwrap();
    assert_eq!(m.sample(-1.0, 5.0), KEEP);
    assert_eq!(m.sample(5.0, 25.0), KEEP);
    assert_eq!(m.sample(f64::NAN, 5.0), KEEP);
    assert_eq!(m.sample(5.0, 5.0), CUT);
}

#[test]
fn cut_fraction_tracks_open_area() {
    let m = build_viewport(Lattice::Square, 20.0, 6.0, ViewportMetrics::new(200, 200)).unwrap();
    let expected = std::f64::consts::PI * (6.0 + AA_INFLATE_PX).powi(2) / 400.0;
    assert!((m.cut_fraction() - expected).abs() < 0.02, "{}", m.cut_fraction());
}

#[test]
fn rejects_non_positive_pitch() {
    assert!(matches!(
        build_tile(Lattice::Hex, 0.0, 1.0, 1),
        Err(PerfError::Geometry(_))
    ));
    assert!(build_viewport(Lattice::Hex, f64::NAN, 1.0, ViewportMetrics::new(4, 4)).is_err());
}

#[test]
fn rebuilding_is_deterministic() {
    let a = build_tile(Lattice::Hex, 9.5, 2.75, 2).unwrap();
    let b = build_tile(Lattice::Hex, 9.5, 2.75, 2).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
}
