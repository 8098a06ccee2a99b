//! Open-area, radius and pitch conversions for square and hex hole lattices.
//!
//! All functions are pure. Inputs outside their documented domain (e.g. an open area outside
//! `(0, 1)`) are a caller contract violation and may yield NaN; distances are clamped.

use std::f64::consts::PI;

use crate::foundation::core::Lattice;
use crate::foundation::math::lerp;

/// Smallest viewing distance the model accepts (m).
pub const MIN_DISTANCE_M: f64 = 0.5;
/// Largest viewing distance the model accepts (m).
pub const MAX_DISTANCE_M: f64 = 25.0;
/// Pixel pitch floor; anything finer would be invisible.
pub const MIN_PITCH_PX: f64 = 2.0;
/// Pixel pitch ceiling; anything coarser would overwhelm the scene.
pub const MAX_PITCH_PX: f64 = 64.0;
/// Hole radius floor so every hole stays rasterizable.
pub const MIN_RADIUS_PX: f64 = 0.5;

const HEX_ROW_FACTOR: f64 = 0.866_025_403_784_438_6; // √3 / 2

/// Area of the unit cell that holds one hole, in units of `pitch²`.
fn cell_area_factor(lattice: Lattice) -> f64 {
    match lattice {
        Lattice::Square => 1.0,
        Lattice::Hex => HEX_ROW_FACTOR,
    }
}

/// Clamp a viewing distance into `[0.5, 25]` m.
pub fn clamp_distance_m(distance_m: f64) -> f64 {
    distance_m.clamp(MIN_DISTANCE_M, MAX_DISTANCE_M)
}

/// Pitch (mm) that yields `open_area` for holes of `hole_diameter_mm`.
///
/// Square: `OA = πr² / a²`. Hex: `OA = πr² / ((√3/2)·a²)`.
pub fn pitch_mm_from_open_area(open_area: f64, hole_diameter_mm: f64, lattice: Lattice) -> f64 {
    let r = hole_diameter_mm / 2.0;
    ((PI * r * r) / (open_area * cell_area_factor(lattice))).sqrt()
}

/// Hole radius (px) that yields `open_area` at the given pixel pitch.
pub fn hole_radius_px_from_open_area(open_area: f64, pitch_px: f64, lattice: Lattice) -> f64 {
    pitch_px * (open_area * cell_area_factor(lattice) / PI).sqrt()
}

/// Open area covered by holes of `radius` on a lattice of `pitch` (same units).
pub fn open_area_from_radius(radius: f64, pitch: f64, lattice: Lattice) -> f64 {
    (PI * radius * radius) / (cell_area_factor(lattice) * pitch * pitch)
}

/// Physical pitch to on-screen pitch, finer as the viewer moves away, clamped to `[2, 64]` px.
pub fn pitch_px_from_mm(pitch_mm: f64, px_per_mm: f64, distance_m: f64, reference_m: f64) -> f64 {
    let factor = reference_m / clamp_distance_m(distance_m);
    (pitch_mm * px_per_mm * factor).clamp(MIN_PITCH_PX, MAX_PITCH_PX)
}

/// Perceptual tightening of hole radius when viewed up close.
///
/// Linear from 0.82 at 0.5 m to 1.0 at 3 m, flat beyond.
pub fn radius_scale_from_distance(distance_m: f64) -> f64 {
    const NEAR_SCALE: f64 = 0.82;
    const FAR_M: f64 = 3.0;

    let d = clamp_distance_m(distance_m);
    lerp(NEAR_SCALE, 1.0, (d - MIN_DISTANCE_M) / (FAR_M - MIN_DISTANCE_M))
}

/// Row-to-row spacing for the lattice.
pub fn pitch_y(pitch_px: f64, lattice: Lattice) -> f64 {
    match lattice {
        Lattice::Square => pitch_px,
        Lattice::Hex => HEX_ROW_FACTOR * pitch_px,
    }
}

/// Keep a radius rasterizable and non-overlapping: `[0.5, pitch/2]`.
pub fn clamp_radius_px(radius_px: f64, pitch_px: f64) -> f64 {
    let r = if radius_px.is_nan() {
        MIN_RADIUS_PX
    } else {
        radius_px
    };
    r.min(pitch_px / 2.0).max(MIN_RADIUS_PX)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/lattice.rs"]
mod tests;
