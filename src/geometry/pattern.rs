use crate::config::catalog::ProductSpec;
use crate::foundation::core::{Lattice, ViewingContext};
use crate::geometry::lattice::{
    clamp_radius_px, hole_radius_px_from_open_area, open_area_from_radius,
    pitch_mm_from_open_area, pitch_px_from_mm, pitch_y, radius_scale_from_distance,
};

/// On-screen hole pattern for one product under one viewing context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternGeometry {
    /// Hole packing.
    pub lattice: Lattice,
    /// Physical pitch used (explicit or derived), mm.
    pub pitch_mm: f64,
    /// Centre-to-centre spacing in pixels, within `[2, 64]`.
    pub pitch_px: f64,
    /// Row-to-row spacing in pixels.
    pub pitch_y_px: f64,
    /// Hole radius in pixels, within `[0.5, pitch/2]`.
    pub radius_px: f64,
}

impl PatternGeometry {
    /// Resolve the full product → pixels pipeline.
    ///
    /// The radius comes from the open area at the final pixel pitch so the drawn density matches
    /// the product even when the pitch clamp engages, then receives the close-distance tightening.
    pub fn resolve(product: &ProductSpec, ctx: &ViewingContext, reference_m: f64) -> Self {
        let pitch_mm = product.pitch_mm.unwrap_or_else(|| {
            pitch_mm_from_open_area(product.open_area, product.hole_diameter_mm, product.lattice)
        });
        let pitch_px = pitch_px_from_mm(pitch_mm, ctx.px_per_mm, ctx.distance_m, reference_m);
        Self::from_pitch_px(product.open_area, pitch_px, product.lattice, ctx.distance_m)
            .with_pitch_mm(pitch_mm)
    }

    /// Build from an already known pixel pitch.
    pub fn from_pitch_px(open_area: f64, pitch_px: f64, lattice: Lattice, distance_m: f64) -> Self {
        let raw = hole_radius_px_from_open_area(open_area, pitch_px, lattice)
            * radius_scale_from_distance(distance_m);
        Self {
            lattice,
            pitch_mm: f64::NAN,
            pitch_px,
            pitch_y_px: pitch_y(pitch_px, lattice),
            radius_px: clamp_radius_px(raw, pitch_px),
        }
    }

    fn with_pitch_mm(mut self, pitch_mm: f64) -> Self {
        self.pitch_mm = pitch_mm;
        self
    }

    /// Open area actually drawn after scaling and clamps.
    pub fn effective_open_area(&self) -> f64 {
        open_area_from_radius(self.radius_px, self.pitch_px, self.lattice)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/pattern.rs"]
mod tests;
