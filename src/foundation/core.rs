pub use kurbo::{Affine, Point, Rect, Vec2};

/// Hole packing geometry of a perforated film.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Lattice {
    /// Staggered triangular packing; odd rows shift by half a pitch.
    Hex,
    /// Simple grid, one hole per `pitch × pitch` cell.
    Square,
}

/// Which face of the film the viewer is looking at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Viewer inside the building, looking out through the black face.
    Inside,
    /// Viewer outside, looking at the white (optionally printed) face.
    Outside,
}

impl Side {
    /// The other face.
    pub fn opposite(self) -> Self {
        match self {
            Self::Inside => Self::Outside,
            Self::Outside => Self::Inside,
        }
    }
}

/// Lighting mode of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lighting {
    /// Daylight: the exterior is the bright side.
    Day,
    /// Night: the lit interior is the bright side.
    Night,
}

/// Host-controlled viewing parameters, passed by value into every render.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingContext {
    /// Face being viewed.
    pub side: Side,
    /// Day or night.
    pub lighting: Lighting,
    /// Viewer distance from the film in metres (`[0.5, 25]`, clamped on use).
    pub distance_m: f64,
    /// Screen scale at the reference distance.
    pub px_per_mm: f64,
}

impl Default for ViewingContext {
    fn default() -> Self {
        Self {
            side: Side::Inside,
            lighting: Lighting::Day,
            distance_m: 3.0,
            px_per_mm: 4.0,
        }
    }
}

/// Measured size of the viewport in pixels. `0 × 0` means "not mounted yet".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ViewportMetrics {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ViewportMetrics {
    /// Construct from a measured size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether a real measurement has arrived.
    pub fn is_measured(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width with the 1 px floor used by every percent/pixel conversion.
    pub fn width_px(self) -> f64 {
        f64::from(self.width.max(1))
    }

    /// Height with the 1 px floor.
    pub fn height_px(self) -> f64 {
        f64::from(self.height.max(1))
    }

    /// Convert a percent of the viewport width into pixels.
    pub fn pct_to_px(self, pct: f64) -> f64 {
        pct.clamp(0.0, 100.0) / 100.0 * self.width_px()
    }

    /// Convert an x position in pixels into a percent of the width, clamped to the viewport.
    pub fn px_to_pct(self, x: f64) -> f64 {
        let w = self.width_px();
        if !x.is_finite() {
            return if x > 0.0 { 100.0 } else { 0.0 };
        }
        x.clamp(0.0, w) / w * 100.0
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque color from straight channels.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiply straight RGBA.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
