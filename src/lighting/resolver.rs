use crate::foundation::core::{Lighting, Rgba8Premul, Side};
use crate::render::blend::over;

/// Direction a lighting wash pushes the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// White wash.
    Brighten,
    /// Black wash.
    Darken,
}

/// Semi-transparent wash laid over the background scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingOverlay {
    /// Brighten or darken.
    pub tone: Tone,
    /// Wash opacity in `[0, 1]`.
    pub alpha: f32,
}

impl LightingOverlay {
    /// The wash as a premultiplied color.
    pub fn color(&self) -> Rgba8Premul {
        let a = (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        match self.tone {
            Tone::Brighten => Rgba8Premul::from_straight_rgba(255, 255, 255, a),
            Tone::Darken => Rgba8Premul::from_straight_rgba(0, 0, 0, a),
        }
    }

    /// Composite the wash over one premultiplied pixel.
    pub fn apply(&self, px: [u8; 4]) -> [u8; 4] {
        over(px, self.color().to_array(), 1.0)
    }
}

/// Wash for a viewing side under a lighting mode.
///
/// | side    | day       | night     |
/// |---------|-----------|-----------|
/// | inside  | brighten  | darken    |
/// | outside | darken    | brighten  |
///
/// By day the viewer inside looks out at the bright exterior while the viewer outside sees a
/// dimmer interior; at night the lit interior reads brighter and the exterior darker.
pub fn lighting_overlay(side: Side, lighting: Lighting) -> LightingOverlay {
    let (tone, alpha) = match (side, lighting) {
        (Side::Inside, Lighting::Day) => (Tone::Brighten, 0.08),
        (Side::Outside, Lighting::Day) => (Tone::Darken, 0.15),
        (Side::Inside, Lighting::Night) => (Tone::Darken, 0.25),
        (Side::Outside, Lighting::Night) => (Tone::Brighten, 0.12),
    };
    LightingOverlay { tone, alpha }
}

/// Whether the lit interior should bleed through the holes: only from outside at night.
pub fn needs_reverse_vision(side: Side, lighting: Lighting) -> bool {
    side == Side::Outside && lighting == Lighting::Night
}

#[cfg(test)]
#[path = "../../tests/unit/lighting/resolver.rs"]
mod tests;
