use crate::foundation::error::{PerfError, PerfResult};

/// Upper bound for the reverse-vision bleed-through opacity.
pub const REVERSE_VISION_MAX_OPACITY: f64 = 0.6;

/// Visual tuning values. None of these are load-bearing for correctness; they are exposed so a
/// host can calibrate the preview for its display.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tuning {
    /// Distance (m) at which `px_per_mm` was calibrated.
    pub reference_m: f64,
    /// Minimum gap (percent of width) between neighbouring cuts and from the edges.
    pub min_gap_pct: f64,
    /// Keyboard nudge step in percent.
    pub key_step_pct: f64,
    /// Keyboard nudge step with the modifier held.
    pub key_step_big_pct: f64,
    /// Peak alpha of the white boost applied to very fine outside patterns.
    pub white_boost_max_alpha: f64,
    /// Pitch (px) below which the white boost starts ramping in.
    pub white_boost_pitch_px: f64,
    /// Opacity of the opposite scene leaking through the holes at night.
    pub reverse_vision_opacity: f64,
    /// Maximum number of rasterized masks retained by a cache built from this tuning.
    pub mask_cache_capacity: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            reference_m: 3.0,
            min_gap_pct: 2.0,
            key_step_pct: 1.0,
            key_step_big_pct: 5.0,
            white_boost_max_alpha: 0.22,
            white_boost_pitch_px: 6.0,
            reverse_vision_opacity: 0.35,
            mask_cache_capacity: 64,
        }
    }
}

impl Tuning {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> PerfResult<Self> {
        let t: Self = serde_json::from_str(s)?;
        t.validate()?;
        Ok(t)
    }

    /// Reject values that would make the slider or geometry degenerate.
    pub fn validate(&self) -> PerfResult<()> {
        if !(self.reference_m.is_finite() && self.reference_m > 0.0) {
            return Err(PerfError::validation("referenceM must be > 0"));
        }
        if !(self.min_gap_pct.is_finite() && self.min_gap_pct > 0.0 && self.min_gap_pct < 50.0) {
            return Err(PerfError::validation("minGapPct must be in (0, 50)"));
        }
        if !(self.key_step_pct > 0.0 && self.key_step_big_pct > 0.0) {
            return Err(PerfError::validation("key steps must be > 0"));
        }
        Ok(())
    }

    /// Bleed-through opacity clamped into `[0, 0.6]`.
    pub fn reverse_vision_opacity_clamped(&self) -> f64 {
        if self.reverse_vision_opacity.is_nan() {
            return 0.0;
        }
        self.reverse_vision_opacity
            .clamp(0.0, REVERSE_VISION_MAX_OPACITY)
    }

    /// White boost alpha for a given pixel pitch: ramps from 0 at `white_boost_pitch_px` to the
    /// maximum as the pitch approaches 0.
    pub fn white_boost_alpha(&self, pitch_px: f64) -> f64 {
        let knee = self.white_boost_pitch_px.max(f64::EPSILON);
        let t = ((knee - pitch_px) / knee).clamp(0.0, 1.0);
        self.white_boost_max_alpha.clamp(0.0, 1.0) * t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/tuning.rs"]
mod tests;
