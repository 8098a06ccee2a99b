use std::{collections::BTreeSet, path::Path};

use anyhow::Context as _;

use crate::foundation::core::Lattice;
use crate::foundation::error::{PerfError, PerfResult};

/// Physical specification of one perforated film product. Read-only to the engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpec {
    /// Stable identifier.
    pub id: String,
    /// Display label, shown on the segment chip and legend.
    pub label: String,
    /// Perforated fraction of the surface, strictly inside `(0, 1)`.
    pub open_area: f64,
    /// Physical hole diameter in millimetres.
    #[serde(alias = "holeDiamMm")]
    pub hole_diameter_mm: f64,
    /// Hole packing.
    pub lattice: Lattice,
    /// Centre-to-centre spacing in millimetres; derived from open area and diameter when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_mm: Option<f64>,
    /// Whether the host shows this product initially.
    #[serde(default = "default_enabled")]
    pub enabled_default: bool,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl ProductSpec {
    /// Construct a product with derived pitch.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        open_area: f64,
        hole_diameter_mm: f64,
        lattice: Lattice,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            open_area,
            hole_diameter_mm,
            lattice,
            pitch_mm: None,
            enabled_default: true,
            notes: None,
        }
    }

    /// Check the physical parameters.
    pub fn validate(&self) -> PerfResult<()> {
        if self.id.trim().is_empty() {
            return Err(PerfError::validation("product id must be non-empty"));
        }
        if !(self.open_area.is_finite() && self.open_area > 0.0 && self.open_area < 1.0) {
            return Err(PerfError::validation(format!(
                "product '{}': openArea must be in (0, 1), got {}",
                self.id, self.open_area
            )));
        }
        if !(self.hole_diameter_mm.is_finite() && self.hole_diameter_mm > 0.0) {
            return Err(PerfError::validation(format!(
                "product '{}': holeDiameterMm must be > 0",
                self.id
            )));
        }
        if let Some(p) = self.pitch_mm
            && !(p.is_finite() && p > 0.0)
        {
            return Err(PerfError::validation(format!(
                "product '{}': pitchMm must be > 0",
                self.id
            )));
        }
        Ok(())
    }

    /// Whether the geometry can be rendered. Invalid products render as the plain scene.
    pub fn is_renderable(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Ordered product list fed into the comparison.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    /// Products in display order.
    pub products: Vec<ProductSpec>,
}

impl ProductCatalog {
    /// The five stock hex products.
    pub fn builtin() -> Self {
        let stock = |id: &str, label: &str, oa: f64, d: f64, pitch: f64| ProductSpec {
            pitch_mm: Some(pitch),
            notes: Some(format!(
                "{}% open, {d:.1} mm holes, ~{pitch:.1} mm pitch (hex)",
                (oa * 100.0).round()
            )),
            ..ProductSpec::new(id, label, oa, d, Lattice::Hex)
        };
        Self {
            products: vec![
                stock("p20", "20%", 0.2, 1.5, 3.0),
                stock("p30", "30%", 0.3, 1.5, 2.4),
                stock("p40", "40%", 0.4, 1.6, 2.1),
                stock("p50", "50%", 0.5, 1.5, 2.0),
                stock("p40hd", "40% HD", 0.4, 1.0, 1.3),
            ],
        }
    }

    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(s: &str) -> PerfResult<Self> {
        let catalog: Self = serde_json::from_str(s)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file.
    pub fn load(path: &Path) -> PerfResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read product catalog '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Validate every product and id uniqueness.
    pub fn validate(&self) -> PerfResult<()> {
        let mut seen = BTreeSet::new();
        for p in &self.products {
            p.validate()?;
            if !seen.insert(p.id.as_str()) {
                return Err(PerfError::validation(format!(
                    "duplicate product id '{}'",
                    p.id
                )));
            }
        }
        Ok(())
    }

    /// Look a product up by id.
    pub fn get(&self, id: &str) -> Option<&ProductSpec> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products enabled by default, in order.
    pub fn enabled(&self) -> impl Iterator<Item = &ProductSpec> {
        self.products.iter().filter(|p| p.enabled_default)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/catalog.rs"]
mod tests;
