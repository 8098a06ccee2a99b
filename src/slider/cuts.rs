//! Cut positions between comparison segments, in percent of the viewport width.
//!
//! For `n` cuts with gap `g`:
//! `cuts[0] ≥ g`, `cuts[i] + g ≤ cuts[i + 1]`, `cuts[n - 1] ≤ 100 − g`.
//! Every constructor and mutator keeps that true.

/// Strictly increasing cut percentages with a minimum gap.
#[derive(Clone, Debug, PartialEq)]
pub struct CutPositions {
    values: Vec<f64>,
    gap: f64,
}

impl CutPositions {
    /// Positions for `segments` segments (`segments − 1` cuts).
    ///
    /// A caller-supplied `initial` with at least one value per cut contributes its first
    /// `segments − 1` values, clamped into range and pushed apart to honour the gap. A shorter or
    /// missing `initial` seeds evenly spaced cuts at `round((i + 1) / segments · 100)`.
    pub fn seed(segments: usize, initial: Option<&[f64]>, gap: f64) -> Self {
        let count = segments.saturating_sub(1);
        let gap = effective_gap(count, gap);
        let values = match initial {
            Some(init) if init.len() >= count => init[..count]
                .iter()
                .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) })
                .collect(),
            _ => (0..count)
                .map(|i| ((i + 1) as f64 / segments as f64 * 100.0).round())
                .collect(),
        };
        let mut cuts = Self { values, gap };
        cuts.normalize();
        cuts
    }

    /// Cut values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of cuts.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no cuts.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Minimum gap actually enforced (may be tighter than requested when many cuts must fit).
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Cut `i`, if it exists.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }

    /// Allowed range `[lo, hi]` for cut `i` given its neighbours.
    pub fn bounds(&self, i: usize) -> Option<(f64, f64)> {
        if i >= self.values.len() {
            return None;
        }
        let lo = if i == 0 { self.gap } else { self.values[i - 1] + self.gap };
        let hi = match self.values.get(i + 1) {
            Some(next) => next - self.gap,
            None => 100.0 - self.gap,
        };
        Some((lo, hi))
    }

    /// `value` clamped into the allowed range of cut `i`.
    pub fn clamp_for_index(&self, i: usize, value: f64) -> Option<f64> {
        let (lo, hi) = self.bounds(i)?;
        if value.is_nan() {
            return None;
        }
        Some(value.clamp(lo, hi.max(lo)))
    }

    /// Move cut `i` towards `value`. Returns the new position when it changed.
    pub fn set(&mut self, i: usize, value: f64) -> Option<f64> {
        let next = self.clamp_for_index(i, value)?;
        if next == self.values[i] {
            return None;
        }
        self.values[i] = next;
        Some(next)
    }

    /// Whether the ordering and gap invariants hold (tolerating float noise).
    pub fn is_valid(&self) -> bool {
        const EPS: f64 = 1e-9;
        let mut prev = 0.0;
        for &v in &self.values {
            if !(v.is_finite() && v + EPS >= prev + self.gap) {
                return false;
            }
            prev = v;
        }
        self.values
            .last()
            .is_none_or(|&last| last <= 100.0 - self.gap + EPS)
    }

    fn normalize(&mut self) {
        let mut prev = 0.0;
        for v in &mut self.values {
            *v = v.max(prev + self.gap);
            prev = *v;
        }
        let mut next = 100.0;
        for v in self.values.iter_mut().rev() {
            *v = v.min(next - self.gap);
            next = *v;
        }
    }
}

/// Gap shrunk just enough that `count` cuts always fit between 0 and 100.
fn effective_gap(count: usize, gap: f64) -> f64 {
    let gap = if gap.is_finite() { gap.max(0.0) } else { 0.0 };
    gap.min(100.0 / (count as f64 + 1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/slider/cuts.rs"]
mod tests;
