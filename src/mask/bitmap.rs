use std::sync::Arc;

use crate::foundation::core::Lattice;
use crate::foundation::math::Fnv1a64;

/// Luminance value for film that stays (no hole).
pub const KEEP: u8 = 255;
/// Luminance value for a fully cut hole.
pub const CUT: u8 = 0;

/// How a [`MaskBitmap`] maps onto the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskLayout {
    /// One repeating lattice cell, tiled from the viewport origin.
    Tile,
    /// One bitmap covering the whole viewport at 1:1.
    Viewport,
}

/// Rasterized perforation mask. Luminance 255 keeps film, 0 is a hole; edges are anti-aliased.
///
/// Immutable once built; shared through the mask cache as `Arc<MaskBitmap>`.
#[derive(Clone, Debug)]
pub struct MaskBitmap {
    pub(crate) layout: MaskLayout,
    pub(crate) lattice: Lattice,
    /// Bitmap size in device pixels.
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Size the bitmap covers in viewport pixels.
    pub(crate) cell_w: f64,
    pub(crate) cell_h: f64,
    pub(crate) luma: Arc<Vec<u8>>,
}

impl MaskBitmap {
    /// Tile or full-viewport.
    pub fn layout(&self) -> MaskLayout {
        self.layout
    }

    /// Lattice the mask was drawn for.
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// Bitmap width in device pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bitmap height in device pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Physical `(width, height)` the bitmap spans in viewport pixels.
    pub fn cell_size(&self) -> (f64, f64) {
        (self.cell_w, self.cell_h)
    }

    /// Row-major luminance bytes.
    pub fn luma(&self) -> &[u8] {
        &self.luma
    }

    /// Luminance at a viewport-space point.
    ///
    /// Tiles repeat in both directions from the viewport origin. A full-viewport bitmap reads
    /// outside its bounds as film.
    pub fn sample(&self, x: f64, y: f64) -> u8 {
        match self.layout {
            MaskLayout::Tile => {
                let u = x.rem_euclid(self.cell_w) / self.cell_w;
                let v = y.rem_euclid(self.cell_h) / self.cell_h;
                let px = ((u * f64::from(self.width)) as u32).min(self.width - 1);
                let py = ((v * f64::from(self.height)) as u32).min(self.height - 1);
                self.luma[(py as usize) * (self.width as usize) + px as usize]
            }
            MaskLayout::Viewport => {
                if !(x >= 0.0 && y >= 0.0) {
                    return KEEP;
                }
                let (px, py) = (x as u32, y as u32);
                if px >= self.width || py >= self.height {
                    return KEEP;
                }
                self.luma[(py as usize) * (self.width as usize) + px as usize]
            }
        }
    }

    /// Stable content hash, used to compare bitmaps across builds.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.luma);
        h.finish()
    }

    /// Fraction of the bitmap that is cut (0 = solid film, 1 = all holes).
    pub fn cut_fraction(&self) -> f64 {
        if self.luma.is_empty() {
            return 0.0;
        }
        let keep: u64 = self.luma.iter().map(|&v| u64::from(v)).sum();
        1.0 - keep as f64 / (255.0 * self.luma.len() as f64)
    }
}
