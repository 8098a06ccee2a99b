//! CPU rasterization of perforation masks with `vello_cpu`.
//!
//! Both strategies place hole centres on the same global lattice, so a tile repeated from the
//! viewport origin and a full-viewport bitmap put every hole in the same place:
//!
//! - row `j` sits at `y = (j + ½)·rowStep`
//! - square columns sit at `x = (i + ½)·pitch`
//! - hex even rows sit at `x = (i + ½)·pitch`, odd rows at `x = i·pitch`
//!
//! The two bitmaps are identical only when the cell spans a whole number of device pixels. Any
//! other cell (every hex cell, fractional square pitches) is stretched onto a rounded tile, and
//! hole edges then differ from the full-viewport raster by that resampling error. Each strategy
//! is still continuous across segment boundaries on its own.

use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Lattice, ViewportMetrics};
use crate::foundation::error::{PerfError, PerfResult};
use crate::geometry::lattice::pitch_y;
use crate::mask::bitmap::{MaskBitmap, MaskLayout};

/// Radius inflation that hides anti-aliasing seams at tile and shape boundaries.
pub const AA_INFLATE_PX: f64 = 0.2;
/// Smallest tile edge in device pixels.
pub const MIN_TILE_PX: u32 = 4;

const CIRCLE_TOLERANCE: f64 = 0.05;

/// Size of the repeating cell for a lattice, in viewport pixels.
pub fn tile_cell_size(lattice: Lattice, pitch_px: f64) -> (f64, f64) {
    match lattice {
        Lattice::Square => (pitch_px, pitch_px),
        Lattice::Hex => (pitch_px, 2.0 * pitch_y(pitch_px, Lattice::Hex)),
    }
}

/// Hole centres of one repeating cell, before wrap-around copies.
pub fn tile_hole_centers(lattice: Lattice, pitch_px: f64) -> Vec<(f64, f64)> {
    match lattice {
        Lattice::Square => vec![(pitch_px / 2.0, pitch_px / 2.0)],
        Lattice::Hex => {
            let row = pitch_y(pitch_px, Lattice::Hex);
            vec![
                (pitch_px / 2.0, 0.5 * row),
                (0.0, 1.5 * row),
                (pitch_px, 1.5 * row),
            ]
        }
    }
}

/// Rasterize one repeating lattice cell at the given device pixel ratio.
#[tracing::instrument(level = "debug")]
pub fn build_tile(
    lattice: Lattice,
    pitch_px: f64,
    radius_px: f64,
    dpr: u32,
) -> PerfResult<MaskBitmap> {
    validate_geometry(pitch_px, radius_px)?;
    let dpr = dpr.max(1);
    let (cell_w, cell_h) = tile_cell_size(lattice, pitch_px);
    let width = device_px(cell_w, dpr);
    let height = device_px(cell_h, dpr);

    // Every centre is repeated into the eight neighbouring cells so holes that cross a tile
    // edge appear on both sides.
    let mut centers = Vec::new();
    for (cx, cy) in tile_hole_centers(lattice, pitch_px) {
        for oy in [-cell_h, 0.0, cell_h] {
            for ox in [-cell_w, 0.0, cell_w] {
                centers.push((cx + ox, cy + oy));
            }
        }
    }

    let scale = (f64::from(width) / cell_w, f64::from(height) / cell_h);
    let luma = rasterize_holes(width, height, scale, (cell_w, cell_h), &centers, radius_px)?;
    Ok(MaskBitmap {
        layout: MaskLayout::Tile,
        lattice,
        width,
        height,
        cell_w,
        cell_h,
        luma: Arc::new(luma),
    })
}

/// Rasterize every hole across the viewport into one 1:1 bitmap.
#[tracing::instrument(level = "debug")]
pub fn build_viewport(
    lattice: Lattice,
    pitch_px: f64,
    radius_px: f64,
    viewport: ViewportMetrics,
) -> PerfResult<MaskBitmap> {
    validate_geometry(pitch_px, radius_px)?;
    let width = viewport.width.max(1);
    let height = viewport.height.max(1);
    let (w, h) = (f64::from(width), f64::from(height));

    let row = pitch_y(pitch_px, lattice);
    let rows = (h / row).ceil() as i64 + 1;
    let cols = (w / pitch_px).ceil() as i64 + 1;

    let mut centers = Vec::with_capacity(((rows + 2) * (cols + 2)).max(0) as usize);
    for j in -1..=rows {
        let y = (j as f64 + 0.5) * row;
        let x0 = match lattice {
            Lattice::Square => pitch_px / 2.0,
            Lattice::Hex if j.rem_euclid(2) == 0 => pitch_px / 2.0,
            Lattice::Hex => 0.0,
        };
        for i in -1..=cols {
            centers.push((x0 + i as f64 * pitch_px, y));
        }
    }

    let luma = rasterize_holes(width, height, (1.0, 1.0), (w, h), &centers, radius_px)?;
    Ok(MaskBitmap {
        layout: MaskLayout::Viewport,
        lattice,
        width,
        height,
        cell_w: w,
        cell_h: h,
        luma: Arc::new(luma),
    })
}

fn validate_geometry(pitch_px: f64, radius_px: f64) -> PerfResult<()> {
    if !(pitch_px.is_finite() && pitch_px > 0.0) {
        return Err(PerfError::geometry(format!(
            "mask pitch must be finite and > 0, got {pitch_px}"
        )));
    }
    if !(radius_px.is_finite() && radius_px >= 0.0) {
        return Err(PerfError::geometry(format!(
            "mask radius must be finite and >= 0, got {radius_px}"
        )));
    }
    Ok(())
}

fn device_px(logical: f64, dpr: u32) -> u32 {
    ((logical * f64::from(dpr)).round() as u32).max(MIN_TILE_PX)
}

/// Fill white, cut black discs, and read back the red channel as luminance.
fn rasterize_holes(
    width: u32,
    height: u32,
    scale: (f64, f64),
    logical_size: (f64, f64),
    centers: &[(f64, f64)],
    radius_px: f64,
) -> PerfResult<Vec<u8>> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PerfError::render(format!("mask width exceeds u16: {width}")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PerfError::render(format!("mask height exceeds u16: {height}")))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::scale_non_uniform(scale.0, scale.1));

    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, logical_size.0, logical_size.1));

    let r = radius_px + AA_INFLATE_PX;
    let mut holes = vello_cpu::kurbo::BezPath::new();
    for &(cx, cy) in centers {
        let circle = vello_cpu::kurbo::Circle::new((cx, cy), r);
        for el in circle.path_elements(CIRCLE_TOLERANCE) {
            holes.push(el);
        }
    }
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
    ctx.fill_path(&holes);

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[0])
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/mask/raster.rs"]
mod tests;
