use std::sync::{Arc, Mutex};

use crate::assets::store::{ImageSlot, PreparedImage};
use crate::config::catalog::ProductSpec;
use crate::config::tuning::Tuning;
use crate::foundation::core::{Side, ViewingContext, ViewportMetrics};
use crate::foundation::error::{PerfError, PerfResult};
use crate::geometry::pattern::PatternGeometry;
use crate::lighting::resolver::{LightingOverlay, lighting_overlay, needs_reverse_vision};
use crate::mask::bitmap::{KEEP, MaskBitmap};
use crate::mask::cache::MaskCache;
use crate::render::blend::{PremulRgba8, over, over_u8, scaled_coverage};
use crate::render::cover::CoverFit;

const OPAQUE_BLACK: PremulRgba8 = [0, 0, 0, 255];
const OPAQUE_WHITE: PremulRgba8 = [255, 255, 255, 255];

/// Which rasterizer backs the perforation mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskStrategy {
    /// Small repeating cell at a device pixel ratio.
    Tiled {
        /// Device pixel ratio (rounded, ≥ 1).
        dpr: u32,
    },
    /// One bitmap the size of the viewport.
    FullViewport,
}

impl Default for MaskStrategy {
    fn default() -> Self {
        Self::Tiled { dpr: 1 }
    }
}

/// Images shared by every segment of a comparison.
#[derive(Clone, Copy, Debug)]
pub struct SceneImages<'a> {
    /// Scene seen through the window.
    pub background: &'a ImageSlot,
    /// Scene on the viewer's side of the glass; leaks through the holes at night.
    pub opposite: &'a ImageSlot,
    /// Artwork printed on the outside face of the film.
    pub artwork: &'a ImageSlot,
}

/// One segment to composite.
#[derive(Clone, Copy, Debug)]
pub struct SegmentRequest<'a> {
    /// Film on this segment; `None` is the unmodified baseline.
    pub product: Option<&'a ProductSpec>,
    /// Where the viewer stands and what the light is doing.
    pub context: ViewingContext,
    /// Full comparison viewport; all sampling is in its coordinates.
    pub viewport: ViewportMetrics,
    /// Left edge of the segment as a percent of the viewport width.
    pub slice_from_pct: f64,
    /// Right edge of the segment as a percent of the viewport width.
    pub slice_to_pct: f64,
    /// Shared images.
    pub scenes: SceneImages<'a>,
}

/// Load state of the artwork layer for one segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtworkLayer {
    /// Not drawn: inside view, no film, or no artwork supplied.
    Absent,
    /// Artwork is still loading; the segment was drawn without it.
    Pending,
    /// Artwork was drawn on the film face.
    Shown,
}

/// Which layers ended up in a segment frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentLayers {
    /// Lighting wash over the background.
    pub tint: LightingOverlay,
    /// Opposite scene bled through the holes.
    pub reverse_vision: bool,
    /// Film face drawn where the mask keeps.
    pub film: bool,
    /// Artwork state.
    pub artwork: ArtworkLayer,
    /// White boost alpha applied to the film face (0 when off).
    pub white_boost_alpha: f64,
}

/// Composited pixels of one segment.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentFrame {
    /// First viewport column covered by the segment.
    pub x: u32,
    /// Width in pixels (0 for a collapsed segment).
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, `width × height × 4` bytes.
    pub data: Vec<u8>,
    /// Layer summary.
    pub layers: SegmentLayers,
    /// Resolved geometry when a film was drawn.
    pub geometry: Option<PatternGeometry>,
}

impl SegmentFrame {
    /// Pixel at segment-local coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

/// Global viewport columns `[start, end)` covered by a slice.
///
/// Neighbouring slices that share a cut share the rounded boundary column, so slices tile the
/// viewport without gaps or overlaps.
pub fn slice_columns(viewport: ViewportMetrics, from_pct: f64, to_pct: f64) -> (u32, u32) {
    let w = viewport.width_px();
    let col = |pct: f64| -> u32 {
        let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
        (pct / 100.0 * w).round() as u32
    };
    let start = col(from_pct);
    let end = col(to_pct).max(start);
    (start, end)
}

/// Resolved film layer for one segment.
struct FilmPlan {
    geometry: PatternGeometry,
    mask: Arc<MaskBitmap>,
    face: PremulRgba8,
    artwork: Option<(CoverFit, PreparedImage)>,
    white_boost: f32,
}

/// Per-segment layer compositor.
///
/// Every sample is taken at the pixel centre in full-viewport coordinates, so a segment's pixels
/// are identical to the same columns of a full-width render.
pub struct Compositor {
    tuning: Tuning,
    strategy: MaskStrategy,
    cache: Arc<Mutex<MaskCache>>,
}

impl Compositor {
    /// Compositor backed by the process-wide mask cache.
    pub fn new(tuning: Tuning, strategy: MaskStrategy) -> Self {
        Self::with_cache(tuning, strategy, MaskCache::shared())
    }

    /// Compositor backed by a caller-owned mask cache.
    pub fn with_cache(
        tuning: Tuning,
        strategy: MaskStrategy,
        cache: Arc<Mutex<MaskCache>>,
    ) -> Self {
        Self {
            tuning,
            strategy,
            cache,
        }
    }

    /// Tuning in effect.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Mask strategy in effect.
    pub fn strategy(&self) -> MaskStrategy {
        self.strategy
    }

    /// Mask cache backing this compositor.
    pub fn cache(&self) -> &Arc<Mutex<MaskCache>> {
        &self.cache
    }

    /// Decide which layers a request produces without touching pixels.
    pub fn plan_layers(&self, req: &SegmentRequest<'_>) -> SegmentLayers {
        let ctx = req.context;
        let tint = lighting_overlay(ctx.side, ctx.lighting);
        let Some(product) = req.product.filter(|p| p.is_renderable()) else {
            return SegmentLayers {
                tint,
                reverse_vision: false,
                film: false,
                artwork: ArtworkLayer::Absent,
                white_boost_alpha: 0.0,
            };
        };

        let geometry = PatternGeometry::resolve(product, &ctx, self.tuning.reference_m);
        let outside = ctx.side == Side::Outside;
        let artwork = match (outside, req.scenes.artwork) {
            (true, ImageSlot::Ready(_)) => ArtworkLayer::Shown,
            (true, ImageSlot::Pending) => ArtworkLayer::Pending,
            _ => ArtworkLayer::Absent,
        };
        SegmentLayers {
            tint,
            reverse_vision: needs_reverse_vision(ctx.side, ctx.lighting)
                && req.scenes.opposite.ready().is_some()
                && self.tuning.reverse_vision_opacity_clamped() > 0.0,
            film: true,
            artwork,
            white_boost_alpha: if outside {
                self.tuning.white_boost_alpha(geometry.pitch_px)
            } else {
                0.0
            },
        }
    }

    /// Composite one segment.
    ///
    /// Never fails: a mask that cannot be built drops the film layer with a warning.
    #[tracing::instrument(
        level = "debug",
        skip(self, req),
        fields(from = req.slice_from_pct, to = req.slice_to_pct, film = req.product.is_some())
    )]
    pub fn compose_segment(&self, req: &SegmentRequest<'_>) -> SegmentFrame {
        if !req.viewport.is_measured() {
            tracing::warn!("viewport not measured; compositing at 1 px fallback size");
        }
        let (x0, x1) = slice_columns(req.viewport, req.slice_from_pct, req.slice_to_pct);
        let width = x1 - x0;
        let height = req.viewport.height.max(1);

        let mut layers = self.plan_layers(req);
        let film = if layers.film {
            match self.plan_film(req, &layers) {
                Ok(plan) => Some(plan),
                Err(err) => {
                    tracing::warn!(error = %err, "mask unavailable; drawing segment without film");
                    layers.film = false;
                    layers.reverse_vision = false;
                    layers.artwork = ArtworkLayer::Absent;
                    layers.white_boost_alpha = 0.0;
                    None
                }
            }
        } else {
            None
        };

        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        if width > 0 {
            let background = req
                .scenes
                .background
                .ready()
                .map(|img| (CoverFit::new(img.width, img.height, req.viewport), img));
            let opposite = if layers.reverse_vision {
                req.scenes
                    .opposite
                    .ready()
                    .map(|img| (CoverFit::new(img.width, img.height, req.viewport), img))
            } else {
                None
            };
            let bleed_opacity = self.tuning.reverse_vision_opacity_clamped() as f32;

            for gy in 0..height {
                let y = f64::from(gy) + 0.5;
                for gx in x0..x1 {
                    let x = f64::from(gx) + 0.5;
                    let mut px = match &background {
                        Some((fit, img)) => fit.sample(img, x, y),
                        None => OPAQUE_BLACK,
                    };
                    px = layers.tint.apply(px);

                    if let Some(plan) = &film {
                        let keep = plan.mask.sample(x, y);
                        if let Some((fit, img)) = &opposite {
                            let coverage = scaled_coverage(bleed_opacity, KEEP - keep);
                            px = over_u8(px, fit.sample(img, x, y), coverage);
                        }
                        if keep > 0 {
                            px = over_u8(px, plan.face_at(x, y), keep);
                        }
                    }
                    data.extend_from_slice(&px);
                }
            }
        }

        SegmentFrame {
            x: x0,
            width,
            height,
            data,
            layers,
            geometry: film.map(|plan| plan.geometry),
        }
    }

    fn plan_film(&self, req: &SegmentRequest<'_>, layers: &SegmentLayers) -> PerfResult<FilmPlan> {
        let product = req
            .product
            .ok_or_else(|| PerfError::validation("film layer requested without a product"))?;
        let geometry = PatternGeometry::resolve(product, &req.context, self.tuning.reference_m);
        let mask = self.mask_for(&geometry, req.viewport)?;

        let face = match req.context.side {
            Side::Inside => OPAQUE_BLACK,
            Side::Outside => OPAQUE_WHITE,
        };
        let artwork = match (layers.artwork, req.scenes.artwork) {
            (ArtworkLayer::Shown, ImageSlot::Ready(img)) => Some((
                CoverFit::new(img.width, img.height, req.viewport),
                img.clone(),
            )),
            _ => None,
        };
        Ok(FilmPlan {
            geometry,
            mask,
            face,
            artwork,
            white_boost: layers.white_boost_alpha as f32,
        })
    }

    fn mask_for(
        &self,
        geometry: &PatternGeometry,
        viewport: ViewportMetrics,
    ) -> PerfResult<Arc<MaskBitmap>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| PerfError::render("mask cache lock poisoned"))?;
        match self.strategy {
            MaskStrategy::Tiled { dpr } => cache.get_or_build_tile(
                geometry.lattice,
                geometry.pitch_px,
                geometry.radius_px,
                dpr,
            ),
            MaskStrategy::FullViewport => cache.get_or_build_viewport(
                geometry.lattice,
                geometry.pitch_px,
                geometry.radius_px,
                viewport,
            ),
        }
    }
}

impl FilmPlan {
    /// Film face colour at a viewport point: base, then artwork, then white boost.
    fn face_at(&self, x: f64, y: f64) -> PremulRgba8 {
        let mut face = self.face;
        if let Some((fit, img)) = &self.artwork {
            face = over(face, fit.sample(img, x, y), 1.0);
        }
        if self.white_boost > 0.0 {
            face = over(face, OPAQUE_WHITE, self.white_boost);
        }
        face
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
