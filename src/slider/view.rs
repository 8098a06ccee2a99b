//! Full comparison frame: every segment composited into its slice of one viewport, then divider
//! guides and drag handles drawn on top with `vello_cpu`.

use vello_cpu::kurbo::Shape as _;

use crate::foundation::error::{PerfError, PerfResult};
use crate::render::blend::over_in_place;
use crate::render::compositor::{
    Compositor, SceneImages, SegmentFrame, SegmentLayers, SegmentRequest,
};
use crate::slider::machine::{CompareSlider, HandlePlacement, SegmentSlice};

/// Handle diameter in pixels.
pub const HANDLE_DIAMETER_PX: f64 = 44.0;
/// White ring width around the handle.
pub const HANDLE_RING_PX: f64 = 2.0;
/// Divider guide width.
pub const GUIDE_WIDTH_PX: f64 = 2.0;
/// Divider guide dash length; gaps are the same length.
pub const GUIDE_DASH_PX: f64 = 6.0;
/// Divider guide opacity.
pub const GUIDE_ALPHA: u8 = 153;
/// Segments narrower than this hide their label chip.
pub const MIN_LABEL_SEGMENT_PX: f64 = 48.0;

const CIRCLE_TOLERANCE: f64 = 0.1;

/// What the host wants drawn around the composite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewOptions {
    /// Emit label chip placements.
    pub show_labels: bool,
    /// Emit legend entries.
    pub show_legend: bool,
    /// Draw guides and handles into the frame.
    pub draw_handles: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_labels: true,
            show_legend: true,
            draw_handles: true,
        }
    }
}

/// Label chip anchored over a segment; the host draws the text.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelChip {
    /// Segment index.
    pub segment: usize,
    /// Text.
    pub label: String,
    /// Horizontal centre of the segment in pixels.
    pub center_x_px: f64,
    /// Whether the segment is wide enough to show the chip.
    pub visible: bool,
}

/// One legend row describing a segment.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    /// Segment label.
    pub label: String,
    /// Product id, `None` for the baseline.
    pub product_id: Option<String>,
    /// Nominal open area in percent.
    pub open_area_pct: Option<f64>,
    /// Drawn pitch in pixels.
    pub pitch_px: Option<f64>,
    /// Drawn hole radius in pixels.
    pub radius_px: Option<f64>,
}

/// A rendered comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub frame: Vec<u8>,
    /// Segment extents used for this frame.
    pub slices: Vec<SegmentSlice>,
    /// Layers that ended up in each segment.
    pub layers: Vec<SegmentLayers>,
    /// Handle placements.
    pub handles: Vec<HandlePlacement>,
    /// Label chips (empty when labels are off).
    pub labels: Vec<LabelChip>,
    /// Legend rows (empty when the legend is off).
    pub legend: Vec<LegendEntry>,
}

impl ViewFrame {
    /// Pixel at frame coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([self.frame[i], self.frame[i + 1], self.frame[i + 2], self.frame[i + 3]])
    }
}

/// Renders a [`CompareSlider`] into one frame.
pub struct CompareView {
    compositor: Compositor,
    options: ViewOptions,
}

impl CompareView {
    /// View using `compositor` for segment pixels.
    pub fn new(compositor: Compositor, options: ViewOptions) -> Self {
        Self {
            compositor,
            options,
        }
    }

    /// Compositor in use.
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Render every segment of `slider` at its current cut positions and viewport.
    ///
    /// Fails only when the frame is too large for the overlay rasterizer.
    #[tracing::instrument(level = "debug", skip_all, fields(segments = slider.segments().len()))]
    pub fn render(&self, slider: &CompareSlider, scenes: SceneImages<'_>) -> PerfResult<ViewFrame> {
        let viewport = slider.viewport();
        let width = viewport.width.max(1);
        let height = viewport.height.max(1);
        let mut frame = vec![0u8; (width as usize) * (height as usize) * 4];

        let slices = slider.slices();
        let mut layers = Vec::with_capacity(slices.len());
        let mut legend = Vec::new();
        let mut labels = Vec::new();

        for (slice, segment) in slices.iter().zip(slider.segments()) {
            let seg = self.compositor.compose_segment(&SegmentRequest {
                product: segment.product.as_ref(),
                context: segment.context,
                viewport,
                slice_from_pct: slice.from_pct,
                slice_to_pct: slice.to_pct,
                scenes,
            });
            blit(&mut frame, width, &seg);
            layers.push(seg.layers);

            if self.options.show_labels {
                let from = viewport.pct_to_px(slice.from_pct);
                let to = viewport.pct_to_px(slice.to_pct);
                labels.push(LabelChip {
                    segment: slice.index,
                    label: segment.label.clone(),
                    center_x_px: (from + to) / 2.0,
                    visible: to - from >= MIN_LABEL_SEGMENT_PX,
                });
            }
            if self.options.show_legend {
                legend.push(LegendEntry {
                    label: segment.label.clone(),
                    product_id: segment.product.as_ref().map(|p| p.id.clone()),
                    open_area_pct: segment.product.as_ref().map(|p| p.open_area * 100.0),
                    pitch_px: seg.geometry.map(|g| g.pitch_px),
                    radius_px: seg.geometry.map(|g| g.radius_px),
                });
            }
        }

        let handles = slider.handles();
        if self.options.draw_handles && !handles.is_empty() {
            let overlay = draw_overlay(width, height, &handles)?;
            over_in_place(&mut frame, &overlay, 1.0)?;
        }

        Ok(ViewFrame {
            width,
            height,
            frame,
            slices,
            layers,
            handles,
            labels,
            legend,
        })
    }
}

fn blit(frame: &mut [u8], frame_width: u32, seg: &SegmentFrame) {
    if seg.width == 0 {
        return;
    }
    let row_bytes = seg.width as usize * 4;
    for y in 0..seg.height as usize {
        let dst = (y * frame_width as usize + seg.x as usize) * 4;
        let src = y * row_bytes;
        frame[dst..dst + row_bytes].copy_from_slice(&seg.data[src..src + row_bytes]);
    }
}

/// Dashed guides at every cut and a round handle centred vertically on each.
fn draw_overlay(width: u32, height: u32, handles: &[HandlePlacement]) -> PerfResult<Vec<u8>> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PerfError::render(format!("frame width exceeds u16: {width}")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PerfError::render(format!("frame height exceeds u16: {height}")))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    let fh = f64::from(height);

    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, GUIDE_ALPHA));
    for handle in handles {
        let x0 = handle.x_px - GUIDE_WIDTH_PX / 2.0;
        let mut y = 0.0;
        while y < fh {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                x0,
                y,
                x0 + GUIDE_WIDTH_PX,
                (y + GUIDE_DASH_PX).min(fh),
            ));
            y += 2.0 * GUIDE_DASH_PX;
        }
    }

    let cy = fh / 2.0;
    let outer = HANDLE_DIAMETER_PX / 2.0;
    for handle in handles {
        let center = (handle.x_px, cy);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        let ring = vello_cpu::kurbo::Circle::new(center, outer);
        ctx.fill_path(&ring.to_path(CIRCLE_TOLERANCE));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        let face = vello_cpu::kurbo::Circle::new(center, outer - HANDLE_RING_PX);
        ctx.fill_path(&face.to_path(CIRCLE_TOLERANCE));
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/slider/view.rs"]
mod tests;
