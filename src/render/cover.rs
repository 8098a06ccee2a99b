use crate::assets::store::PreparedImage;
use crate::foundation::core::{Affine, Point, ViewportMetrics};

/// "Cover" placement of an image over the full viewport: scaled to fill, centred, overflow
/// cropped. Every segment samples through the same fit so one image reads continuously across
/// all of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Uniform image → viewport scale.
    pub scale: f64,
    /// Viewport x of the image's left edge (≤ 0 when cropped).
    pub left: f64,
    /// Viewport y of the image's top edge.
    pub top: f64,
    image_w: u32,
    image_h: u32,
}

impl CoverFit {
    /// Fit an `image_w × image_h` image over the viewport. Zero sizes fall back to 1 px.
    pub fn new(image_w: u32, image_h: u32, viewport: ViewportMetrics) -> Self {
        let (iw, ih) = (f64::from(image_w.max(1)), f64::from(image_h.max(1)));
        let (vw, vh) = (viewport.width_px(), viewport.height_px());
        let scale = (vw / iw).max(vh / ih);
        Self {
            scale,
            left: (vw - iw * scale) / 2.0,
            top: (vh - ih * scale) / 2.0,
            image_w: image_w.max(1),
            image_h: image_h.max(1),
        }
    }

    /// Image space → viewport space.
    pub fn affine(&self) -> Affine {
        Affine::translate((self.left, self.top)) * Affine::scale(self.scale)
    }

    /// Image pixel shown at a viewport-space point (nearest neighbour, clamped to the image).
    pub fn source_pixel(&self, x: f64, y: f64) -> (u32, u32) {
        let p = Point::new((x - self.left) / self.scale, (y - self.top) / self.scale);
        let sx = p.x.floor().clamp(0.0, f64::from(self.image_w - 1)) as u32;
        let sy = p.y.floor().clamp(0.0, f64::from(self.image_h - 1)) as u32;
        (sx, sy)
    }

    /// Sample `image` at a viewport-space point.
    pub fn sample(&self, image: &PreparedImage, x: f64, y: f64) -> [u8; 4] {
        let (sx, sy) = self.source_pixel(x, y);
        image.pixel(sx, sy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
