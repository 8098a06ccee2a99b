use std::sync::Arc;

use crate::foundation::error::{PerfError, PerfResult};

#[derive(Clone, Debug, PartialEq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap already premultiplied bytes, checking the length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> PerfResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PerfError::validation("image size overflow"))?;
        if width == 0 || height == 0 {
            return Err(PerfError::validation("image must have non-zero size"));
        }
        if rgba8_premul.len() != expected {
            return Err(PerfError::validation(
                "image bytes must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Single-color image.
    pub fn solid(width: u32, height: u32, px: [u8; 4]) -> PerfResult<Self> {
        Self::from_premul(width, height, px.repeat(width as usize * height as usize))
    }

    /// Pixel at integer coordinates, clamped to the edges.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        let d = &self.rgba8_premul;
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }
}

/// Host-supplied image that may not be available yet.
///
/// Layers that depend on an image are skipped while it is [`ImageSlot::Missing`] or
/// [`ImageSlot::Pending`]; the host re-renders once it calls [`ImageSlot::resolve`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ImageSlot {
    /// No image configured.
    #[default]
    Missing,
    /// Decode/load in flight; natural dimensions unknown.
    Pending,
    /// Decoded and ready to sample.
    Ready(PreparedImage),
}

impl ImageSlot {
    /// The image when ready.
    pub fn ready(&self) -> Option<&PreparedImage> {
        match self {
            Self::Ready(img) => Some(img),
            Self::Missing | Self::Pending => None,
        }
    }

    /// Natural dimensions once known.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.ready().map(|img| (img.width, img.height))
    }

    /// Complete a pending load. A failed decode leaves the slot missing.
    pub fn resolve(&mut self, loaded: PerfResult<PreparedImage>) {
        *self = match loaded {
            Ok(img) => Self::Ready(img),
            Err(err) => {
                tracing::warn!(%err, "image load failed; layer omitted");
                Self::Missing
            }
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
