//! perfview previews perforated window film.
//!
//! A product's physical specification (open area, hole diameter, lattice) becomes a pixel-exact
//! perforation pattern, which is composited with lighting, reverse vision, and printed artwork
//! and compared side by side across any number of resizable segments:
//!
//! - Resolve geometry with [`PatternGeometry::resolve`]
//! - Rasterize and cache masks through [`MaskCache`]
//! - Composite segments with [`Compositor`]
//! - Drive the comparison with [`CompareSlider`] and draw it with [`CompareView`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod foundation;
mod geometry;
mod lighting;
mod mask;
mod render;
mod slider;

pub use crate::foundation::core::{
    Affine, Lattice, Lighting, Point, Rect, Rgba8Premul, Side, Vec2, ViewingContext,
    ViewportMetrics,
};
pub use crate::foundation::error::{PerfError, PerfResult};

pub use crate::assets::decode::decode_image;
pub use crate::assets::store::{ImageSlot, PreparedImage};
pub use crate::config::catalog::{ProductCatalog, ProductSpec};
pub use crate::config::tuning::{REVERSE_VISION_MAX_OPACITY, Tuning};
pub use crate::geometry::lattice::{
    MAX_DISTANCE_M, MAX_PITCH_PX, MIN_DISTANCE_M, MIN_PITCH_PX, MIN_RADIUS_PX, clamp_distance_m,
    clamp_radius_px, hole_radius_px_from_open_area, open_area_from_radius,
    pitch_mm_from_open_area, pitch_px_from_mm, pitch_y, radius_scale_from_distance,
};
pub use crate::geometry::pattern::PatternGeometry;
pub use crate::lighting::resolver::{LightingOverlay, Tone, lighting_overlay, needs_reverse_vision};
pub use crate::mask::bitmap::{CUT, KEEP, MaskBitmap, MaskLayout};
pub use crate::mask::cache::{DEFAULT_MASK_CACHE_CAPACITY, MaskCache, MaskCacheStats, MaskKey};
pub use crate::mask::raster::{
    AA_INFLATE_PX, MIN_TILE_PX, build_tile, build_viewport, tile_cell_size, tile_hole_centers,
};
pub use crate::render::compositor::{
    ArtworkLayer, Compositor, MaskStrategy, SceneImages, SegmentFrame, SegmentLayers,
    SegmentRequest, slice_columns,
};
pub use crate::render::cover::CoverFit;
pub use crate::slider::cuts::CutPositions;
pub use crate::slider::machine::{
    CompareSlider, Direction, DragState, HandlePlacement, NoopReason, Segment, SegmentSlice,
    SliderEffect, SliderEvent,
};
pub use crate::slider::view::{
    CompareView, GUIDE_ALPHA, GUIDE_DASH_PX, GUIDE_WIDTH_PX, HANDLE_DIAMETER_PX, HANDLE_RING_PX,
    LabelChip, LegendEntry, MIN_LABEL_SEGMENT_PX, ViewFrame, ViewOptions,
};
