use std::sync::{Arc, Mutex};

use super::*;
use crate::assets::store::ImageSlot;
use crate::config::catalog::ProductSpec;
use crate::config::tuning::Tuning;
use crate::foundation::core::{Lattice, ViewingContext, ViewportMetrics};
use crate::mask::cache::MaskCache;
use crate::render::compositor::MaskStrategy;
use crate::slider::machine::Segment;

fn view(options: ViewOptions) -> CompareView {
    let compositor = Compositor::with_cache(
        Tuning::default(),
        MaskStrategy::default(),
        Arc::new(Mutex::new(MaskCache::new(8))),
    );
    CompareView::new(compositor, options)
}

fn originals(n: usize) -> Vec<Segment> {
    (0..n)
        .map(|i| Segment::original(format!("S{i}"), ViewingContext::default()))
        .collect()
}

fn slider(segments: Vec<Segment>, w: u32, h: u32) -> CompareSlider {
    let mut s = CompareSlider::new(segments, None, &Tuning::default());
    s.resize(ViewportMetrics::new(w, h));
    s
}

static NONE: ImageSlot = ImageSlot::Missing;

fn scenes() -> SceneImages<'static> {
    SceneImages {
        background: &NONE,
        opposite: &NONE,
        artwork: &NONE,
    }
}

#[test]
fn frame_is_the_segments_plus_handles() {
    let v = view(ViewOptions::default());
    let s = slider(originals(3), 240, 80);
    let out = v.render(&s, scenes()).unwrap();

    assert_eq!((out.width, out.height), (240, 80));
    assert_eq!(out.frame.len(), 240 * 80 * 4);
    assert_eq!(out.slices.len(), 3);
    assert_eq!(out.handles.len(), 2);

    let plain = v.compositor().compose_segment(&SegmentRequest {
        product: None,
        context: ViewingContext::default(),
        viewport: ViewportMetrics::new(240, 80),
        slice_from_pct: 0.0,
        slice_to_pct: 100.0,
        scenes: scenes(),
    });
    // Away from guides and handles the frame is the composite.
    assert_eq!(out.pixel(5, 5), plain.pixel(5, 5));
    assert_eq!(out.pixel(230, 75), plain.pixel(230, 75));
    // Gap between guide dashes.
    assert_eq!(out.pixel(79, 8), plain.pixel(79, 8));

    // Dashed guide over the first cut (x = 79.2).
    let guide = out.pixel(79, 2).unwrap();
    assert!(guide[0] > 120, "{guide:?}");

    // Handle: black body, white ring.
    assert_eq!(out.pixel(79, 40), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(100, 40), Some([255, 255, 255, 255]));
}

#[test]
fn handles_can_be_left_to_the_host() {
    let v = view(ViewOptions {
        draw_handles: false,
        ..ViewOptions::default()
    });
    let s = slider(originals(2), 60, 40);
    let out = v.render(&s, scenes()).unwrap();
    let first = out.pixel(0, 0);
    assert!((0..60).all(|x| out.pixel(x, 20) == first));
}

#[test]
fn labels_and_legend_follow_options() {
    let ctx = ViewingContext::default();
    let film = ProductSpec::new("p30", "30%", 0.3, 1.5, Lattice::Hex);
    let segments = vec![
        Segment::original("Original", ctx),
        Segment::with_film(film, ctx),
    ];
    let mut s = slider(segments, 200, 40);
    s.nudge(0, crate::slider::machine::Direction::Decrease, true);

    let out = view(ViewOptions::default()).render(&s, scenes()).unwrap();
    assert_eq!(out.labels.len(), 2);
    assert_eq!(out.labels[1].label, "30%");
    assert!((out.labels[0].center_x_px - 45.0).abs() < 1e-9);
    assert!(out.labels.iter().all(|l| l.visible));

    assert_eq!(out.legend.len(), 2);
    assert_eq!(out.legend[0].product_id, None);
    assert_eq!(out.legend[0].pitch_px, None);
    assert_eq!(out.legend[1].product_id.as_deref(), Some("p30"));
    assert!(out.legend[1].pitch_px.unwrap() >= 2.0);
    assert!(out.layers[1].film);
    assert!(!out.layers[0].film);

    let bare = view(ViewOptions {
        show_labels: false,
        show_legend: false,
        draw_handles: true,
    })
    .render(&s, scenes())
    .unwrap();
    assert!(bare.labels.is_empty());
    assert!(bare.legend.is_empty());
}

#[test]
fn narrow_segments_hide_their_label() {
    let mut s = slider(originals(3), 200, 40);
    s.begin_drag(0, 1);
    s.drag_update(1, 0.0);
    let out = view(ViewOptions::default()).render(&s, scenes()).unwrap();
    assert!(!out.labels[0].visible);
    assert!(out.labels[1].visible);
}

#[test]
fn unmeasured_viewport_renders_one_pixel() {
    let s = CompareSlider::new(originals(2), None, &Tuning::default());
    let out = view(ViewOptions::default()).render(&s, scenes()).unwrap();
    assert_eq!((out.width, out.height), (1, 1));
    assert_eq!(out.frame.len(), 4);
}

#[test]
fn oversized_frames_are_rejected() {
    let s = slider(originals(2), 70_000, 1);
    let err = view(ViewOptions::default()).render(&s, scenes()).unwrap_err();
    assert!(matches!(err, PerfError::Render(_)));
}
