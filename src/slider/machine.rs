use crate::config::catalog::ProductSpec;
use crate::config::tuning::Tuning;
use crate::foundation::core::{ViewingContext, ViewportMetrics};
use crate::slider::cuts::CutPositions;

/// One comparison segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Chip label.
    pub label: String,
    /// Film shown in this segment; `None` is the unmodified baseline.
    pub product: Option<ProductSpec>,
    /// Viewing context the segment is rendered under.
    pub context: ViewingContext,
}

impl Segment {
    /// Baseline segment without film.
    pub fn original(label: impl Into<String>, context: ViewingContext) -> Self {
        Self {
            label: label.into(),
            product: None,
            context,
        }
    }

    /// Segment showing `product`, labelled with the product label.
    pub fn with_film(product: ProductSpec, context: ViewingContext) -> Self {
        Self {
            label: product.label.clone(),
            product: Some(product),
            context,
        }
    }
}

/// Keyboard nudge direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards 0 %.
    Decrease,
    /// Towards 100 %.
    Increase,
}

/// Pointer interaction state. Only one handle is dragged at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// `handle` follows `pointer_id`.
    Dragging {
        /// Cut index being dragged.
        handle: usize,
        /// Pointer that owns the drag.
        pointer_id: u32,
    },
}

/// Input accepted by [`CompareSlider::handle_event`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SliderEvent {
    /// Pointer pressed on a handle.
    PointerDown {
        /// Handle under the pointer.
        handle: usize,
        /// Pointer id.
        pointer_id: u32,
    },
    /// Pointer moved; `x_px` is relative to the viewport's left edge.
    PointerMove {
        /// Pointer id.
        pointer_id: u32,
        /// Horizontal position.
        x_px: f64,
    },
    /// Pointer released.
    PointerUp {
        /// Pointer id.
        pointer_id: u32,
    },
    /// Pointer capture lost.
    PointerCancel {
        /// Pointer id.
        pointer_id: u32,
    },
    /// Arrow key on a focused handle.
    Key {
        /// Focused handle.
        handle: usize,
        /// Arrow direction.
        direction: Direction,
        /// Modifier held (large step).
        big: bool,
    },
    /// Viewport re-measured.
    Resize(ViewportMetrics),
}

/// Why an input produced no change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoopReason {
    /// Move/up/cancel arrived while idle.
    IdleWithoutActiveDrag,
    /// Another drag already owns the slider.
    DragAlreadyInProgress,
    /// Event came from a pointer that does not own the drag.
    PointerMismatch,
    /// Handle index out of range.
    UnknownHandle,
    /// Position was already at the requested (clamped) value.
    Unchanged,
    /// Non-finite coordinate.
    InvalidInput,
    /// Pointer position arrived before the viewport was measured.
    ViewportNotMeasured,
}

/// Outcome of one input, for diagnostics and host bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SliderEffect {
    /// Drag began.
    DragStarted {
        /// Handle.
        handle: usize,
        /// Owning pointer.
        pointer_id: u32,
    },
    /// A cut moved.
    Moved {
        /// Handle.
        handle: usize,
        /// New position in percent.
        pct: f64,
    },
    /// Drag finished normally.
    DragEnded {
        /// Handle.
        handle: usize,
    },
    /// Drag aborted; the last applied position stays.
    DragCancelled {
        /// Handle.
        handle: usize,
    },
    /// Viewport size updated.
    Resized(ViewportMetrics),
    /// Nothing happened.
    Noop(NoopReason),
}

/// Horizontal extent of one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSlice {
    /// Segment index.
    pub index: usize,
    /// Left edge in percent.
    pub from_pct: f64,
    /// Right edge in percent.
    pub to_pct: f64,
}

/// Where a handle and its guide line sit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandlePlacement {
    /// Cut index.
    pub index: usize,
    /// Position in percent.
    pub pct: f64,
    /// Position in viewport pixels.
    pub x_px: f64,
    /// Whether this handle is being dragged.
    pub active: bool,
}

type Observer = Box<dyn FnMut(&[f64]) + Send>;

/// N-segment comparison slider: cut positions plus the drag/keyboard state machine.
pub struct CompareSlider {
    segments: Vec<Segment>,
    initial: Option<Vec<f64>>,
    cuts: CutPositions,
    viewport: ViewportMetrics,
    drag: DragState,
    gap_pct: f64,
    step_pct: f64,
    big_step_pct: f64,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for CompareSlider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareSlider")
            .field("segments", &self.segments.len())
            .field("cuts", &self.cuts.values())
            .field("viewport", &self.viewport)
            .field("drag", &self.drag)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CompareSlider {
    /// Slider over `segments`, with optional caller cut positions (one per cut).
    ///
    /// Fewer than two segments is not a comparison; placeholder segments "A" and "B" are used.
    pub fn new(segments: Vec<Segment>, initial: Option<Vec<f64>>, tuning: &Tuning) -> Self {
        let segments = sanitize_segments(segments);
        let cuts = CutPositions::seed(segments.len(), initial.as_deref(), tuning.min_gap_pct);
        Self {
            segments,
            initial,
            cuts,
            viewport: ViewportMetrics::default(),
            drag: DragState::Idle,
            gap_pct: tuning.min_gap_pct,
            step_pct: tuning.key_step_pct,
            big_step_pct: tuning.key_step_big_pct,
            observers: Vec::new(),
        }
    }

    /// Register a callback receiving the positions on every change and at drag end.
    pub fn observe(&mut self, observer: impl FnMut(&[f64]) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Segments in display order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Replace the segments. A different count reseeds the cuts and ends any drag.
    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        let segments = sanitize_segments(segments);
        let reseed = segments.len() != self.segments.len();
        self.segments = segments;
        if reseed {
            self.cuts =
                CutPositions::seed(self.segments.len(), self.initial.as_deref(), self.gap_pct);
            self.drag = DragState::Idle;
            tracing::debug!(
                segments = self.segments.len(),
                cuts = ?self.cuts.values(),
                "reseeded cuts"
            );
            self.notify();
        }
    }

    /// Current cut positions in percent.
    pub fn positions(&self) -> &[f64] {
        self.cuts.values()
    }

    /// Cut positions with their gap.
    pub fn cuts(&self) -> &CutPositions {
        &self.cuts
    }

    /// Last measured viewport.
    pub fn viewport(&self) -> ViewportMetrics {
        self.viewport
    }

    /// Interaction state.
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Update the measured viewport. Positions are stored in percent and do not move.
    pub fn resize(&mut self, viewport: ViewportMetrics) -> SliderEffect {
        self.viewport = viewport;
        SliderEffect::Resized(viewport)
    }

    /// Start dragging `handle` with `pointer_id`.
    pub fn begin_drag(&mut self, handle: usize, pointer_id: u32) -> SliderEffect {
        if handle >= self.cuts.len() {
            return SliderEffect::Noop(NoopReason::UnknownHandle);
        }
        match self.drag {
            DragState::Idle => {
                self.drag = DragState::Dragging { handle, pointer_id };
                SliderEffect::DragStarted { handle, pointer_id }
            }
            DragState::Dragging { .. } => SliderEffect::Noop(NoopReason::DragAlreadyInProgress),
        }
    }

    /// Move the dragged handle to `x_px`. Moves from other pointers, and moves before the first
    /// measurement, are ignored.
    pub fn drag_update(&mut self, pointer_id: u32, x_px: f64) -> SliderEffect {
        let handle = match self.owned_handle(pointer_id) {
            Ok(handle) => handle,
            Err(reason) => return SliderEffect::Noop(reason),
        };
        if !self.viewport.is_measured() {
            return SliderEffect::Noop(NoopReason::ViewportNotMeasured);
        }
        if x_px.is_nan() {
            return SliderEffect::Noop(NoopReason::InvalidInput);
        }
        let pct = self.viewport.px_to_pct(x_px);
        self.move_to(handle, pct)
    }

    /// Finish the drag owned by `pointer_id`.
    pub fn end_drag(&mut self, pointer_id: u32) -> SliderEffect {
        match self.owned_handle(pointer_id) {
            Ok(handle) => {
                self.drag = DragState::Idle;
                self.notify();
                SliderEffect::DragEnded { handle }
            }
            Err(reason) => SliderEffect::Noop(reason),
        }
    }

    /// Abort whatever drag is in progress, keeping the last applied position.
    pub fn cancel_drag(&mut self) -> SliderEffect {
        match self.drag {
            DragState::Idle => SliderEffect::Noop(NoopReason::IdleWithoutActiveDrag),
            DragState::Dragging { handle, .. } => {
                self.drag = DragState::Idle;
                self.notify();
                SliderEffect::DragCancelled { handle }
            }
        }
    }

    /// Keyboard step on `handle`: 1 % or, with `big`, 5 % (per tuning).
    pub fn nudge(&mut self, handle: usize, direction: Direction, big: bool) -> SliderEffect {
        if matches!(self.drag, DragState::Dragging { .. }) {
            return SliderEffect::Noop(NoopReason::DragAlreadyInProgress);
        }
        let Some(current) = self.cuts.get(handle) else {
            return SliderEffect::Noop(NoopReason::UnknownHandle);
        };
        let step = if big { self.big_step_pct } else { self.step_pct };
        let target = match direction {
            Direction::Decrease => current - step,
            Direction::Increase => current + step,
        };
        self.move_to(handle, target)
    }

    /// Dispatch one input event.
    pub fn handle_event(&mut self, event: SliderEvent) -> SliderEffect {
        let effect = match event {
            SliderEvent::PointerDown { handle, pointer_id } => self.begin_drag(handle, pointer_id),
            SliderEvent::PointerMove { pointer_id, x_px } => self.drag_update(pointer_id, x_px),
            SliderEvent::PointerUp { pointer_id } => self.end_drag(pointer_id),
            SliderEvent::PointerCancel { pointer_id } => match self.owned_handle(pointer_id) {
                Ok(_) => self.cancel_drag(),
                Err(reason) => SliderEffect::Noop(reason),
            },
            SliderEvent::Key {
                handle,
                direction,
                big,
            } => self.nudge(handle, direction, big),
            SliderEvent::Resize(viewport) => self.resize(viewport),
        };
        tracing::trace!(?event, ?effect, "slider event");
        effect
    }

    /// `[from, to]` of every segment, left to right.
    pub fn slices(&self) -> Vec<SegmentSlice> {
        let cuts = self.cuts.values();
        (0..self.segments.len())
            .map(|index| SegmentSlice {
                index,
                from_pct: if index == 0 { 0.0 } else { cuts[index - 1] },
                to_pct: cuts.get(index).copied().unwrap_or(100.0),
            })
            .collect()
    }

    /// Handle and guide placements, one per cut.
    pub fn handles(&self) -> Vec<HandlePlacement> {
        let active = match self.drag {
            DragState::Dragging { handle, .. } => Some(handle),
            DragState::Idle => None,
        };
        self.cuts
            .values()
            .iter()
            .enumerate()
            .map(|(index, &pct)| HandlePlacement {
                index,
                pct,
                x_px: self.viewport.pct_to_px(pct),
                active: active == Some(index),
            })
            .collect()
    }

    fn owned_handle(&self, pointer_id: u32) -> Result<usize, NoopReason> {
        match self.drag {
            DragState::Idle => Err(NoopReason::IdleWithoutActiveDrag),
            DragState::Dragging {
                handle,
                pointer_id: owner,
            } if owner == pointer_id => Ok(handle),
            DragState::Dragging { .. } => Err(NoopReason::PointerMismatch),
        }
    }

    fn move_to(&mut self, handle: usize, pct: f64) -> SliderEffect {
        match self.cuts.set(handle, pct) {
            Some(pct) => {
                self.notify();
                SliderEffect::Moved { handle, pct }
            }
            None => SliderEffect::Noop(NoopReason::Unchanged),
        }
    }

    fn notify(&mut self) {
        let values = self.cuts.values().to_vec();
        for observer in &mut self.observers {
            observer(&values);
        }
    }
}

fn sanitize_segments(segments: Vec<Segment>) -> Vec<Segment> {
    if segments.len() >= 2 {
        return segments;
    }
    tracing::warn!(
        got = segments.len(),
        "comparison needs at least two segments; using placeholders"
    );
    let context = segments
        .first()
        .map(|s| s.context)
        .unwrap_or_default();
    vec![
        Segment::original("A", context),
        Segment::original("B", context),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/slider/machine.rs"]
mod tests;
