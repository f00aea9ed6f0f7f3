//! The drag lifecycle state machine.
//!
//! `transition` is pure: it consumes the current state by reference, never
//! mutates it, and returns a new state plus the side effects the engine
//! must apply (event emission, class toggles, ghost operations). Keeping
//! effects as data is what makes the immutability and state-invariant
//! properties directly testable.
//!
//! ## Transitions
//!
//! ```text
//! Idle     -> Pending    (start on a resolvable draggable)
//! Pending  -> Dragging   (move past the distance threshold)
//! Dragging <-> Hovering  (move; hit test accepts / rejects)
//! Pending  -> Idle       (end before threshold - a click, silent)
//! Hovering -> Dropped    (end over an accepting zone)
//! Dragging -> Cancelled  (end with no valid zone)
//! non-Idle -> Cancelled  (cancel, e.g. Escape)
//! ```
//!
//! `Dropped` and `Cancelled` never persist: the returned state is always a
//! fresh `Idle`, and the terminal phase is visible only in the `dragend`
//! event carried by the effects.

use std::cell::Cell;

use tracing::debug;

use crate::config::{Axis, DraggableConfig};
use crate::constants::{CLASS_DRAGGING, CLASS_DRAG_OVER, DRAG_THRESHOLD};
use crate::events::DragEvent;
use crate::registry::DropZoneRegistry;
use crate::spatial::SpatialIndex;
use crate::types::{DragPhase, DragState, ElementId, Point};

/// A draggable resolved from the event target by the engine, before the
/// signal reaches the state machine.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSource {
    pub element: ElementId,
    pub config: DraggableConfig,
}

/// Normalized input signal driving the state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum DragSignal {
    Start {
        /// `None` when the event target had no draggable ancestor or its
        /// config failed to resolve; the transition is then a no-op.
        source: Option<ResolvedSource>,
        position: Point,
        timestamp_ms: f64,
    },
    Move {
        position: Point,
        timestamp_ms: f64,
    },
    End {
        position: Point,
        timestamp_ms: f64,
    },
    Cancel,
}

/// Side effect for the engine to apply after a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Emit(DragEvent),
    AddClass(ElementId, &'static str),
    RemoveClass(ElementId, &'static str),
    CreateGhost { source: ElementId, position: Point },
    MoveGhost { position: Point },
    ReleaseGhost,
}

/// Read-only context a transition may consult. The state machine shares the
/// registry and index with the keyboard controller but owns neither.
pub struct TransitionCtx<'a> {
    pub index: &'a SpatialIndex,
    pub registry: &'a DropZoneRegistry,
    /// Accumulated spatial-query time for this transition, drained by the
    /// engine into the perf monitor afterwards.
    query_ms: Cell<f64>,
}

impl<'a> TransitionCtx<'a> {
    pub fn new(index: &'a SpatialIndex, registry: &'a DropZoneRegistry) -> Self {
        Self {
            index,
            registry,
            query_ms: Cell::new(0.0),
        }
    }

    fn hit_test(&self, p: Point, drag_type: &str) -> Option<&'a crate::types::DropZone> {
        let (hit, elapsed) = crate::perf::measure(|| self.index.hit_test(p, drag_type));
        self.query_ms.set(self.query_ms.get() + elapsed);
        hit
    }

    /// Total milliseconds spent in spatial queries since construction.
    pub fn query_ms(&self) -> f64 {
        self.query_ms.get()
    }
}

/// Result of one transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub next: DragState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &DragState) -> Self {
        Self {
            next: state.clone(),
            effects: Vec::new(),
        }
    }
}

/// Apply one input signal to the current state.
pub fn transition(state: &DragState, signal: &DragSignal, ctx: &TransitionCtx<'_>) -> Transition {
    match signal {
        DragSignal::Start {
            source,
            position,
            timestamp_ms,
        } => start(state, source.as_ref(), *position, *timestamp_ms),
        DragSignal::Move {
            position,
            timestamp_ms,
        } => pointer_move(state, *position, *timestamp_ms, ctx),
        DragSignal::End {
            position,
            timestamp_ms,
        } => end(state, *position, *timestamp_ms, ctx),
        DragSignal::Cancel => cancel(state, ctx),
    }
}

fn start(
    state: &DragState,
    source: Option<&ResolvedSource>,
    position: Point,
    timestamp_ms: f64,
) -> Transition {
    if state.phase != DragPhase::Idle {
        return Transition::unchanged(state);
    }
    let Some(source) = source else {
        debug!("start ignored: no draggable ancestor or unresolved config");
        return Transition::unchanged(state);
    };

    Transition {
        next: DragState {
            phase: DragPhase::Pending,
            element: Some(source.element),
            drag_type: Some(source.config.drag_type.clone()),
            data: source.config.data.clone(),
            config: source.config.clone(),
            position,
            start_position: position,
            drop_zone: None,
            ghost: None,
            timestamp_ms,
        },
        effects: Vec::new(),
    }
}

fn pointer_move(
    state: &DragState,
    position: Point,
    timestamp_ms: f64,
    ctx: &TransitionCtx<'_>,
) -> Transition {
    match state.phase {
        DragPhase::Pending => promote(state, position, timestamp_ms),
        DragPhase::Dragging | DragPhase::Hovering => hover(state, position, timestamp_ms, ctx),
        _ => Transition::unchanged(state),
    }
}

/// Pending -> Dragging once the pointer has travelled the threshold.
fn promote(state: &DragState, position: Point, timestamp_ms: f64) -> Transition {
    let Some(element) = state.element else {
        return Transition::unchanged(state);
    };
    if state.start_position.distance_to(position) < DRAG_THRESHOLD {
        return Transition::unchanged(state);
    }

    let position = constrain(state.config.axis, state.start_position, position);
    let mut effects = vec![
        Effect::Emit(DragEvent::DragStart {
            element,
            drag_type: state.drag_type.clone().unwrap_or_default(),
            data: state.data.clone(),
            x: position.x,
            y: position.y,
        }),
        Effect::AddClass(element, CLASS_DRAGGING),
    ];
    if state.config.ghost {
        effects.push(Effect::CreateGhost {
            source: element,
            position,
        });
    }

    Transition {
        next: DragState {
            phase: DragPhase::Dragging,
            position,
            timestamp_ms,
            ..state.clone()
        },
        effects,
    }
}

/// Dragging/Hovering move: re-query the index, toggle zone classes on
/// enter/leave, and keep the ghost tracking the pointer.
fn hover(
    state: &DragState,
    position: Point,
    timestamp_ms: f64,
    ctx: &TransitionCtx<'_>,
) -> Transition {
    let position = constrain(state.config.axis, state.start_position, position);
    let drag_type = state.drag_type.as_deref().unwrap_or_default();
    let hit = ctx.hit_test(position, drag_type);
    let hit_id = hit.map(|z| z.id);

    let mut effects = Vec::new();
    if hit_id != state.drop_zone {
        if let Some(old) = state.drop_zone.and_then(|id| ctx.registry.get(id)) {
            effects.push(Effect::RemoveClass(old.element, CLASS_DRAG_OVER));
        }
        if let Some(zone) = hit {
            effects.push(Effect::AddClass(zone.element, CLASS_DRAG_OVER));
        }
    }
    if state.config.ghost {
        effects.push(Effect::MoveGhost { position });
    }

    Transition {
        next: DragState {
            phase: if hit_id.is_some() {
                DragPhase::Hovering
            } else {
                DragPhase::Dragging
            },
            position,
            drop_zone: hit_id,
            timestamp_ms,
            ..state.clone()
        },
        effects,
    }
}

fn end(
    state: &DragState,
    position: Point,
    _timestamp_ms: f64,
    ctx: &TransitionCtx<'_>,
) -> Transition {
    let Some(element) = state.element else {
        return Transition::unchanged(state);
    };
    match state.phase {
        DragPhase::Idle | DragPhase::Dropped | DragPhase::Cancelled => {
            Transition::unchanged(state)
        }
        // No threshold crossed: this was a click, not a drag. Silent reset.
        DragPhase::Pending => Transition {
            next: DragState::idle(),
            effects: Vec::new(),
        },
        DragPhase::Hovering => {
            let zone = state.drop_zone.and_then(|id| ctx.registry.get(id));
            match zone {
                Some(zone) => {
                    let position = constrain(state.config.axis, state.start_position, position);
                    let mut effects = vec![Effect::Emit(DragEvent::Drop {
                        element,
                        drop_zone: zone.name.clone(),
                        drag_type: state.drag_type.clone().unwrap_or_default(),
                        data: state.data.clone(),
                        x: position.x,
                        y: position.y,
                        keyboard: false,
                    })];
                    effects.push(Effect::RemoveClass(zone.element, CLASS_DRAG_OVER));
                    push_cleanup(&mut effects, element, state);
                    effects.push(Effect::Emit(DragEvent::DragEnd {
                        element,
                        drop_zone: Some(zone.name.clone()),
                        success: true,
                        cancelled: false,
                    }));
                    Transition {
                        next: DragState::idle(),
                        effects,
                    }
                }
                // The hovered zone was unregistered under us; resolve as a
                // cancelled drop.
                None => abort(state, element, ctx, false),
            }
        }
        DragPhase::Dragging => abort(state, element, ctx, false),
    }
}

fn cancel(state: &DragState, ctx: &TransitionCtx<'_>) -> Transition {
    match state.phase {
        // Idempotent: cancelling while idle is a no-op.
        DragPhase::Idle | DragPhase::Dropped | DragPhase::Cancelled => {
            Transition::unchanged(state)
        }
        _ => {
            let Some(element) = state.element else {
                return Transition::unchanged(state);
            };
            abort(state, element, ctx, true)
        }
    }
}

/// Shared teardown for cancelled and failed drags: clear zone highlight,
/// release the ghost, unmark the source, then report `dragend`.
fn abort(
    state: &DragState,
    element: ElementId,
    ctx: &TransitionCtx<'_>,
    cancelled: bool,
) -> Transition {
    let mut effects = Vec::new();
    if let Some(zone) = state.drop_zone.and_then(|id| ctx.registry.get(id)) {
        effects.push(Effect::RemoveClass(zone.element, CLASS_DRAG_OVER));
    }
    // A pending drag has no ghost or dragging class yet.
    if state.phase != DragPhase::Pending {
        push_cleanup(&mut effects, element, state);
    }
    effects.push(Effect::Emit(DragEvent::DragEnd {
        element,
        drop_zone: None,
        success: false,
        cancelled,
    }));
    Transition {
        next: DragState::idle(),
        effects,
    }
}

fn push_cleanup(effects: &mut Vec<Effect>, element: ElementId, state: &DragState) {
    effects.push(Effect::RemoveClass(element, CLASS_DRAGGING));
    if state.config.ghost {
        effects.push(Effect::ReleaseGhost);
    }
}

/// Clamp motion to the configured axis, relative to the start position.
fn constrain(axis: Axis, start: Point, p: Point) -> Point {
    match axis {
        Axis::Free => p,
        Axis::X => Point::new(p.x, start.y),
        Axis::Y => Point::new(start.x, p.y),
    }
}
