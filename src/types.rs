//! Core types for the drag-and-drop engine.
//!
//! This module defines the fundamental data structures used throughout the
//! engine: geometry primitives, element handles, the drag lifecycle state,
//! and registered drop zones.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::DraggableConfig;
use crate::constants::ACCEPT_WILDCARD;

// ============================================================================
// Geometry
// ============================================================================

/// A point in host coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle in host coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// A rectangle with no usable area. The spatial index refuses to index
    /// these and falls back to linear scanning instead.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Opaque handle to a host element. The engine never interprets the value;
/// the host maps it back to whatever its element representation is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Identifier of a registered drop zone. Assigned monotonically at
/// registration, so ascending `ZoneId` order is registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub u64);

/// Handle to an active ghost created by the ghost renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostHandle(pub u64);

// ============================================================================
// Drag Lifecycle
// ============================================================================

/// Phase of the drag lifecycle.
///
/// `Dropped` and `Cancelled` are terminal: the engine resets to a fresh
/// `Idle` state immediately after reaching them, so they are only ever
/// observed as the reason reported in the `dragend` event, never as a
/// persisted state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragPhase {
    #[default]
    Idle,
    Pending,
    Dragging,
    Hovering,
    Dropped,
    Cancelled,
}

/// The single live drag state of an engine instance.
///
/// Immutable value: every transition produces a new instance, never an
/// in-place mutation. Exactly one `DragState` is live per engine at any
/// time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragState {
    pub phase: DragPhase,
    /// Source element of the drag, once a draggable ancestor resolved.
    pub element: Option<ElementId>,
    /// Resolved drag type of the source element.
    pub drag_type: Option<String>,
    /// Payload attached to the source element.
    pub data: serde_json::Map<String, serde_json::Value>,
    /// Full resolved configuration of the source element.
    pub config: DraggableConfig,
    /// Latest pointer position.
    pub position: Point,
    /// Pointer position captured when the drag became pending.
    pub start_position: Point,
    /// Zone currently hovered, when `phase == Hovering`.
    pub drop_zone: Option<ZoneId>,
    /// Ghost created for this drag, once past the threshold.
    pub ghost: Option<GhostHandle>,
    /// Timestamp of the event that produced this state, in milliseconds.
    pub timestamp_ms: f64,
}

impl DragState {
    /// A fresh idle state.
    pub fn idle() -> Self {
        Self::default()
    }

    /// True exactly for the `Pending`, `Dragging` and `Hovering` phases.
    pub fn is_dragging(&self) -> bool {
        matches!(
            self.phase,
            DragPhase::Pending | DragPhase::Dragging | DragPhase::Hovering
        )
    }
}

// ============================================================================
// Drop Zones
// ============================================================================

/// A registered drop target region.
#[derive(Clone, Debug, PartialEq)]
pub struct DropZone {
    pub id: ZoneId,
    /// Host element backing this zone; its rect is re-read on resize.
    pub element: ElementId,
    pub name: String,
    /// Accepted drag types. Never empty: an absent accept list defaults to
    /// the wildcard set `{"*"}` at config resolution.
    pub accepts: BTreeSet<String>,
    pub priority: i32,
    pub bounds: Rect,
    pub sort: bool,
}

impl DropZone {
    /// Whether this zone accepts the given drag type, directly or via the
    /// wildcard entry.
    pub fn accepts_type(&self, drag_type: &str) -> bool {
        self.accepts.contains(drag_type) || self.accepts.contains(ACCEPT_WILDCARD)
    }
}

// ============================================================================
// Keyboard Drag
// ============================================================================

/// State of the keyboard accessibility controller.
///
/// Entirely separate from [`DragState`]; the two machines share only the
/// read-only drop-zone registry and spatial index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyboardDragState {
    pub active: bool,
    pub element: Option<ElementId>,
    pub position: Point,
    /// Zone focused by `Tab` cycling, `None` until the first cycle.
    pub drop_zone_index: Option<usize>,
}

// ============================================================================
// Element Snapshots
// ============================================================================

/// Presentation snapshot of a source element, captured by the host when a
/// ghost is created. The renderer approximates the element from this rather
/// than reading the live element during the drag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSnapshot {
    /// Background color of the source element, in host notation.
    pub background: String,
    /// Text content of the source element, untruncated.
    pub text: String,
    /// Element size at capture time.
    pub width: f64,
    pub height: f64,
    /// Number of elements in a multi-selection drag, for the ghost badge.
    pub selection_count: Option<u32>,
}
