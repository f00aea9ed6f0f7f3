//! Engine-wide constants.
//!
//! Centralizes magic numbers and interaction tunables to make the codebase
//! more maintainable and self-documenting.

// ============================================================================
// Drag Lifecycle
// ============================================================================

/// Euclidean distance the pointer must travel before a pending drag is
/// promoted to an active drag. Below this it is treated as a click.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Step size (in host units) for one arrow-key movement during a
/// keyboard-driven drag.
pub const KEYBOARD_STEP: f64 = 10.0;

// ============================================================================
// Spatial Index
// ============================================================================

/// Maximum zones held by a quad-tree leaf before it splits.
pub const NODE_CAPACITY: usize = 4;

/// Maximum quad-tree depth. Leaves at this depth accept unlimited zones
/// instead of splitting further.
pub const MAX_DEPTH: usize = 8;

// ============================================================================
// Ghost Rendering
// ============================================================================

/// Maximum number of pooled rendering surfaces kept for reuse.
pub const GHOST_POOL_CAPACITY: usize = 5;

/// Opacity applied to the fallback element-clone ghost.
pub const GHOST_FALLBACK_OPACITY: f32 = 0.6;

/// Maximum characters of source text drawn onto a ghost before truncation.
pub const GHOST_TEXT_LIMIT: usize = 40;

// ============================================================================
// Timing
// ============================================================================

/// Minimum interval between processed pointer-move events (~60Hz).
/// Intermediate moves inside the window are dropped, last-write-wins.
pub const MOVE_INTERVAL_MS: f64 = 16.67;

/// Debounce window for viewport-resize-triggered index rebuilds.
pub const RESIZE_DEBOUNCE_MS: f64 = 250.0;

// ============================================================================
// Performance Monitoring
// ============================================================================

/// Warn when a single event-processing pass exceeds this many milliseconds.
pub const EVENT_WARN_MS: f64 = 0.5;

/// Warn when a single spatial query exceeds this many milliseconds.
pub const QUERY_WARN_MS: f64 = 1.0;

// ============================================================================
// Visual State Classes
// ============================================================================

/// Class applied to the source element while it is being dragged.
pub const CLASS_DRAGGING: &str = "dragging";

/// Class applied to a drop zone while an accepted drag hovers over it.
pub const CLASS_DRAG_OVER: &str = "drag-over";

/// Class applied to the drop zone focused by keyboard `Tab` cycling.
pub const CLASS_KBD_FOCUS: &str = "kbd-drop-focus";

/// Wildcard accept entry matching any drag type.
pub const ACCEPT_WILDCARD: &str = "*";
