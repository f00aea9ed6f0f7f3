//! Input normalization.
//!
//! Maps heterogeneous pointer and keyboard input into one canonical shape.
//! The normalizers are pure functions with no history; the stateful pieces
//! (the 60Hz pointer-move rate limiter and the resize debouncer) are small
//! timestamp-driven values owned by the engine, so tests drive them with
//! explicit clocks instead of wall time.

use crate::constants::{KEYBOARD_STEP, MOVE_INTERVAL_MS, RESIZE_DEBOUNCE_MS};
use crate::types::{ElementId, Point};

// ============================================================================
// Pointer Normalization
// ============================================================================

/// Kind of pointing device that produced a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// Canonical pointer sample consumed by the drag state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    /// Element under the pointer, if the host resolved one.
    pub target: Option<ElementId>,
    pub timestamp_ms: f64,
    pub kind: PointerKind,
}

impl PointerSample {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Raw pointer input as hosts deliver it.
#[derive(Clone, Debug, PartialEq)]
pub enum RawPointer {
    Mouse {
        x: f64,
        y: f64,
        target: Option<ElementId>,
        timestamp_ms: f64,
    },
    /// Multi-touch input. Only the first touch drives the drag; gesture
    /// recognition is out of scope.
    Touch {
        touches: Vec<(f64, f64)>,
        target: Option<ElementId>,
        timestamp_ms: f64,
    },
    Pen {
        x: f64,
        y: f64,
        pressure: f32,
        target: Option<ElementId>,
        timestamp_ms: f64,
    },
}

/// Normalize a raw pointer event. Pure; returns `None` only for a touch
/// event with no touch points.
pub fn normalize(raw: &RawPointer) -> Option<PointerSample> {
    match raw {
        RawPointer::Mouse {
            x,
            y,
            target,
            timestamp_ms,
        } => Some(PointerSample {
            x: *x,
            y: *y,
            target: *target,
            timestamp_ms: *timestamp_ms,
            kind: PointerKind::Mouse,
        }),
        RawPointer::Touch {
            touches,
            target,
            timestamp_ms,
        } => {
            let (x, y) = *touches.first()?;
            Some(PointerSample {
                x,
                y,
                target: *target,
                timestamp_ms: *timestamp_ms,
                kind: PointerKind::Touch,
            })
        }
        RawPointer::Pen {
            x,
            y,
            target,
            timestamp_ms,
            ..
        } => Some(PointerSample {
            x: *x,
            y: *y,
            target: *target,
            timestamp_ms: *timestamp_ms,
            kind: PointerKind::Pen,
        }),
    }
}

// ============================================================================
// Keyboard Normalization
// ============================================================================

/// Discrete keyboard command for the accessibility controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyCommand {
    /// Begin a keyboard drag on the focused draggable (`Space`).
    Grab,
    /// Move the keyboard drag position by a fixed step (arrow keys).
    Move { dx: f64, dy: f64 },
    /// Cycle focus through the registered drop zones (`Tab`).
    Cycle,
    /// Attempt the drop at the current position (`Enter`).
    Commit,
    /// Abandon the keyboard drag (`Escape`).
    Cancel,
}

/// Normalize a key name into a command. Pure; unrecognized keys map to
/// `None` and are ignored by the engine.
pub fn normalize_key(key: &str) -> Option<KeyCommand> {
    match key {
        " " | "Space" => Some(KeyCommand::Grab),
        "ArrowLeft" => Some(KeyCommand::Move {
            dx: -KEYBOARD_STEP,
            dy: 0.0,
        }),
        "ArrowRight" => Some(KeyCommand::Move {
            dx: KEYBOARD_STEP,
            dy: 0.0,
        }),
        "ArrowUp" => Some(KeyCommand::Move {
            dx: 0.0,
            dy: -KEYBOARD_STEP,
        }),
        "ArrowDown" => Some(KeyCommand::Move {
            dx: 0.0,
            dy: KEYBOARD_STEP,
        }),
        "Tab" => Some(KeyCommand::Cycle),
        "Enter" => Some(KeyCommand::Commit),
        "Escape" => Some(KeyCommand::Cancel),
        _ => None,
    }
}

// ============================================================================
// Rate Limiting
// ============================================================================

/// Last-write-wins rate limiter for pointer moves (~60Hz). Samples arriving
/// inside the window are dropped, never queued: there is no backlog to
/// replay.
#[derive(Debug, Default)]
pub struct RateLimiter {
    last_ms: Option<f64>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sample at `now_ms` should be processed. Advances the window
    /// when it answers yes.
    pub fn allow(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < MOVE_INTERVAL_MS => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// Forget the window, so the next sample always processes. Called when a
    /// drag ends: the terminal event must never be dropped.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

// ============================================================================
// Debouncing
// ============================================================================

/// Trailing-edge debouncer for viewport resizes. Bursts of `arm` calls
/// coalesce into a single fire once the window has elapsed.
#[derive(Debug, Default)]
pub struct Debouncer {
    deadline_ms: Option<f64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a triggering event at `now_ms`, pushing the deadline out.
    pub fn arm(&mut self, now_ms: f64) {
        self.deadline_ms = Some(now_ms + RESIZE_DEBOUNCE_MS);
    }

    pub fn pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Whether the debounced action should run at `now_ms`. Disarms when it
    /// answers yes.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Run the pending action now regardless of the deadline. Used before
    /// queries that must not see stale geometry.
    pub fn flush(&mut self) -> bool {
        self.deadline_ms.take().is_some()
    }
}
