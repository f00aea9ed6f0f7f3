//! dropkit - a drag-and-drop interaction engine.
//!
//! Turns raw pointer/keyboard input into a well-defined drag lifecycle,
//! resolves the drop zone under the pointer through a quad-tree spatial
//! index, and drives ghost rendering, while staying fully keyboard
//! accessible.
//!
//! ## Architecture
//!
//! - `input` - normalizes heterogeneous pointer/keyboard input into one
//!   canonical shape, plus the rate limiter and resize debouncer
//! - `state_machine` - the pure drag lifecycle transition function
//! - `spatial` - quad-tree point queries over drop-zone rectangles, with a
//!   linear fallback that must agree with the indexed path
//! - `ghost` - pooled rendering surfaces for the drag's visual proxy
//! - `keyboard` - the parallel, discrete-step accessibility controller
//! - `engine` - owns the live state and wires everything together
//! - `perf` - timing sidecar; observes, never participates
//!
//! The engine talks to its surroundings exclusively through
//! [`host::HostSurface`], so a browser DOM, a native toolkit, and the
//! bundled [`host::HeadlessHost`] are interchangeable.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod ghost;
pub mod host;
pub mod input;
pub mod keyboard;
pub mod perf;
pub mod registry;
pub mod spatial;
pub mod state_machine;
pub mod types;

pub use config::{Axis, DraggableConfig, DropZoneConfig};
pub use engine::{DragEngine, SharedEngine};
pub use error::{EngineError, EngineResult};
pub use events::DragEvent;
pub use ghost::{GhostRenderer, GhostVisual, Renderer, SurfaceId};
pub use host::{HeadlessHost, HostSurface};
pub use input::{KeyCommand, PointerKind, PointerSample, RawPointer};
pub use keyboard::{KeyboardController, KeyboardOutcome};
pub use perf::{PerfMonitor, PerfReport};
pub use registry::DropZoneRegistry;
pub use spatial::SpatialIndex;
pub use state_machine::{DragSignal, Effect, ResolvedSource, Transition, TransitionCtx};
pub use types::{
    DragPhase, DragState, DropZone, ElementId, ElementSnapshot, GhostHandle, KeyboardDragState,
    Point, Rect, ZoneId,
};
