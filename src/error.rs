//! Error types for the drag-and-drop engine.
//!
//! Provides unified error handling for configuration resolution, zone
//! registration, and spatial queries.
//!
//! No public entry point of the engine propagates these errors to the
//! caller: they are logged at the engine boundary and the engine keeps
//! operating on subsequent input.

use thiserror::Error;

/// Errors that can occur inside the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A would-be draggable is missing its required `type`. The `start`
    /// transition becomes a no-op.
    #[error("config resolution failed: {0}")]
    ConfigResolution(String),

    /// Persisted configuration attached to an element could not be parsed.
    /// The engine falls back to an empty configuration and continues.
    #[error("malformed config: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    /// Zero-area viewport or zone rectangle. Spatial queries fall back to
    /// the linear scan rather than producing undefined behavior.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Unregistration referenced a zone that does not exist.
    #[error("unknown drop zone: {0}")]
    UnknownZone(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
