//! Lifecycle event vocabulary emitted by the engine.
//!
//! Events are delivered through [`HostSurface::publish`] rather than bubbled
//! through a host tree: the publish channel is injected at engine
//! construction, so a test harness can record events the same way a UI layer
//! consumes them.
//!
//! [`HostSurface::publish`]: crate::host::HostSurface::publish

use serde::{Deserialize, Serialize};

use crate::types::ElementId;

/// A drag lifecycle event.
///
/// - `DragStart` fires once per drag, when the pending-to-dragging threshold
///   is crossed.
/// - `Drop` fires once per successful drop, before the terminal `DragEnd`.
/// - `DragEnd` fires exactly once per drag that crossed the threshold or was
///   cancelled while pending. A below-threshold release is a click and emits
///   nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum DragEvent {
    #[serde(rename = "dragstart")]
    DragStart {
        element: ElementId,
        #[serde(rename = "type")]
        drag_type: String,
        data: serde_json::Map<String, serde_json::Value>,
        x: f64,
        y: f64,
    },
    #[serde(rename = "drop")]
    Drop {
        element: ElementId,
        drop_zone: String,
        #[serde(rename = "type")]
        drag_type: String,
        data: serde_json::Map<String, serde_json::Value>,
        x: f64,
        y: f64,
        #[serde(default)]
        keyboard: bool,
    },
    #[serde(rename = "dragend")]
    DragEnd {
        element: ElementId,
        drop_zone: Option<String>,
        success: bool,
        #[serde(default)]
        cancelled: bool,
    },
}

impl DragEvent {
    /// Event name as published to the host, matching the serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DragStart { .. } => "dragstart",
            Self::Drop { .. } => "drop",
            Self::DragEnd { .. } => "dragend",
        }
    }
}
