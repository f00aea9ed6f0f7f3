//! Typed resolution of draggable and drop-zone configuration.
//!
//! The external attribute/notation parser hands the engine already-parsed
//! JSON values. This module validates them into typed configs via serde,
//! so no runtime object-literal trust is needed:
//!
//! - a draggable without a `type` is a resolution failure ([`EngineError::ConfigResolution`]),
//! - otherwise-malformed persisted data falls back to an empty configuration
//!   with a logged warning, and the scan continues.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::ACCEPT_WILDCARD;
use crate::error::{EngineError, EngineResult};

// ============================================================================
// Draggable Configuration
// ============================================================================

/// Axis constraint applied to drag motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Unconstrained motion.
    #[default]
    Free,
    /// Horizontal only: the y coordinate stays at the start position.
    X,
    /// Vertical only: the x coordinate stays at the start position.
    Y,
}

/// Resolved configuration of a draggable element.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DraggableConfig {
    /// Drag type, matched against drop-zone accept lists. Required.
    #[serde(rename = "type")]
    pub drag_type: String,
    /// Payload carried through `dragstart` and `drop` events.
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
    /// Whether a ghost is rendered for this drag.
    #[serde(default = "default_true")]
    pub ghost: bool,
    #[serde(default)]
    pub constraint: Option<String>,
    /// Sub-element that must originate the drag, if any.
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub axis: Axis,
}

fn default_true() -> bool {
    true
}

/// Resolve a draggable config from its raw JSON value.
///
/// A missing or empty `type` is a hard resolution failure: the caller turns
/// the corresponding `start` transition into a no-op. Any other defect in
/// the value salvages the `type` and falls back to defaults for the rest.
pub fn resolve_draggable(raw: &serde_json::Value) -> EngineResult<DraggableConfig> {
    let drag_type = raw
        .get("type")
        .and_then(|v| v.as_str())
        .filter(|t| !t.is_empty());
    let Some(drag_type) = drag_type else {
        return Err(EngineError::ConfigResolution(
            "draggable is missing required `type`".to_string(),
        ));
    };

    match serde_json::from_value::<DraggableConfig>(raw.clone()) {
        Ok(config) => Ok(config),
        Err(err) => {
            let err = EngineError::from(err);
            warn!(
                drag_type,
                error = %err,
                "malformed draggable config, falling back to defaults"
            );
            Ok(DraggableConfig {
                drag_type: drag_type.to_string(),
                ..DraggableConfig::default()
            })
        }
    }
}

// ============================================================================
// Drop Zone Configuration
// ============================================================================

/// Resolved configuration of a drop-zone element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropZoneConfig {
    /// Zone name, reported in `drop`/`dragend` events. Required.
    pub name: String,
    /// Accepted drag types. An absent or empty list defaults to the
    /// wildcard set `{"*"}`, so the set is never empty after resolution.
    #[serde(default)]
    pub accepts: BTreeSet<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub sort: bool,
}

/// Resolve a drop-zone config from its raw JSON value.
///
/// A missing `name` is a resolution failure. Malformed optional fields
/// salvage the name and fall back to defaults. The accept set is
/// normalized to the wildcard when empty.
pub fn resolve_drop_zone(raw: &serde_json::Value) -> EngineResult<DropZoneConfig> {
    let name = raw
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|n| !n.is_empty());
    let Some(name) = name else {
        return Err(EngineError::ConfigResolution(
            "drop zone is missing required `name`".to_string(),
        ));
    };

    let mut config = match serde_json::from_value::<DropZoneConfig>(raw.clone()) {
        Ok(config) => config,
        Err(err) => {
            let err = EngineError::from(err);
            warn!(
                zone = name,
                error = %err,
                "malformed drop zone config, falling back to defaults"
            );
            DropZoneConfig {
                name: name.to_string(),
                accepts: BTreeSet::new(),
                priority: 0,
                sort: false,
            }
        }
    };

    if config.accepts.is_empty() {
        config.accepts.insert(ACCEPT_WILDCARD.to_string());
    }
    Ok(config)
}
