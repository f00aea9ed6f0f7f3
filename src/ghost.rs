//! Ghost rendering.
//!
//! The ghost is the visual proxy that follows the pointer during an active
//! drag. Drawing goes through the [`Renderer`] capability: a canvas is one
//! backend, a retained-mode graphics API another. When no rendering surface
//! is available the ghost falls back to a reduced-opacity clone of the
//! source element's presentation via the host; that is an expected alternate
//! path, not a failure.
//!
//! Rendering surfaces are pooled: cleanup returns a surface for reuse
//! instead of discarding it, and the pool is trimmed to a fixed capacity.

use std::collections::HashMap;

use tracing::debug;

use crate::constants::{GHOST_FALLBACK_OPACITY, GHOST_POOL_CAPACITY, GHOST_TEXT_LIMIT};
use crate::host::HostSurface;
use crate::types::{ElementId, ElementSnapshot, GhostHandle};

// ============================================================================
// Renderer Capability
// ============================================================================

/// Handle to a backend rendering surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// What the renderer draws for a ghost: a drop-shadowed rectangle in the
/// source element's background color, overlaid with truncated text and an
/// optional multi-selection badge.
#[derive(Clone, Debug, PartialEq)]
pub struct GhostVisual {
    pub background: String,
    pub text: String,
    pub badge: Option<u32>,
    pub width: f64,
    pub height: f64,
}

/// Rendering backend for ghost surfaces.
pub trait Renderer {
    /// Draw a ghost at the given position, reusing `surface` when one is
    /// supplied from the pool. Returns `None` when the rendering surface is
    /// unavailable; the caller then falls back to the host-clone strategy.
    fn draw(
        &mut self,
        surface: Option<SurfaceId>,
        visual: &GhostVisual,
        x: f64,
        y: f64,
    ) -> Option<SurfaceId>;

    /// Reposition a previously drawn surface without redrawing.
    fn reposition(&mut self, surface: SurfaceId, x: f64, y: f64);

    /// Destroy a surface. Called only when the pool is over capacity.
    fn release(&mut self, surface: SurfaceId);
}

// ============================================================================
// Ghost Renderer
// ============================================================================

#[derive(Debug)]
enum GhostBacking {
    Surface(SurfaceId),
    HostClone(ElementId),
}

/// Owns the active ghosts and the bounded surface pool.
#[derive(Default)]
pub struct GhostRenderer {
    pool: Vec<SurfaceId>,
    active: HashMap<GhostHandle, GhostBacking>,
    next_handle: u64,
}

impl GhostRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ghost for `source` at the given position. Tries the primary
    /// renderer with a pooled surface first, silently falling back to a
    /// host-side presentation clone.
    pub fn create<H: HostSurface>(
        &mut self,
        renderer: Option<&mut dyn Renderer>,
        host: &H,
        source: ElementId,
        snapshot: &ElementSnapshot,
        x: f64,
        y: f64,
    ) -> GhostHandle {
        let handle = GhostHandle(self.next_handle);
        self.next_handle += 1;

        if let Some(renderer) = renderer {
            let visual = visual_for(snapshot);
            let reused = self.pool.pop();
            if let Some(surface) = renderer.draw(reused, &visual, x, y) {
                self.active.insert(handle, GhostBacking::Surface(surface));
                return handle;
            }
            debug!("rendering surface unavailable, using presentation clone");
        }

        let clone = host.clone_presentation(source, x, y, GHOST_FALLBACK_OPACITY);
        self.active.insert(handle, GhostBacking::HostClone(clone));
        handle
    }

    /// Reposition a ghost without reallocating anything.
    pub fn update_position<H: HostSurface>(
        &mut self,
        renderer: Option<&mut dyn Renderer>,
        host: &H,
        handle: GhostHandle,
        x: f64,
        y: f64,
    ) {
        match self.active.get(&handle) {
            Some(GhostBacking::Surface(surface)) => {
                if let Some(renderer) = renderer {
                    renderer.reposition(*surface, x, y);
                }
            }
            Some(GhostBacking::HostClone(clone)) => host.reposition_clone(*clone, x, y),
            None => {}
        }
    }

    /// Tear down a ghost. Surfaces return to the pool, which is trimmed if
    /// it exceeds capacity; host clones are removed outright.
    pub fn cleanup<H: HostSurface>(
        &mut self,
        renderer: Option<&mut dyn Renderer>,
        host: &H,
        handle: GhostHandle,
    ) {
        match self.active.remove(&handle) {
            Some(GhostBacking::Surface(surface)) => {
                self.pool.push(surface);
                if self.pool.len() > GHOST_POOL_CAPACITY {
                    let excess = self.pool.remove(0);
                    if let Some(renderer) = renderer {
                        renderer.release(excess);
                    }
                }
            }
            Some(GhostBacking::HostClone(clone)) => host.remove_clone(clone),
            None => {}
        }
    }

    /// Number of idle surfaces held for reuse.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Number of ghosts currently alive.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }
}

/// Build the visual description the renderer draws: background color from
/// the snapshot, text truncated with an ellipsis, badge only for
/// multi-selections.
pub fn visual_for(snapshot: &ElementSnapshot) -> GhostVisual {
    let text = if snapshot.text.chars().count() > GHOST_TEXT_LIMIT {
        let truncated: String = snapshot.text.chars().take(GHOST_TEXT_LIMIT).collect();
        format!("{truncated}…")
    } else {
        snapshot.text.clone()
    };
    GhostVisual {
        background: snapshot.background.clone(),
        text,
        badge: snapshot.selection_count.filter(|n| *n > 1),
        width: snapshot.width,
        height: snapshot.height,
    }
}
