//! Drop-zone registry.
//!
//! Ordered storage for registered drop zones. Registration order matters:
//! it is the stable tie-break when zones of equal priority overlap, so the
//! registry preserves it and the spatial index is rebuilt from the ordered
//! list.

use tracing::debug;

use crate::config::DropZoneConfig;
use crate::host::HostSurface;
use crate::types::{DropZone, ElementId, Rect, ZoneId};

#[derive(Debug, Default)]
pub struct DropZoneRegistry {
    zones: Vec<DropZone>,
    next_id: u64,
}

impl DropZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone backed by a host element. Bounds are captured at
    /// registration time and refreshed on viewport resize.
    pub fn register(&mut self, element: ElementId, config: DropZoneConfig, bounds: Rect) -> ZoneId {
        let id = ZoneId(self.next_id);
        self.next_id += 1;
        debug!(zone = %config.name, ?id, "registered drop zone");
        self.zones.push(DropZone {
            id,
            element,
            name: config.name,
            accepts: config.accepts,
            priority: config.priority,
            bounds,
            sort: config.sort,
        });
        id
    }

    /// Remove a zone by name. Returns whether anything was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.zones.len();
        self.zones.retain(|z| z.name != name);
        before != self.zones.len()
    }

    pub fn get(&self, id: ZoneId) -> Option<&DropZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&DropZone> {
        self.zones.get(index)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zones in registration order.
    pub fn zones(&self) -> &[DropZone] {
        &self.zones
    }

    /// Re-read every zone's bounds from the host. Zones whose element has
    /// disappeared keep their last known bounds.
    pub fn refresh_bounds<H: HostSurface>(&mut self, host: &H) {
        for zone in &mut self.zones {
            if let Some(rect) = host.rect_of(zone.element) {
                zone.bounds = rect;
            }
        }
    }

    /// Snapshot of the zone list, for rebuilding the spatial index.
    pub fn snapshot(&self) -> Vec<DropZone> {
        self.zones.clone()
    }
}
