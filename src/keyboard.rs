//! Keyboard accessibility controller.
//!
//! A parallel, discrete-step drag driven by focus and key commands instead
//! of pointer coordinates. It shares the read-only drop-zone registry and
//! spatial index with the pointer state machine but never a mutable
//! container, and it emits the same event vocabulary (with `keyboard: true`
//! on the drop).
//!
//! Every transition is a total function over `{active, position,
//! drop_zone_index}` and reconciles host highlighting before returning, so
//! no step can leave stale visual state behind.
//!
//! Arrow-step announcements are accept-filtered: a zone under the position
//! that rejects the grabbed drag type reads as "No drop target", the same
//! answer Enter would give there.

use crate::config::DraggableConfig;
use crate::constants::{CLASS_DRAG_OVER, CLASS_KBD_FOCUS};
use crate::events::DragEvent;
use crate::host::HostSurface;
use crate::input::KeyCommand;
use crate::registry::DropZoneRegistry;
use crate::spatial::SpatialIndex;
use crate::state_machine::ResolvedSource;
use crate::types::{KeyboardDragState, Point, ZoneId};

/// What a handled key command amounted to. The engine maps these onto its
/// performance counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyboardOutcome {
    Started,
    Moved,
    Cycled,
    Dropped,
    DropFailed,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct KeyboardController {
    state: KeyboardDragState,
    /// Config of the grabbed element, held for the drop payload.
    config: Option<DraggableConfig>,
    /// Zone currently highlighted because the drag position is over it.
    hovered: Option<ZoneId>,
    /// Zone currently highlighted by `Tab` cycling.
    focused: Option<ZoneId>,
}

impl KeyboardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &KeyboardDragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Handle one normalized key command. `focus` is the draggable resolved
    /// from the host's focused element, consulted only by `Grab`. Commands
    /// that do not apply in the current state are no-ops.
    pub fn handle<H: HostSurface>(
        &mut self,
        cmd: KeyCommand,
        focus: Option<&ResolvedSource>,
        registry: &DropZoneRegistry,
        index: &SpatialIndex,
        host: &H,
    ) -> Option<KeyboardOutcome> {
        match cmd {
            KeyCommand::Grab => self.grab(focus, host),
            KeyCommand::Move { dx, dy } => self.step(dx, dy, registry, index, host),
            KeyCommand::Cycle => self.cycle(registry, index, host),
            KeyCommand::Commit => self.commit(registry, index, host),
            KeyCommand::Cancel => self.cancel(registry, host),
        }
    }

    fn grab<H: HostSurface>(
        &mut self,
        focus: Option<&ResolvedSource>,
        host: &H,
    ) -> Option<KeyboardOutcome> {
        if self.state.active {
            return None;
        }
        let source = focus?;
        let rect = host.rect_of(source.element)?;

        self.state = KeyboardDragState {
            active: true,
            element: Some(source.element),
            position: rect.center(),
            drop_zone_index: None,
        };
        self.config = Some(source.config.clone());
        host.announce(&format!(
            "Picked up {}. Arrow keys to move, Tab to cycle drop targets, Enter to drop, Escape to cancel.",
            source.config.drag_type
        ));
        Some(KeyboardOutcome::Started)
    }

    fn step<H: HostSurface>(
        &mut self,
        dx: f64,
        dy: f64,
        registry: &DropZoneRegistry,
        index: &SpatialIndex,
        host: &H,
    ) -> Option<KeyboardOutcome> {
        if !self.state.active {
            return None;
        }
        self.state.position = Point::new(self.state.position.x + dx, self.state.position.y + dy);

        let drag_type = self.drag_type().to_string();
        let hit = index.hit_test(self.state.position, &drag_type);
        match hit {
            Some(zone) => host.announce(&format!("Over {}.", zone.name)),
            None => host.announce("No drop target."),
        }
        let hit_id = hit.map(|z| z.id);
        self.reconcile(registry, host, hit_id, self.focused);
        Some(KeyboardOutcome::Moved)
    }

    fn cycle<H: HostSurface>(
        &mut self,
        registry: &DropZoneRegistry,
        index: &SpatialIndex,
        host: &H,
    ) -> Option<KeyboardOutcome> {
        if !self.state.active {
            return None;
        }
        if registry.is_empty() {
            host.announce("No drop zones registered.");
            return Some(KeyboardOutcome::Cycled);
        }

        // Cycle through the full registered list, not just hit-tested zones.
        let next = match self.state.drop_zone_index {
            Some(i) => (i + 1) % registry.len(),
            None => 0,
        };
        self.state.drop_zone_index = Some(next);

        let zone = registry.get_by_index(next)?;
        let zone_id = zone.id;
        let zone_name = zone.name.clone();
        // Moving the drag position to the focused zone lets a following
        // Enter land on it.
        self.state.position = zone.bounds.center();

        let drag_type = self.drag_type().to_string();
        let hovered = index.hit_test(self.state.position, &drag_type).map(|z| z.id);
        self.reconcile(registry, host, hovered, Some(zone_id));
        host.announce(&format!(
            "Drop target {} of {}: {}.",
            next + 1,
            registry.len(),
            zone_name
        ));
        Some(KeyboardOutcome::Cycled)
    }

    fn commit<H: HostSurface>(
        &mut self,
        registry: &DropZoneRegistry,
        index: &SpatialIndex,
        host: &H,
    ) -> Option<KeyboardOutcome> {
        if !self.state.active {
            return None;
        }
        let element = self.state.element?;
        let config = self.config.clone().unwrap_or_default();

        let outcome = match index.hit_test(self.state.position, &config.drag_type) {
            Some(zone) => {
                host.publish(DragEvent::Drop {
                    element,
                    drop_zone: zone.name.clone(),
                    drag_type: config.drag_type.clone(),
                    data: config.data.clone(),
                    x: self.state.position.x,
                    y: self.state.position.y,
                    keyboard: true,
                });
                host.publish(DragEvent::DragEnd {
                    element,
                    drop_zone: Some(zone.name.clone()),
                    success: true,
                    cancelled: false,
                });
                host.announce(&format!("Dropped in {}.", zone.name));
                KeyboardOutcome::Dropped
            }
            None => {
                host.publish(DragEvent::DragEnd {
                    element,
                    drop_zone: None,
                    success: false,
                    cancelled: false,
                });
                host.announce("No drop target at this position.");
                KeyboardOutcome::DropFailed
            }
        };

        self.reset(registry, host);
        Some(outcome)
    }

    fn cancel<H: HostSurface>(
        &mut self,
        registry: &DropZoneRegistry,
        host: &H,
    ) -> Option<KeyboardOutcome> {
        if !self.state.active {
            return None;
        }
        if let Some(element) = self.state.element {
            host.publish(DragEvent::DragEnd {
                element,
                drop_zone: None,
                success: false,
                cancelled: true,
            });
        }
        host.announce("Drag cancelled.");
        self.reset(registry, host);
        Some(KeyboardOutcome::Cancelled)
    }

    fn drag_type(&self) -> &str {
        self.config.as_ref().map(|c| c.drag_type.as_str()).unwrap_or_default()
    }

    /// Bring host highlighting in line with the new hovered/focused zones,
    /// removing classes from whatever they were before.
    fn reconcile<H: HostSurface>(
        &mut self,
        registry: &DropZoneRegistry,
        host: &H,
        hovered: Option<ZoneId>,
        focused: Option<ZoneId>,
    ) {
        if self.hovered != hovered {
            if let Some(old) = self.hovered.and_then(|id| registry.get(id)) {
                host.remove_class(old.element, CLASS_DRAG_OVER);
            }
            if let Some(new) = hovered.and_then(|id| registry.get(id)) {
                host.add_class(new.element, CLASS_DRAG_OVER);
            }
            self.hovered = hovered;
        }
        if self.focused != focused {
            if let Some(old) = self.focused.and_then(|id| registry.get(id)) {
                host.remove_class(old.element, CLASS_KBD_FOCUS);
            }
            if let Some(new) = focused.and_then(|id| registry.get(id)) {
                host.add_class(new.element, CLASS_KBD_FOCUS);
            }
            self.focused = focused;
        }
    }

    fn reset<H: HostSurface>(&mut self, registry: &DropZoneRegistry, host: &H) {
        self.reconcile(registry, host, None, None);
        self.state = KeyboardDragState::default();
        self.config = None;
    }
}
