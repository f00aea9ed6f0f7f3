//! Host surface abstraction.
//!
//! The engine never touches a concrete UI tree. Everything it needs from the
//! surrounding toolkit goes through [`HostSurface`]: geometry queries,
//! visual state toggles, event publication, and accessibility announcements.
//! A browser DOM is one implementation, a native toolkit another, and the
//! [`HeadlessHost`] in this module a third, used for tests and for embedding
//! without any UI at all.

use std::collections::{BTreeSet, HashMap};

use parking_lot::Mutex;

use crate::events::DragEvent;
use crate::types::{ElementId, ElementSnapshot, Rect};

/// Capabilities the engine requires from its host.
///
/// Methods take `&self`: hosts are expected to use interior mutability where
/// they record anything, since the engine holds the host by value while
/// handing out `&self` access during effect application.
pub trait HostSurface {
    /// Bounding rectangle of an element, `None` if the element is gone.
    fn rect_of(&self, element: ElementId) -> Option<Rect>;

    /// Parent element, for walking up to a draggable ancestor.
    fn parent_of(&self, element: ElementId) -> Option<ElementId>;

    /// Presentation snapshot used to draw the ghost.
    fn snapshot_of(&self, element: ElementId) -> ElementSnapshot;

    /// Current viewport rectangle.
    fn viewport(&self) -> Rect;

    /// Toggle a visual state class on an element.
    fn add_class(&self, element: ElementId, class: &str);
    fn remove_class(&self, element: ElementId, class: &str);

    /// Publish a lifecycle event to the surrounding application.
    fn publish(&self, event: DragEvent);

    /// Announce a message through the accessibility live region.
    fn announce(&self, message: &str);

    /// Create a reduced-opacity clone of an element's presentation at the
    /// given position. Fallback ghost strategy when no rendering surface is
    /// available.
    fn clone_presentation(&self, source: ElementId, x: f64, y: f64, opacity: f32) -> ElementId;

    /// Reposition a presentation clone.
    fn reposition_clone(&self, clone: ElementId, x: f64, y: f64);

    /// Remove a presentation clone.
    fn remove_clone(&self, clone: ElementId);
}

// ============================================================================
// Headless Host
// ============================================================================

#[derive(Clone, Debug, Default)]
struct HeadlessElement {
    rect: Rect,
    parent: Option<ElementId>,
    snapshot: ElementSnapshot,
    classes: BTreeSet<String>,
}

/// In-memory host with no rendering. Elements are plain records; every call
/// the engine makes is observable afterwards, which is what the integration
/// tests are built on.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    elements: Mutex<HashMap<ElementId, HeadlessElement>>,
    viewport: Mutex<Rect>,
    events: Mutex<Vec<DragEvent>>,
    announcements: Mutex<Vec<String>>,
    clones: Mutex<Vec<ElementId>>,
    next_clone: Mutex<u64>,
}

impl HeadlessHost {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport: Mutex::new(viewport),
            // Clone ids count down from the top of the space so they never
            // collide with caller-assigned element ids.
            next_clone: Mutex::new(u64::MAX),
            ..Self::default()
        }
    }

    /// Insert or replace an element with the given rect.
    pub fn put_element(&self, element: ElementId, rect: Rect) {
        let mut elements = self.elements.lock();
        let entry = elements.entry(element).or_default();
        entry.rect = rect;
    }

    pub fn set_parent(&self, element: ElementId, parent: ElementId) {
        let mut elements = self.elements.lock();
        elements.entry(element).or_default().parent = Some(parent);
    }

    pub fn set_snapshot(&self, element: ElementId, snapshot: ElementSnapshot) {
        let mut elements = self.elements.lock();
        elements.entry(element).or_default().snapshot = snapshot;
    }

    pub fn set_viewport(&self, viewport: Rect) {
        *self.viewport.lock() = viewport;
    }

    /// All events published so far, in order.
    pub fn events(&self) -> Vec<DragEvent> {
        self.events.lock().clone()
    }

    /// All live-region announcements so far, in order.
    pub fn announcements(&self) -> Vec<String> {
        self.announcements.lock().clone()
    }

    /// Classes currently applied to an element.
    pub fn classes_of(&self, element: ElementId) -> BTreeSet<String> {
        self.elements
            .lock()
            .get(&element)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    /// Presentation clones currently alive.
    pub fn live_clones(&self) -> Vec<ElementId> {
        self.clones.lock().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().clear();
        self.announcements.lock().clear();
    }
}

impl HostSurface for HeadlessHost {
    fn rect_of(&self, element: ElementId) -> Option<Rect> {
        self.elements.lock().get(&element).map(|e| e.rect)
    }

    fn parent_of(&self, element: ElementId) -> Option<ElementId> {
        self.elements.lock().get(&element).and_then(|e| e.parent)
    }

    fn snapshot_of(&self, element: ElementId) -> ElementSnapshot {
        self.elements
            .lock()
            .get(&element)
            .map(|e| e.snapshot.clone())
            .unwrap_or_default()
    }

    fn viewport(&self) -> Rect {
        *self.viewport.lock()
    }

    fn add_class(&self, element: ElementId, class: &str) {
        let mut elements = self.elements.lock();
        elements
            .entry(element)
            .or_default()
            .classes
            .insert(class.to_string());
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        let mut elements = self.elements.lock();
        if let Some(entry) = elements.get_mut(&element) {
            entry.classes.remove(class);
        }
    }

    fn publish(&self, event: DragEvent) {
        self.events.lock().push(event);
    }

    fn announce(&self, message: &str) {
        self.announcements.lock().push(message.to_string());
    }

    fn clone_presentation(&self, source: ElementId, x: f64, y: f64, _opacity: f32) -> ElementId {
        let mut next = self.next_clone.lock();
        let clone = ElementId(*next);
        *next -= 1;

        let snapshot = self.snapshot_of(source);
        self.put_element(clone, Rect::new(x, y, snapshot.width, snapshot.height));
        self.clones.lock().push(clone);
        clone
    }

    fn reposition_clone(&self, clone: ElementId, x: f64, y: f64) {
        let mut elements = self.elements.lock();
        if let Some(entry) = elements.get_mut(&clone) {
            entry.rect.x = x;
            entry.rect.y = y;
        }
    }

    fn remove_clone(&self, clone: ElementId) {
        self.clones.lock().retain(|c| *c != clone);
        self.elements.lock().remove(&clone);
    }
}
