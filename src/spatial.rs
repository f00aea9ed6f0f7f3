//! Spatial index for drop-zone hit testing.
//!
//! A quad-tree over the viewport keeps point queries sub-linear in the
//! number of registered zones. The index is built once per registration set
//! and rebuilt (debounced by the engine) on viewport resize.
//!
//! A linear scan over the full registry is always available as a fallback
//! and produces identical hit-test results to the indexed path; degenerate
//! geometry (zero-area viewport or zone rects) routes to it automatically.

use tracing::debug;

use crate::constants::{MAX_DEPTH, NODE_CAPACITY};
use crate::error::EngineError;
use crate::types::{DropZone, Point, Rect};

// ============================================================================
// Quad-Tree Node
// ============================================================================

#[derive(Debug)]
struct QuadNode {
    bounds: Rect,
    zones: Vec<DropZone>,
    children: Option<Box<[QuadNode; 4]>>,
    depth: usize,
}

impl QuadNode {
    fn new(bounds: Rect, depth: usize) -> Self {
        Self {
            bounds,
            zones: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Insert a zone into this subtree. A zone straddling a split boundary
    /// is inserted into every overlapping child; query logic tolerates the
    /// resulting duplicates.
    fn insert(&mut self, zone: DropZone) {
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                if child.bounds.intersects(&zone.bounds) {
                    child.insert(zone.clone());
                }
            }
            return;
        }

        self.zones.push(zone);
        // Leaves at max depth accept unlimited zones instead of splitting.
        if self.zones.len() > NODE_CAPACITY && self.depth < MAX_DEPTH {
            self.split();
        }
    }

    fn split(&mut self) {
        let half_w = self.bounds.width / 2.0;
        let half_h = self.bounds.height / 2.0;
        let Rect { x, y, .. } = self.bounds;
        let depth = self.depth + 1;

        let mut children = Box::new([
            QuadNode::new(Rect::new(x, y, half_w, half_h), depth),
            QuadNode::new(Rect::new(x + half_w, y, half_w, half_h), depth),
            QuadNode::new(Rect::new(x, y + half_h, half_w, half_h), depth),
            QuadNode::new(Rect::new(x + half_w, y + half_h, half_w, half_h), depth),
        ]);

        for zone in self.zones.drain(..) {
            for child in children.iter_mut() {
                if child.bounds.intersects(&zone.bounds) {
                    child.insert(zone.clone());
                }
            }
        }
        self.children = Some(children);
    }

    /// Collect every zone whose rectangle contains the point. May yield the
    /// same zone more than once when the point sits near a split boundary.
    fn query_point<'a>(&'a self, p: Point, out: &mut Vec<&'a DropZone>) {
        if !self.bounds.contains(p) {
            return;
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_point(p, out);
            }
        } else {
            out.extend(self.zones.iter().filter(|z| z.bounds.contains(p)));
        }
    }
}

// ============================================================================
// Spatial Index
// ============================================================================

/// Drop-zone index over the viewport.
///
/// Keeps the full zone list in registration order alongside the tree: the
/// order is the stable tie-break for equal priorities, and the list is the
/// linear fallback path.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    /// `None` when the viewport is degenerate; queries then go linear.
    root: Option<QuadNode>,
    /// Zones the tree cannot hold (degenerate rects, rects outside the
    /// viewport); scanned linearly on every query so both paths see the
    /// same zone set.
    unindexed: Vec<DropZone>,
    /// All zones, in registration order.
    zones: Vec<DropZone>,
}

impl SpatialIndex {
    pub fn new(viewport: Rect) -> Self {
        Self::from_zones(viewport, Vec::new())
    }

    /// Build an index over the given zones. Zones must arrive in
    /// registration order; ties on priority resolve to the earlier one.
    pub fn from_zones(viewport: Rect, zones: Vec<DropZone>) -> Self {
        let mut index = Self {
            root: None,
            unindexed: Vec::new(),
            zones: Vec::new(),
        };
        index.rebuild(viewport, zones);
        index
    }

    /// Rebuild the tree from scratch over a new viewport and zone set.
    pub fn rebuild(&mut self, viewport: Rect, zones: Vec<DropZone>) {
        self.unindexed.clear();
        if viewport.is_degenerate() {
            let err = EngineError::DegenerateGeometry(format!(
                "viewport {}x{}",
                viewport.width, viewport.height
            ));
            debug!(error = %err, "spatial queries will scan linearly");
            self.root = None;
        } else {
            let mut root = QuadNode::new(viewport, 0);
            for zone in &zones {
                // Degenerate rects are not indexable; rects outside the
                // viewport would be unreachable in-tree. Both go to the
                // linear side list.
                if zone.bounds.is_degenerate() || !viewport.intersects(&zone.bounds) {
                    self.unindexed.push(zone.clone());
                } else {
                    root.insert(zone.clone());
                }
            }
            self.root = Some(root);
        }
        self.zones = zones;
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.unindexed.clear();
        self.zones.clear();
    }

    /// Zones in registration order.
    pub fn zones(&self) -> &[DropZone] {
        &self.zones
    }

    /// Raw indexed query. The result may contain the same zone more than
    /// once when its rectangle was duplicated across tree leaves; use
    /// [`candidates`](Self::candidates) for a deduplicated set.
    pub fn query_point(&self, p: Point) -> Vec<&DropZone> {
        let Some(root) = &self.root else {
            return self.zones.iter().filter(|z| z.bounds.contains(p)).collect();
        };
        // The tree only covers the viewport; a point beyond it can still be
        // inside a zone that straddles the edge, so scan everything.
        if !root.bounds.contains(p) {
            return self.zones.iter().filter(|z| z.bounds.contains(p)).collect();
        }
        let mut out = Vec::new();
        root.query_point(p, &mut out);
        out.extend(self.unindexed.iter().filter(|z| z.bounds.contains(p)));
        out
    }

    /// All zones under a point, deduplicated by identity and ordered by
    /// priority descending (registration order within equal priority).
    pub fn candidates(&self, p: Point) -> Vec<&DropZone> {
        let mut found = self.query_point(p);
        sort_candidates(&mut found);
        found.dedup_by_key(|z| z.id);
        found
    }

    /// Resolve the drop zone for a drag of `drag_type` at `p`: the highest
    /// priority zone under the point whose accept set matches, or `None`.
    pub fn hit_test(&self, p: Point, drag_type: &str) -> Option<&DropZone> {
        let mut found = self.query_point(p);
        sort_candidates(&mut found);
        found.into_iter().find(|z| z.accepts_type(drag_type))
    }

    /// Full-registry scan, bypassing the tree. Must produce identical
    /// results to [`hit_test`](Self::hit_test) for any input.
    pub fn linear_hit_test(&self, p: Point, drag_type: &str) -> Option<&DropZone> {
        let mut found: Vec<&DropZone> =
            self.zones.iter().filter(|z| z.bounds.contains(p)).collect();
        sort_candidates(&mut found);
        found.into_iter().find(|z| z.accepts_type(drag_type))
    }
}

/// Priority descending; equal priority keeps registration order (ascending
/// `ZoneId`), making the sort deterministic regardless of traversal order.
fn sort_candidates(found: &mut [&DropZone]) {
    found.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
}
