//! The drag engine.
//!
//! `DragEngine` owns the four shared mutable resources of the system: the
//! single live [`DragState`], the single [`KeyboardDragState`], the
//! drop-zone registry, and the ghost-surface pool. Everything is driven
//! from event-handler invocations on one thread; for multi-threaded hosts,
//! [`SharedEngine`] serializes access behind a mutex, since the transition
//! functions assume exclusive access and perform no internal
//! synchronization.
//!
//! No public entry point throws: registration and input failures are logged
//! and the engine keeps operating on subsequent input.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::{self, DraggableConfig};
use crate::error::EngineError;
use crate::ghost::{GhostRenderer, Renderer};
use crate::host::HostSurface;
use crate::input::{normalize_key, Debouncer, PointerSample, RateLimiter};
use crate::keyboard::{KeyboardController, KeyboardOutcome};
use crate::perf::{measure, PerfMonitor, PerfReport};
use crate::registry::DropZoneRegistry;
use crate::spatial::SpatialIndex;
use crate::state_machine::{transition, DragSignal, Effect, ResolvedSource, TransitionCtx};
use crate::types::{
    DragPhase, DragState, DropZone, ElementId, GhostHandle, KeyboardDragState, Point,
};

/// Upper bound on ancestor hops when resolving a draggable, guarding
/// against host parent cycles.
const MAX_ANCESTOR_WALK: usize = 64;

/// Engine behind a mutex, for hosts that deliver input from more than one
/// thread.
pub type SharedEngine<H> = Arc<Mutex<DragEngine<H>>>;

pub struct DragEngine<H: HostSurface> {
    host: H,
    renderer: Option<Box<dyn Renderer>>,
    sources: HashMap<ElementId, DraggableConfig>,
    registry: DropZoneRegistry,
    index: SpatialIndex,
    state: DragState,
    keyboard: KeyboardController,
    ghosts: GhostRenderer,
    perf: PerfMonitor,
    move_limiter: RateLimiter,
    resize_debounce: Debouncer,
}

impl<H: HostSurface> DragEngine<H> {
    /// Build an engine over a host. `renderer` is the primary ghost
    /// backend; `None` routes all ghosts through the host-clone fallback.
    pub fn new(host: H, renderer: Option<Box<dyn Renderer>>) -> Self {
        let index = SpatialIndex::new(host.viewport());
        Self {
            host,
            renderer,
            sources: HashMap::new(),
            registry: DropZoneRegistry::new(),
            index,
            state: DragState::idle(),
            keyboard: KeyboardController::new(),
            ghosts: GhostRenderer::new(),
            perf: PerfMonitor::new(),
            move_limiter: RateLimiter::new(),
            resize_debounce: Debouncer::new(),
        }
    }

    /// Wrap the engine for multi-threaded hosting.
    pub fn into_shared(self) -> SharedEngine<H> {
        Arc::new(Mutex::new(self))
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a draggable element from its raw config value. A config
    /// missing its required `type` is logged and skipped.
    pub fn register_draggable(&mut self, element: ElementId, raw: &serde_json::Value) {
        match config::resolve_draggable(raw) {
            Ok(config) => {
                self.sources.insert(element, config);
            }
            Err(err) => warn!(?element, error = %err, "draggable not registered"),
        }
    }

    pub fn unregister_draggable(&mut self, element: ElementId) -> bool {
        self.sources.remove(&element).is_some()
    }

    /// Register a drop zone from its raw config value. Bounds come from the
    /// host at registration time.
    pub fn register_drop_zone(&mut self, element: ElementId, raw: &serde_json::Value) {
        if self.register_zone_inner(element, raw) {
            self.rebuild_index();
        }
    }

    /// Register a batch of drop zones from a scan. One malformed config is
    /// logged and skipped without aborting the rest of the batch.
    pub fn register_drop_zones(&mut self, batch: &[(ElementId, serde_json::Value)]) {
        let mut registered = false;
        for (element, raw) in batch {
            registered |= self.register_zone_inner(*element, raw);
        }
        if registered {
            self.rebuild_index();
        }
    }

    fn register_zone_inner(&mut self, element: ElementId, raw: &serde_json::Value) -> bool {
        let config = match config::resolve_drop_zone(raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(?element, error = %err, "drop zone not registered");
                return false;
            }
        };
        let bounds = match self.host.rect_of(element) {
            Some(rect) => rect,
            None => {
                warn!(?element, zone = %config.name, "zone element has no rect, using empty bounds");
                Default::default()
            }
        };
        self.registry.register(element, config, bounds);
        true
    }

    /// Unregister a zone by name. Returns whether anything was removed.
    pub fn unregister_drop_zone(&mut self, name: &str) -> bool {
        let removed = self.registry.unregister(name);
        if removed {
            self.rebuild_index();
        } else {
            let err = EngineError::UnknownZone(name.to_string());
            warn!(error = %err, "unregister ignored");
        }
        removed
    }

    /// Notify the engine of a viewport resize. The index rebuild is
    /// debounced so bursts of resize events coalesce into one rebuild.
    pub fn viewport_resized(&mut self, timestamp_ms: f64) {
        self.resize_debounce.arm(timestamp_ms);
    }

    fn rebuild_index(&mut self) {
        crate::profile_scope!("engine.rebuild_index");
        self.registry.refresh_bounds(&self.host);
        let (_, elapsed) = measure(|| {
            self.index
                .rebuild(self.host.viewport(), self.registry.snapshot());
        });
        debug!(
            zones = self.registry.len(),
            elapsed_ms = format!("{elapsed:.3}"),
            "spatial index rebuilt"
        );
    }

    fn poll_resize(&mut self, now_ms: f64) {
        if self.resize_debounce.poll(now_ms) {
            self.rebuild_index();
        }
    }

    // ========================================================================
    // Pointer Input
    // ========================================================================

    pub fn pointer_down(&mut self, sample: PointerSample) {
        self.poll_resize(sample.timestamp_ms);
        let source = self.resolve_source(sample.target);
        self.dispatch(DragSignal::Start {
            source,
            position: sample.position(),
            timestamp_ms: sample.timestamp_ms,
        });
    }

    /// Rate-limited to ~60Hz; samples inside the window are dropped,
    /// last-write-wins.
    pub fn pointer_move(&mut self, sample: PointerSample) {
        if !self.move_limiter.allow(sample.timestamp_ms) {
            return;
        }
        self.poll_resize(sample.timestamp_ms);
        self.dispatch(DragSignal::Move {
            position: sample.position(),
            timestamp_ms: sample.timestamp_ms,
        });
    }

    pub fn pointer_up(&mut self, sample: PointerSample) {
        self.poll_resize(sample.timestamp_ms);
        // The terminal event must never fall into the rate-limit window.
        self.move_limiter.reset();
        self.dispatch(DragSignal::End {
            position: sample.position(),
            timestamp_ms: sample.timestamp_ms,
        });
    }

    /// Pointer-level cancellation (e.g. `pointercancel`). Idempotent.
    pub fn pointer_cancel(&mut self) {
        self.move_limiter.reset();
        self.dispatch(DragSignal::Cancel);
    }

    // ========================================================================
    // Keyboard Input
    // ========================================================================

    /// Feed a raw key press, with the host's currently focused element.
    /// Unrecognized keys are ignored.
    pub fn key_input(&mut self, key: &str, focused: Option<ElementId>, timestamp_ms: f64) {
        self.poll_resize(timestamp_ms);
        let Some(cmd) = normalize_key(key) else {
            return;
        };
        let focus = self.resolve_source(focused);

        let outcome = self.keyboard.handle(
            cmd,
            focus.as_ref(),
            &self.registry,
            &self.index,
            &self.host,
        );
        match outcome {
            Some(KeyboardOutcome::Started) => self.perf.count_drag(),
            Some(KeyboardOutcome::Dropped) => self.perf.count_drop(),
            Some(KeyboardOutcome::Cancelled) => self.perf.count_cancel(),
            _ => {}
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn phase(&self) -> DragPhase {
        self.state.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.state
    }

    pub fn keyboard_state(&self) -> &KeyboardDragState {
        self.keyboard.state()
    }

    /// All zones under a point, deduplicated and priority-ordered. For
    /// callers (e.g. multi-select drop) that need the full candidate set
    /// rather than the single hit-test winner.
    pub fn drop_zones_at(&mut self, position: Point) -> Vec<DropZone> {
        if self.resize_debounce.flush() {
            self.rebuild_index();
        }
        let (zones, elapsed) = measure(|| {
            self.index
                .candidates(position)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        });
        self.perf.record_spatial_query(elapsed);
        zones
    }

    pub fn zone_count(&self) -> usize {
        self.registry.len()
    }

    pub fn perf_report(&self) -> PerfReport {
        self.perf.get()
    }

    pub fn reset_perf(&mut self) {
        self.perf.reset();
    }

    /// Idle surfaces currently pooled by the ghost renderer.
    pub fn ghost_pool_len(&self) -> usize {
        self.ghosts.pool_len()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn dispatch(&mut self, signal: DragSignal) {
        crate::profile_scope!("engine.dispatch");
        let ctx = TransitionCtx::new(&self.index, &self.registry);
        let (result, elapsed) = measure(|| transition(&self.state, &signal, &ctx));
        let query_ms = ctx.query_ms();
        drop(ctx);

        let old_ghost = self.state.ghost;
        self.state = result.next;
        self.apply_effects(result.effects, old_ghost);

        if query_ms > 0.0 {
            self.perf.record_spatial_query(query_ms);
        }
        self.perf.record_event_processing(elapsed);
    }

    fn apply_effects(&mut self, effects: Vec<Effect>, mut old_ghost: Option<GhostHandle>) {
        for effect in effects {
            match effect {
                Effect::Emit(event) => {
                    match &event {
                        crate::events::DragEvent::DragStart { .. } => self.perf.count_drag(),
                        crate::events::DragEvent::Drop { .. } => self.perf.count_drop(),
                        crate::events::DragEvent::DragEnd {
                            cancelled: true, ..
                        } => self.perf.count_cancel(),
                        crate::events::DragEvent::DragEnd { .. } => {}
                    }
                    self.host.publish(event);
                }
                Effect::AddClass(element, class) => self.host.add_class(element, class),
                Effect::RemoveClass(element, class) => self.host.remove_class(element, class),
                Effect::CreateGhost { source, position } => {
                    let snapshot = self.host.snapshot_of(source);
                    let handle = self.ghosts.create(
                        self.renderer.as_deref_mut().map(|r| r as &mut dyn Renderer),
                        &self.host,
                        source,
                        &snapshot,
                        position.x,
                        position.y,
                    );
                    self.state.ghost = Some(handle);
                }
                Effect::MoveGhost { position } => {
                    if let Some(handle) = self.state.ghost.or(old_ghost) {
                        self.ghosts.update_position(
                            self.renderer.as_deref_mut().map(|r| r as &mut dyn Renderer),
                            &self.host,
                            handle,
                            position.x,
                            position.y,
                        );
                    }
                }
                Effect::ReleaseGhost => {
                    if let Some(handle) = self.state.ghost.take().or(old_ghost.take()) {
                        self.ghosts.cleanup(
                            self.renderer.as_deref_mut().map(|r| r as &mut dyn Renderer),
                            &self.host,
                            handle,
                        );
                    }
                }
            }
        }
    }

    /// Walk up from the event target to the nearest registered draggable.
    fn resolve_source(&self, target: Option<ElementId>) -> Option<ResolvedSource> {
        let mut current = target;
        for _ in 0..MAX_ANCESTOR_WALK {
            let element = current?;
            if let Some(config) = self.sources.get(&element) {
                return Some(ResolvedSource {
                    element,
                    config: config.clone(),
                });
            }
            current = self.host.parent_of(element);
        }
        None
    }
}
