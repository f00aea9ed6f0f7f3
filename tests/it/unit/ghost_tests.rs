//! Ghost lifecycle and surface pooling, exercised directly against
//! `GhostRenderer` with the recording backend.

use dropkit::constants::GHOST_POOL_CAPACITY;
use dropkit::{ElementId, ElementSnapshot, GhostRenderer, HeadlessHost, Rect};

use crate::helpers::RecordingRenderer;

fn host() -> HeadlessHost {
    let host = HeadlessHost::new(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    host.put_element(ElementId(1), Rect::new(10.0, 10.0, 50.0, 30.0));
    host
}

fn snapshot() -> ElementSnapshot {
    ElementSnapshot {
        background: "#3b82f6".to_string(),
        text: "Quarterly report".to_string(),
        width: 50.0,
        height: 30.0,
        selection_count: None,
    }
}

#[test]
fn sequential_drags_reuse_one_pooled_surface() {
    let host = host();
    let mut backend = RecordingRenderer::new();
    let probe = backend.probe();
    let mut ghosts = GhostRenderer::new();

    for _ in 0..1000 {
        let handle = ghosts.create(Some(&mut backend), &host, ElementId(1), &snapshot(), 5.0, 5.0);
        ghosts.cleanup(Some(&mut backend), &host, handle);
    }

    // One surface cycles between the pool and the active ghost.
    assert_eq!(ghosts.pool_len(), 1);
    assert_eq!(ghosts.active_len(), 0);

    let log = probe.lock();
    assert_eq!(log.draws, 1000);
    assert_eq!(log.reuses, 999);
    assert!(log.released.is_empty());
}

#[test]
fn pool_is_trimmed_to_capacity() {
    let host = host();
    let mut backend = RecordingRenderer::new();
    let probe = backend.probe();
    let mut ghosts = GhostRenderer::new();

    let burst = GHOST_POOL_CAPACITY + 3;
    let handles: Vec<_> = (0..burst)
        .map(|i| {
            ghosts.create(
                Some(&mut backend),
                &host,
                ElementId(1),
                &snapshot(),
                i as f64,
                0.0,
            )
        })
        .collect();
    assert_eq!(ghosts.active_len(), burst);

    for handle in handles {
        ghosts.cleanup(Some(&mut backend), &host, handle);
    }

    assert_eq!(ghosts.pool_len(), GHOST_POOL_CAPACITY);
    assert_eq!(probe.lock().released.len(), 3);
}

#[test]
fn unavailable_surface_falls_back_to_host_clone() {
    let host = host();
    let mut backend = RecordingRenderer::unavailable();
    let probe = backend.probe();
    let mut ghosts = GhostRenderer::new();

    let handle = ghosts.create(Some(&mut backend), &host, ElementId(1), &snapshot(), 5.0, 5.0);
    assert_eq!(host.live_clones().len(), 1);
    assert_eq!(probe.lock().draws, 0);

    // Repositioning routes to the host, not the renderer.
    ghosts.update_position(Some(&mut backend), &host, handle, 40.0, 40.0);
    assert!(probe.lock().repositions.is_empty());

    ghosts.cleanup(Some(&mut backend), &host, handle);
    assert!(host.live_clones().is_empty());
    // Clones never enter the surface pool.
    assert_eq!(ghosts.pool_len(), 0);
}

#[test]
fn missing_renderer_uses_host_clone() {
    let host = host();
    let mut ghosts = GhostRenderer::new();

    let handle = ghosts.create(None, &host, ElementId(1), &snapshot(), 5.0, 5.0);
    assert_eq!(host.live_clones().len(), 1);

    ghosts.cleanup(None, &host, handle);
    assert!(host.live_clones().is_empty());
}

#[test]
fn update_position_repositions_without_redrawing() {
    let host = host();
    let mut backend = RecordingRenderer::new();
    let probe = backend.probe();
    let mut ghosts = GhostRenderer::new();

    let handle = ghosts.create(Some(&mut backend), &host, ElementId(1), &snapshot(), 5.0, 5.0);
    ghosts.update_position(Some(&mut backend), &host, handle, 60.0, 70.0);
    ghosts.update_position(Some(&mut backend), &host, handle, 80.0, 90.0);

    let log = probe.lock();
    assert_eq!(log.draws, 1);
    assert_eq!(log.repositions.len(), 2);
    let (_, x, y) = log.repositions[1];
    assert_eq!((x, y), (80.0, 90.0));
}

#[test]
fn cleanup_of_unknown_handle_is_harmless() {
    let host = host();
    let mut backend = RecordingRenderer::new();
    let mut ghosts = GhostRenderer::new();

    let handle = ghosts.create(Some(&mut backend), &host, ElementId(1), &snapshot(), 5.0, 5.0);
    ghosts.cleanup(Some(&mut backend), &host, handle);
    ghosts.cleanup(Some(&mut backend), &host, handle);
    assert_eq!(ghosts.pool_len(), 1);
}

#[test]
fn visual_reflects_snapshot_and_badge() {
    let host = host();
    let mut backend = RecordingRenderer::new();
    let probe = backend.probe();
    let mut ghosts = GhostRenderer::new();

    let snapshot = ElementSnapshot {
        selection_count: Some(4),
        ..snapshot()
    };
    ghosts.create(Some(&mut backend), &host, ElementId(1), &snapshot, 5.0, 5.0);

    let log = probe.lock();
    let visual = log.last_visual.as_ref().unwrap();
    assert_eq!(visual.background, "#3b82f6");
    assert_eq!(visual.badge, Some(4));
}
