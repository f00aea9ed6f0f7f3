//! Rate limiting of pointer moves and debounced index rebuilds, driven by
//! explicit sample timestamps.

use serde_json::json;

use dropkit::{DragPhase, ElementId, Point, Rect};

use crate::helpers::{mouse, EngineBuilder};

const CARD: u64 = 1;
const INBOX: u64 = 10;

fn card_engine() -> EngineBuilder {
    EngineBuilder::new()
        .with_draggable(CARD, json!({ "type": "card" }), Rect::new(90.0, 90.0, 20.0, 20.0))
        .with_zone(
            INBOX,
            json!({ "name": "inbox", "accepts": ["card"] }),
            Rect::new(200.0, 200.0, 100.0, 100.0),
        )
}

#[test]
fn moves_inside_the_rate_window_are_dropped() {
    let mut engine = card_engine().build();

    engine.pointer_down(mouse(100.0, 100.0, Some(CARD), 0.0));
    // First move opens the window and stays below the drag threshold.
    engine.pointer_move(mouse(102.0, 100.0, Some(CARD), 5.0));
    assert_eq!(engine.phase(), DragPhase::Pending);

    // 5ms later: inside the ~16.7ms window, silently dropped even though
    // it would have crossed the threshold.
    engine.pointer_move(mouse(150.0, 150.0, Some(CARD), 10.0));
    assert_eq!(engine.phase(), DragPhase::Pending);

    // Past the window: processed.
    engine.pointer_move(mouse(150.0, 150.0, Some(CARD), 25.0));
    assert_eq!(engine.phase(), DragPhase::Dragging);
}

#[test]
fn pointer_up_ignores_the_rate_window() {
    let mut engine = card_engine().build();

    engine.pointer_down(mouse(100.0, 100.0, Some(CARD), 0.0));
    engine.pointer_move(mouse(150.0, 150.0, Some(CARD), 20.0));
    engine.pointer_move(mouse(250.0, 250.0, Some(CARD), 40.0));
    assert_eq!(engine.phase(), DragPhase::Hovering);

    // 1ms after the last processed move. The drop must still land.
    engine.pointer_up(mouse(250.0, 250.0, Some(CARD), 41.0));
    assert_eq!(engine.phase(), DragPhase::Idle);
    let events = engine.host().events();
    assert_eq!(events.len(), 3);
}

#[test]
fn rate_window_resets_between_drags() {
    let mut engine = card_engine().build();

    engine.pointer_down(mouse(100.0, 100.0, Some(CARD), 0.0));
    engine.pointer_move(mouse(150.0, 150.0, Some(CARD), 20.0));
    engine.pointer_up(mouse(150.0, 150.0, Some(CARD), 21.0));

    // A new drag's first move arrives 2ms later; it must not be gated by
    // the previous drag's window.
    engine.pointer_down(mouse(100.0, 100.0, Some(CARD), 22.0));
    engine.pointer_move(mouse(150.0, 150.0, Some(CARD), 23.0));
    assert_eq!(engine.phase(), DragPhase::Dragging);
}

#[test]
fn resize_rebuild_waits_out_the_debounce() {
    let mut engine = card_engine().build();

    // The zone element moves, then a burst of resize notifications.
    engine
        .host()
        .put_element(ElementId(INBOX), Rect::new(600.0, 600.0, 100.0, 100.0));
    engine.viewport_resized(0.0);
    engine.viewport_resized(50.0);
    engine.viewport_resized(100.0);

    // Before the deadline the index still has the stale bounds, so a drag
    // over the new location finds nothing.
    engine.pointer_down(mouse(100.0, 100.0, Some(CARD), 150.0));
    engine.pointer_move(mouse(400.0, 400.0, Some(CARD), 170.0));
    engine.pointer_move(mouse(650.0, 650.0, Some(CARD), 190.0));
    assert_eq!(engine.phase(), DragPhase::Dragging);
    engine.pointer_cancel();

    // 250ms after the last notification the next input triggers the
    // rebuild, and the zone is found at its new bounds.
    engine.pointer_down(mouse(100.0, 100.0, Some(CARD), 360.0));
    engine.pointer_move(mouse(400.0, 400.0, Some(CARD), 380.0));
    engine.pointer_move(mouse(650.0, 650.0, Some(CARD), 400.0));
    assert_eq!(engine.phase(), DragPhase::Hovering);
    engine.pointer_cancel();
}

#[test]
fn zone_queries_flush_a_pending_rebuild() {
    let mut engine = card_engine().build();

    engine
        .host()
        .put_element(ElementId(INBOX), Rect::new(600.0, 600.0, 100.0, 100.0));
    engine.viewport_resized(0.0);

    // The query must not see stale geometry, so it rebuilds eagerly
    // instead of waiting out the debounce.
    let zones = engine.drop_zones_at(Point::new(650.0, 650.0));
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].name, "inbox");
    assert!(engine.drop_zones_at(Point::new(250.0, 250.0)).is_empty());
}
