//! Snapshot coverage of the serialized event stream, which is the engine's
//! public wire contract.

use insta::assert_json_snapshot;
use serde_json::json;

use dropkit::Rect;

use crate::helpers::{mouse, perform_drag, EngineBuilder};

const CARD: u64 = 1;
const INBOX: u64 = 10;

#[test]
fn successful_drag_event_stream() {
    let mut engine = EngineBuilder::new()
        .with_draggable(
            CARD,
            json!({ "type": "card", "data": { "id": 7 } }),
            Rect::new(90.0, 90.0, 20.0, 20.0),
        )
        .with_zone(
            INBOX,
            json!({ "name": "inbox", "accepts": ["card"] }),
            Rect::new(200.0, 200.0, 100.0, 100.0),
        )
        .build();

    perform_drag(&mut engine, CARD, (100.0, 100.0), (250.0, 250.0), 0.0);

    assert_json_snapshot!(engine.host().events(), @r###"
    [
      {
        "event": "dragstart",
        "element": 1,
        "type": "card",
        "data": {
          "id": 7
        },
        "x": 175.0,
        "y": 175.0
      },
      {
        "event": "drop",
        "element": 1,
        "drop_zone": "inbox",
        "type": "card",
        "data": {
          "id": 7
        },
        "x": 250.0,
        "y": 250.0,
        "keyboard": false
      },
      {
        "event": "dragend",
        "element": 1,
        "drop_zone": "inbox",
        "success": true,
        "cancelled": false
      }
    ]
    "###);
}

#[test]
fn keyboard_drag_event_stream() {
    let mut engine = EngineBuilder::new()
        .with_draggable(
            CARD,
            json!({ "type": "card", "data": { "id": 7 } }),
            Rect::new(90.0, 90.0, 20.0, 20.0),
        )
        .with_zone(
            INBOX,
            json!({ "name": "inbox", "accepts": ["card"] }),
            Rect::new(200.0, 200.0, 100.0, 100.0),
        )
        .build();

    engine.key_input(" ", Some(dropkit::ElementId(CARD)), 0.0);
    engine.key_input("Tab", None, 50.0);
    engine.key_input("Enter", None, 100.0);

    assert_json_snapshot!(engine.host().events(), @r###"
    [
      {
        "event": "drop",
        "element": 1,
        "drop_zone": "inbox",
        "type": "card",
        "data": {
          "id": 7
        },
        "x": 250.0,
        "y": 250.0,
        "keyboard": true
      },
      {
        "event": "dragend",
        "element": 1,
        "drop_zone": "inbox",
        "success": true,
        "cancelled": false
      }
    ]
    "###);
}

#[test]
fn cancelled_drag_event_stream() {
    let mut engine = EngineBuilder::new()
        .with_draggable(CARD, json!({ "type": "card" }), Rect::new(90.0, 90.0, 20.0, 20.0))
        .build();

    engine.pointer_down(mouse(100.0, 100.0, Some(CARD), 0.0));
    engine.pointer_move(mouse(150.0, 150.0, Some(CARD), 20.0));
    engine.pointer_cancel();

    assert_json_snapshot!(engine.host().events(), @r###"
    [
      {
        "event": "dragstart",
        "element": 1,
        "type": "card",
        "data": {},
        "x": 150.0,
        "y": 150.0
      },
      {
        "event": "dragend",
        "element": 1,
        "drop_zone": null,
        "success": false,
        "cancelled": true
      }
    ]
    "###);
}
