//! End-to-end tests driving `DragEngine` over a `HeadlessHost`.

mod snapshot_tests;
mod timing_tests;
