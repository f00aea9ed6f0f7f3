//! Single test binary entry point.
//!
//! This consolidates all tests into a single binary following matklad's best
//! practices, reducing linking overhead from 3x to 1x.
//!
//! Structure:
//! - unit: Single-component tests (state machine, spatial index, ghosts,
//!   keyboard controller, perf monitor)
//! - integration: Full engine workflows driven through the headless host

mod integration;
mod unit;
