//! Performance monitoring sidecar.
//!
//! Tracks drag lifecycle counters and timing statistics for event
//! processing and spatial queries, warning when either exceeds its budget.
//! The monitor is a pure observer: nothing in the state machine or the
//! index consults it, so it can never affect correctness.
//!
//! ## Usage
//!
//! Enable detailed instrumentation with the `profiling` feature flag:
//! ```toml
//! [dependencies]
//! dropkit = { features = ["profiling"] }
//! ```
//!
//! Use the profiling macro for zero-cost instrumentation:
//! ```ignore
//! use dropkit::profile_scope;
//!
//! fn handle_pointer_move() {
//!     profile_scope!("pointer_move");
//!     // ... work ...
//! }
//! ```

use std::collections::VecDeque;
use std::time::Instant;
use tracing::warn;
#[cfg(feature = "profiling")]
use tracing::trace;

use crate::constants::{EVENT_WARN_MS, QUERY_WARN_MS};

/// Number of samples kept for rolling statistics.
const STATS_SAMPLE_COUNT: usize = 100;

// ============================================================================
// Profiling Macro (zero-cost when disabled)
// ============================================================================

/// Profile a scope with the given name. Zero-cost when profiling is
/// disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::for_profiling($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name; // Suppress unused variable warning
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use profile_scope;

// ============================================================================
// Operation Statistics
// ============================================================================

/// Rolling statistics for one operation type.
#[derive(Debug, Clone)]
pub struct OperationStats {
    samples: VecDeque<f64>,
    count: u64,
    min_ms: f64,
    max_ms: f64,
    sum_ms: f64,
}

impl Default for OperationStats {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(STATS_SAMPLE_COUNT),
            count: 0,
            min_ms: f64::MAX,
            max_ms: 0.0,
            sum_ms: 0.0,
        }
    }
}

impl OperationStats {
    /// Record a new timing sample.
    pub fn record(&mut self, ms: f64) {
        if self.samples.len() >= STATS_SAMPLE_COUNT {
            if let Some(old) = self.samples.pop_front() {
                self.sum_ms -= old;
            }
        }
        self.samples.push_back(ms);
        self.sum_ms += ms;
        self.count += 1;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    /// Average over recent samples.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_ms / self.samples.len() as f64
        }
    }

    pub fn max(&self) -> f64 {
        self.max_ms
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

// ============================================================================
// Performance Monitor
// ============================================================================

/// Read-only snapshot of the monitor, as returned by [`PerfMonitor::get`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerfReport {
    pub drag_count: u64,
    pub drop_count: u64,
    pub cancel_count: u64,
    pub event_avg_ms: f64,
    pub event_max_ms: f64,
    pub query_avg_ms: f64,
    pub query_max_ms: f64,
}

/// Counters and timing statistics for one engine instance.
#[derive(Debug, Default)]
pub struct PerfMonitor {
    drag_count: u64,
    drop_count: u64,
    cancel_count: u64,
    event_stats: OperationStats,
    query_stats: OperationStats,
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_drag(&mut self) {
        self.drag_count += 1;
    }

    pub fn count_drop(&mut self) {
        self.drop_count += 1;
    }

    pub fn count_cancel(&mut self) {
        self.cancel_count += 1;
    }

    /// Record the duration of one event-processing pass.
    pub fn record_event_processing(&mut self, ms: f64) {
        self.event_stats.record(ms);
        if ms > EVENT_WARN_MS {
            warn!(
                elapsed_ms = format!("{ms:.3}"),
                threshold_ms = format!("{EVENT_WARN_MS:.1}"),
                "slow event processing"
            );
        }
    }

    /// Record the duration of one spatial query.
    pub fn record_spatial_query(&mut self, ms: f64) {
        self.query_stats.record(ms);
        if ms > QUERY_WARN_MS {
            warn!(
                elapsed_ms = format!("{ms:.3}"),
                threshold_ms = format!("{QUERY_WARN_MS:.1}"),
                "slow spatial query"
            );
        }
    }

    /// Current counters and rolling statistics.
    pub fn get(&self) -> PerfReport {
        PerfReport {
            drag_count: self.drag_count,
            drop_count: self.drop_count,
            cancel_count: self.cancel_count,
            event_avg_ms: self.event_stats.average(),
            event_max_ms: self.event_stats.max(),
            query_avg_ms: self.query_stats.average(),
            query_max_ms: self.query_stats.max(),
        }
    }

    /// Reset all counters and statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Benchmarking
// ============================================================================

/// Result of a [`benchmark`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkResult {
    pub iterations: u32,
    pub total_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
}

/// Run a closure `iterations` times and report timing.
pub fn benchmark<F: FnMut()>(iterations: u32, mut f: F) -> BenchmarkResult {
    let mut total_ms = 0.0;
    let mut max_ms: f64 = 0.0;
    for _ in 0..iterations {
        let (_, elapsed) = measure(&mut f);
        total_ms += elapsed;
        max_ms = max_ms.max(elapsed);
    }
    BenchmarkResult {
        iterations,
        total_ms,
        avg_ms: if iterations == 0 {
            0.0
        } else {
            total_ms / f64::from(iterations)
        },
        max_ms,
    }
}

/// Measure execution time of a closure and return both the result and the
/// elapsed milliseconds.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    (result, elapsed_ms)
}

// ============================================================================
// Scoped Timer
// ============================================================================

/// A scoped timer that warns on drop if its threshold was exceeded.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Timer tuned for profiling hot paths (1ms threshold).
    pub fn for_profiling(name: &'static str) -> Self {
        Self::new(name, 1.0)
    }

    /// Elapsed time without stopping the timer.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms > self.threshold_ms {
            #[cfg(feature = "profiling")]
            trace!("[PERF] {}: {:.3}ms", self.name, elapsed_ms);
            #[cfg(not(feature = "profiling"))]
            warn!(
                operation = self.name,
                elapsed_ms = format!("{elapsed_ms:.3}"),
                "slow operation"
            );
        }
    }
}
