//! Performance monitor internals: rolling-window behavior, measurement
//! helpers and the engine-facing report.

use dropkit::perf::{benchmark, measure, OperationStats, PerfMonitor, ScopedTimer};

#[test]
fn rolling_window_evicts_old_samples() {
    let mut stats = OperationStats::default();
    for _ in 0..100 {
        stats.record(10.0);
    }
    for _ in 0..100 {
        stats.record(1.0);
    }

    // Average covers only the window; max is all-time.
    assert!((stats.average() - 1.0).abs() < 1e-9);
    assert!((stats.max() - 10.0).abs() < 1e-9);
    assert_eq!(stats.count(), 200);
}

#[test]
fn empty_stats_report_zero_average() {
    let stats = OperationStats::default();
    assert_eq!(stats.average(), 0.0);
    assert_eq!(stats.count(), 0);
}

#[test]
fn measure_returns_the_closure_result() {
    let (value, elapsed_ms) = measure(|| 6 * 7);
    assert_eq!(value, 42);
    assert!(elapsed_ms >= 0.0);
}

#[test]
fn benchmark_with_zero_iterations_is_well_defined() {
    let mut calls = 0_u32;
    let result = benchmark(0, || calls += 1);
    assert_eq!(calls, 0);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.avg_ms, 0.0);
}

#[test]
fn scoped_timer_reports_monotonic_elapsed_time() {
    let timer = ScopedTimer::for_profiling("test-span");
    let first = timer.elapsed_ms();
    let second = timer.elapsed_ms();
    assert!(first >= 0.0);
    assert!(second >= first);
}

#[test]
fn report_combines_counters_and_both_stat_channels() {
    let mut monitor = PerfMonitor::new();
    monitor.count_drag();
    monitor.count_drop();
    monitor.record_event_processing(0.2);
    monitor.record_spatial_query(0.4);

    let report = monitor.get();
    assert_eq!(report.drag_count, 1);
    assert_eq!(report.drop_count, 1);
    assert_eq!(report.cancel_count, 0);
    assert!((report.event_avg_ms - 0.2).abs() < 1e-9);
    assert!((report.query_avg_ms - 0.4).abs() < 1e-9);
    assert!((report.query_max_ms - 0.4).abs() < 1e-9);
}
