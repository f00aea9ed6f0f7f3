mod ghost_tests;
mod perf_tests;
mod spatial_tests;
