//! Integration test harness.
//!
//! Single test target mirroring the crate's service boundaries; each module
//! exercises one subsystem end to end through the public API.

mod demo_run_test;
mod evaluation_test;
mod fallback_test;
mod rate_limit_test;
