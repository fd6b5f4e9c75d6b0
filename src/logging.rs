// ==========================================
// Logging initialization
// ==========================================
// tracing + tracing-subscriber, RUST_LOG filter.
// Logs go to stderr; stdout carries the JSON report.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes human-readable logging
///
/// # Environment
/// - RUST_LOG: filter (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=metro_induction::engine=trace
///
/// # Example
/// ```no_run
/// use metro_induction::logging;
/// logging::init();
/// ```
pub fn init() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .try_init();
}

/// Initializes JSON-line logging (one object per event)
pub fn init_json() {
    let _ = fmt()
        .json()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_current_span(true)
        .try_init();
}

/// Test logging: debug level, captured by the test harness
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
