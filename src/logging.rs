use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "EXPENSE_TRACKER_LOG";

/// Diagnostics go to stderr so they never interleave with the menu on stdout.
/// Quiet by default; set `EXPENSE_TRACKER_LOG=debug` to see store activity.
pub(crate) fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // Errors only when a global subscriber is already set; that one stays in
    // place, so the result is dropped on purpose.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
