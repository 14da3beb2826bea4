//! Diagnostics setup. Reports go to stdout or `--output`; tracing events go
//! to stderr so a piped `gradecast predict -f json` stays parseable.

use tracing_subscriber::EnvFilter;

/// Crates whose events are shown; dependencies stay silent.
const CRATE_TARGETS: &[&str] = &[
    "gradecast",
    "gradecast_forecast",
    "gradecast_io",
    "gradecast_stats",
];

/// Install the stderr subscriber.
///
/// With no `-v` only warnings surface, such as skipped quality groups or
/// crossed interval bounds. `-v` adds file loads and per-command summaries,
/// `-vv` the per-group window, plan month and reconciliation steps. `RUST_LOG`
/// replaces the whole filter when set.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
