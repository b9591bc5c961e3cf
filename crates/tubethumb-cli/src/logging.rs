//! Tracing setup for the binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialise tracing on stderr. JSON when `LOG_FORMAT=json`.
///
/// `verbose` raises the default level for this application's crates.
pub fn init_tracing(verbose: bool) {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let level = if verbose { "debug" } else { "warn" };
    let mut env_filter = EnvFilter::from_default_env();
    for crate_name in [
        "tubethumb",
        "tubethumb_cli",
        "tubethumb_media",
        "tubethumb_history",
        "tubethumb_ai",
    ] {
        if let Ok(directive) = format!("{}={}", crate_name, level).parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}
