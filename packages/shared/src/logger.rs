//! Logging setup utilities for the Keyrace binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Sets up logging for the library crates and the binary. The log level can
/// be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "keyrace-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn")
///
/// # Examples
///
/// ```no_run
/// use keyrace_shared::logger::setup_logger;
///
/// setup_logger("keyrace-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::debug!("Logger initialized for {}", binary_name);
}

/// Build the default `EnvFilter` directive string for a binary.
///
/// Every Keyrace crate plus the binary itself log at `default_log_level`;
/// everything else (axum, hyper, tungstenite) stays at the subscriber default.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let crates = [
        "keyrace_shared",
        "keyrace_server",
        "keyrace_client",
        binary_name,
    ];
    crates
        .iter()
        .map(|name| format!("{}={}", name.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}
