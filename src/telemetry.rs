//! Tracing subscriber initialisation for taskboard binaries.

use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins when set and valid; otherwise `fallback_directive` (the
/// configured log level) is used.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_tracing(
    fallback_directive: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_directive));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
}
