//! Logging setup for the binary.
//!
//! Installs a global tracing subscriber writing to stderr, so stdout stays
//! reserved for reports. The filter comes from `RUST_LOG` and defaults to
//! `info`; `--verbose` raises the default to `debug`.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing to stderr.
///
/// Subsequent calls are no-ops.
pub fn init(verbose: bool) -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let subscriber = Registry::default()
        .with(build_env_filter(default_directive(verbose)))
        .with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = INSTALLED.set(());

    tracing::debug!("logging initialized");
    Ok(())
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn build_env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_default_level() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }
}
