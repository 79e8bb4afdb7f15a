//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

const DEFAULT_FILTER: &str = "info,switchyard_core=debug";

/// Initialize a simple stdout tracing subscriber for development.
///
/// Honors `RUST_LOG`; falls back to `info,switchyard_core=debug`.
///
/// # Panics
/// If a global subscriber is already installed.
pub fn init_stdout_tracing() {
    tracing_subscriber::fmt().with_env_filter(filter()).init();
}

/// Like `init_stdout_tracing`, but reports an already-installed subscriber instead of panicking.
pub fn try_init_stdout_tracing() -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_reported() {
        let _ = try_init_stdout_tracing();
        assert!(try_init_stdout_tracing().is_err());
    }
}
