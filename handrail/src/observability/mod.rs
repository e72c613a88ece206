//! Tracing setup for flow hosts.
//!
//! The engine logs through `tracing`; hosts that do not install their own
//! subscriber can call [`init_tracing`] once at startup.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a formatted tracing subscriber filtered by `RUST_LOG`
/// (default level: `info`).
///
/// Safe to call more than once; later calls are no-ops if a global
/// subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
