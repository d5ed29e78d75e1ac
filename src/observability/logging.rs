//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick the log level from `RUST_LOG`, then config, then development mode
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format when configured, pretty format in development
//! - Initialization is idempotent (a second call is ignored)

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ObservabilityConfig;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(config: &ObservabilityConfig, development: bool) -> String {
    let level = if development { "debug" } else { config.log_level.as_str() };
    format!("route_dispatch={level},access=info,tower_http={level}")
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig, development: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config, development)));

    let layer = if config.json_logs {
        fmt::layer().json().boxed()
    } else if development {
        fmt::layer().pretty().boxed()
    } else {
        fmt::layer().boxed()
    };

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_forces_debug() {
        let config = ObservabilityConfig::default();
        assert!(default_directive(&config, true).starts_with("route_dispatch=debug"));
        assert!(default_directive(&config, false).starts_with("route_dispatch=info"));
    }
}
