//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate and everything else stays at `warn`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a configured level.
pub fn default_directive(level: &str) -> String {
    format!("warn,lootbox_combiner={}", level)
}

/// Initialize the global subscriber. Call once, first thing in `main`.
pub fn init(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(level))),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        let directive = default_directive("debug");
        assert_eq!(directive, "warn,lootbox_combiner=debug");
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
