//! tracing-subscriber setup for native binaries.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr so it
/// never mixes with command output. Calling this twice is harmless.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}

/// `"debug"` -> `aura=debug`; full directives pass through
fn filter_for(level: &str) -> EnvFilter {
    let level = level.trim();
    let directive = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("aura={}", level)
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("aura=warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_for("debug").to_string(), "aura=debug");
        let combined = filter_for("aura=info,reqwest=warn").to_string();
        assert!(combined.contains("aura=info"));
        assert!(combined.contains("reqwest=warn"));
    }

    #[test]
    fn test_init_twice() {
        let config = LoggingConfig::default();
        init(&config);
        init(&config);
    }
}
