//! Tracing subscriber setup.
//!
//! Library consumers with their own subscriber can skip this entirely;
//! [`init`] is a convenience for binaries and tests.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install a global fmt subscriber according to `config`.
///
/// The `RUST_LOG` environment variable, when set, overrides the configured
/// level. Calling this more than once (or alongside another subscriber) is
/// harmless: later initializations are ignored.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if config.timestamps {
        let _ = subscriber.try_init();
    } else {
        let _ = subscriber.without_time().try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_reentrant() {
        let config = LoggingConfig::default();
        init(&config);
        init(&config);
    }
}
