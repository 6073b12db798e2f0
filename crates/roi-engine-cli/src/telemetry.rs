use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("--log-level '{value}' is not a valid tracing filter")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("could not install the log subscriber: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Filter from `RUST_LOG` when set, else from the `--log-level` flag.
fn log_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    flag_filter(log_level)
}

fn flag_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(log_level).map_err(|source| TelemetryError::Filter {
        value: log_level.to_string(),
        source,
    })
}

/// Install the stderr subscriber; stdout carries only command output.
pub fn init(log_level: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_level_and_module_directives() {
        assert!(flag_filter("warn").is_ok());
        assert!(flag_filter("roi_engine_core=debug,warn").is_ok());
    }

    #[test]
    fn test_rejects_unknown_level() {
        let err = flag_filter("roi_engine_core=loud").unwrap_err();
        assert!(err.to_string().contains("roi_engine_core=loud"));
    }
}
