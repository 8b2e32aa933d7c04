//! Telemetry initialization for structured logging.
//!
//! Logging is built on `tracing` with an `EnvFilter`. When `json_logs` is
//! enabled (the container image sets `FINTRACK__TELEMETRY__JSON_LOGS=1`),
//! output switches to newline-delimited JSON suitable for non-interactive
//! log capture.

use serde::{Deserialize, Serialize};

#[cfg(feature = "telemetry")]
use crate::FintrackResult;

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log filter directive (overridden by `RUST_LOG`).
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

fn default_level() -> String {
    "info,fintrack=debug,tower_http=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_logs: false,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level so operators can
/// raise verbosity without editing config files.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> FintrackResult<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| {
        crate::FintrackError::Configuration(format!("Failed to initialize tracing: {}", e))
    })
}
