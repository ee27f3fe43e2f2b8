//! Telemetry setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::AppError;

/// Installs the global subscriber, panicking if one is already set.
pub fn init_telemetry() {
    if let Err(e) = try_init_telemetry() {
        panic!("failed to initialize telemetry: {}", e);
    }
}

/// Installs the global subscriber. `LOG_FORMAT=pretty` switches from JSON output.
pub fn try_init_telemetry() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match log_format.as_str() {
        "pretty" => registry.with(fmt::layer().pretty().with_target(true)).try_init(),
        _ => registry.with(fmt::layer().json().with_target(true)).try_init(),
    };
    result.map_err(|e| AppError::TelemetryError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        let _ = try_init_telemetry();
        assert!(matches!(try_init_telemetry(), Err(AppError::TelemetryError(_))));
    }
}
