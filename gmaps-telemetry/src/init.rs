//! Subscriber initialisation.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// `RUST_LOG` when set and valid, `info` otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize console logging.
///
/// Only the first call installs a subscriber; later calls are no-ops, as are
/// calls made after another global subscriber was installed.
///
/// # Example
/// ```
/// use gmaps_telemetry::init_telemetry;
/// init_telemetry("gmaps-cli").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init();

        tracing::info!(service.name = service_name, "Telemetry initialized");
    });

    result.map_err(Into::into)
}

/// Initialize newline-delimited JSON logging, one object per event.
pub fn init_json_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init();

        tracing::info!(service.name = service_name, format = "json", "Telemetry initialized");
    });

    result.map_err(Into::into)
}
