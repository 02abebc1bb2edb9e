//! Logging subscriber initialisation.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer as _, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{ServerConfig, logging::LogFormat};

use super::ObservabilityError;

/// Dependencies that are chatty at `info` and below.
const QUIET_TARGETS: &[&str] = &["sqlx", "h2", "hyper", "tower", "tonic", "opentelemetry"];

pub(super) fn init_subscriber(
    config: &ServerConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let fmt_layer = match config.logging.log_format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
    };

    let otel_layer = tracer_provider.map(|provider| {
        tracing_opentelemetry::layer()
            .with_tracer(provider.tracer(config.observability.otel_service_name.clone()))
    });

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(env_filter(&config.logging.log_level))
        .try_init()?;

    Ok(())
}

fn filter_directives(level: &str) -> String {
    QUIET_TARGETS
        .iter()
        .fold(level.to_owned(), |directives, target| {
            format!("{directives},{target}=warn")
        })
}

/// Build the filter from `level`, falling back to `info` when it does not parse.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(filter_directives(level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("info")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_targets_are_capped_at_warn() {
        let directives = filter_directives("campus_json=debug");

        assert!(directives.starts_with("campus_json=debug,"));
        assert!(directives.contains("sqlx=warn"));
        assert!(directives.ends_with("opentelemetry=warn"));
    }

    #[test]
    fn unparseable_level_falls_back_to_info() {
        let filter = env_filter("campus_json=[{");

        assert!(filter.to_string().contains("info"), "{filter}");
    }
}
