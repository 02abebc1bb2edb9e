//! Telemetry lifecycle management.

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace::SdkTracerProvider};
use tracing::{error, info};

use crate::config::ServerConfig;

use super::{ObservabilityError, logging, otel, profiling::Profiling, settings};

/// Runtime observability state, torn down in reverse order on shutdown.
#[derive(Debug)]
pub(crate) struct Observability {
    tracer_provider: Option<SdkTracerProvider>,
    profiling: Profiling,
}

impl Observability {
    /// Initialise logging, then optional trace export and profiling.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        settings::apply_runtime_config(config);

        let tracer_provider = if config.observability.otel_enabled {
            global::set_text_map_propagator(TraceContextPropagator::new());

            Some(otel::build_tracer_provider(config)?)
        } else {
            None
        };

        logging::init_subscriber(config, tracer_provider.as_ref())?;

        let profiling = Profiling::init(config)?;

        info!(
            otel_enabled = config.observability.otel_enabled,
            pyroscope_enabled = config.observability.pyroscope_enabled,
            log_format = ?config.logging.log_format,
            "observability initialised"
        );

        Ok(Self {
            tracer_provider,
            profiling,
        })
    }

    /// Stop profiling, then flush and shut down trace export.
    pub(crate) fn shutdown(self) {
        self.profiling.shutdown();

        let Some(provider) = self.tracer_provider else {
            return;
        };

        if let Err(source) = provider.shutdown() {
            error!("failed to shutdown tracer provider: {source}");
        }
    }
}
