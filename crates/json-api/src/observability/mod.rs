//! Logs, traces, metrics and profiling for the store API.

use thiserror::Error;

mod init;
mod logging;
mod metrics;
mod otel;
mod profiling;
mod request;
mod settings;

pub(crate) use init::Observability;
pub(crate) use metrics::{metrics_handler, record_checkout};
pub(crate) use request::request_logging;

/// Telemetry setup failures. Any of these aborts startup.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    #[error("otlp span exporter could not be built: {0}")]
    SpanExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("tracing subscriber could not be installed: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),

    #[error("pyroscope agent failed to start: {0}")]
    Profiler(#[from] pyroscope::PyroscopeError),
}
