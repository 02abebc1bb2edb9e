//! Observability Config

use clap::Args;

/// Trace export, profiling and slow request settings.
///
/// Tracing export and profiling are both off unless switched on, so a bare
/// development setup needs no collector running.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export spans over OTLP.
    #[arg(long, env = "OTEL_ENABLED", default_value_t = false)]
    pub otel_enabled: bool,

    /// Continue traces started by callers that send a `traceparent` header.
    #[arg(long, env = "OTEL_PARENT_PROPAGATION_ENABLED", default_value_t = false)]
    pub otel_parent_propagation_enabled: bool,

    /// OTLP gRPC endpoint.
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub otel_exporter_otlp_endpoint: String,

    /// OTLP export timeout in seconds.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS", default_value_t = 3_u64)]
    pub otel_exporter_otlp_timeout_seconds: u64,

    /// Service name reported with traces and profiles.
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "campus-json")]
    pub otel_service_name: String,

    /// Service version reported with traces and profiles.
    #[arg(long, env = "OTEL_SERVICE_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub otel_service_version: String,

    /// Deployment environment reported with traces and profiles.
    #[arg(
        long,
        env = "OTEL_DEPLOYMENT_ENVIRONMENT",
        default_value = "development"
    )]
    pub otel_deployment_environment: String,

    /// Head sampling ratio, clamped to [0.0, 1.0].
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0_f64)]
    pub otel_trace_sample_ratio: f64,

    /// Push CPU profiles to Pyroscope.
    #[arg(long, env = "PYROSCOPE_ENABLED", default_value_t = false)]
    pub pyroscope_enabled: bool,

    /// Pyroscope server address.
    #[arg(
        long,
        env = "PYROSCOPE_SERVER_ADDRESS",
        default_value = "http://localhost:4040"
    )]
    pub pyroscope_server_address: String,

    /// Pyroscope sample rate in Hertz.
    #[arg(long, env = "PYROSCOPE_SAMPLE_RATE", default_value_t = 100_u32)]
    pub pyroscope_sample_rate: u32,

    /// Requests slower than this many milliseconds are logged as warnings.
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000_u64)]
    pub slow_request_threshold_ms: u64,
}
