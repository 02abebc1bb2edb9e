//! Continuous CPU profiling via Pyroscope.

use std::fmt;

use pyroscope::{
    backend::{BackendConfig, PprofConfig, pprof_backend},
    pyroscope::{PyroscopeAgent, PyroscopeAgentBuilder, PyroscopeAgentRunning},
};
use tracing::{error, info};

use crate::config::ServerConfig;

use super::ObservabilityError;

/// A running profiling agent, or nothing when profiling is switched off.
pub(super) struct Profiling {
    agent: Option<PyroscopeAgent<PyroscopeAgentRunning>>,
}

impl fmt::Debug for Profiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profiling")
            .field("running", &self.agent.is_some())
            .finish()
    }
}

impl Profiling {
    pub(super) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        if !config.observability.pyroscope_enabled {
            return Ok(Self { agent: None });
        }

        let agent = start_agent(config)?;

        info!(
            server = %config.observability.pyroscope_server_address,
            sample_rate = config.observability.pyroscope_sample_rate,
            "pyroscope profiling started"
        );

        Ok(Self { agent: Some(agent) })
    }

    pub(super) fn shutdown(self) {
        let Some(agent) = self.agent else {
            return;
        };

        match agent.stop() {
            Ok(stopped) => stopped.shutdown(),
            Err(source) => error!("failed to stop pyroscope agent: {source}"),
        }
    }
}

fn start_agent(
    config: &ServerConfig,
) -> Result<PyroscopeAgent<PyroscopeAgentRunning>, ObservabilityError> {
    let observability = &config.observability;
    let service_name = observability.otel_service_name.as_str();
    let service_version = observability.otel_service_version.as_str();

    let backend = pprof_backend(
        PprofConfig {
            sample_rate: observability.pyroscope_sample_rate,
        },
        BackendConfig::default(),
    );

    let agent = PyroscopeAgentBuilder::new(
        observability.pyroscope_server_address.as_str(),
        service_name,
        observability.pyroscope_sample_rate,
        "pyroscope-rs",
        service_version,
        backend,
    )
    .tags(vec![
        ("service.name", service_name),
        ("service.version", service_version),
        (
            "deployment.environment.name",
            observability.otel_deployment_environment.as_str(),
        ),
    ])
    .build()?;

    Ok(agent.start()?)
}
