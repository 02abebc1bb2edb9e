//! Server configuration module

use clap::Parser;

use crate::config::{
    checkout::CheckoutConfig,
    db::DatabaseConfig,
    logging::LoggingConfig,
    observability::ObservabilityConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod checkout;
pub(crate) mod db;
pub(crate) mod logging;
pub(crate) mod observability;
pub(crate) mod server;

/// Campus Store JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "campus-json", about = "Campus Store JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics/profiles) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Checkout limits.
    #[command(flatten)]
    pub checkout: CheckoutConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_the_database_url_is_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "campus-json",
            "--database-url",
            "postgres://campus@localhost/campus",
        ])?;

        let options = config.database.options();
        let policy = config.checkout.policy();

        assert_eq!(config.server.port, 8698);
        assert_eq!(config.server.shutdown_grace(), Some(Duration::from_secs(30)));
        assert_eq!(options.acquire_timeout, Duration::from_millis(3_000));
        assert_eq!(options.statement_timeout, Duration::from_millis(5_000));
        assert_eq!(policy.total_tolerance, 1);
        assert_eq!(policy.order_number_attempts, 10);

        Ok(())
    }

    #[test]
    fn zero_order_number_attempts_is_rejected() {
        let result = ServerConfig::try_parse_from([
            "campus-json",
            "--database-url",
            "postgres://campus@localhost/campus",
            "--order-number-max-attempts",
            "0",
        ]);

        assert!(result.is_err(), "expected zero attempts to be rejected");
    }
}
