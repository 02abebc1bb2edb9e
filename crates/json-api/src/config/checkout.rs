//! Checkout Config

use campus_app::domain::orders::data::CheckoutPolicy;
use clap::{Args, value_parser};

/// Checkout limits.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Largest accepted difference between client and server totals, in minor units
    #[arg(long, env = "CHECKOUT_TOTAL_TOLERANCE", default_value_t = 1_u64)]
    pub total_tolerance: u64,

    /// Order number candidates tried before a checkout gives up
    #[arg(
        long,
        env = "ORDER_NUMBER_MAX_ATTEMPTS",
        default_value_t = 10_u32,
        value_parser = value_parser!(u32).range(1..)
    )]
    pub order_number_max_attempts: u32,
}

impl CheckoutConfig {
    #[must_use]
    pub fn policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            total_tolerance: self.total_tolerance,
            order_number_attempts: self.order_number_max_attempts,
        }
    }
}
