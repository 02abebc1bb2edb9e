//! Orders

pub mod data;
pub mod errors;
pub mod numbers;
pub mod records;
mod repositories;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
