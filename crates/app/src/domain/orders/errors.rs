//! Orders service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{database::StorageFailure, domain::products::records::ProductUuid};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("checkout validation failed")]
    ValidationFailed(Vec<String>),

    #[error("product {0} is no longer available")]
    ProductUnavailable(ProductUuid),

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("no unique order number after {attempts} attempts")]
    OrderNumberExhausted { attempts: u32 },

    #[error("storage timed out")]
    StorageTimeout(#[source] Error),

    #[error("storage unavailable")]
    StorageUnavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::classify(error) {
            StorageFailure::RowNotFound => Self::NotFound,
            StorageFailure::UniqueViolation
            | StorageFailure::ForeignKeyViolation
            | StorageFailure::NotNullViolation
            | StorageFailure::CheckViolation => Self::ValidationFailed(vec![
                "order data violates a storage constraint".to_string(),
            ]),
            StorageFailure::Timeout(error) => Self::StorageTimeout(error),
            StorageFailure::Unavailable(error) => Self::StorageUnavailable(error),
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
