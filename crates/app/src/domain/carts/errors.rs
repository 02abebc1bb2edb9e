//! Carts service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{database::StorageFailure, domain::products::records::ProductUuid};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart or cart item not found")]
    NotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("product {0} is not available")]
    Unavailable(ProductUuid),

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        requested: u32,
        available: u32,
    },

    #[error("cart validation failed")]
    ValidationFailed(Vec<String>),

    #[error("storage timed out")]
    StorageTimeout(#[source] Error),

    #[error("storage unavailable")]
    StorageUnavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::classify(error) {
            StorageFailure::RowNotFound => Self::NotFound,
            StorageFailure::ForeignKeyViolation => Self::ProductNotFound,
            StorageFailure::UniqueViolation
            | StorageFailure::NotNullViolation
            | StorageFailure::CheckViolation => {
                Self::ValidationFailed(vec!["cart data violates a storage constraint".to_string()])
            }
            StorageFailure::Timeout(error) => Self::StorageTimeout(error),
            StorageFailure::Unavailable(error) => Self::StorageUnavailable(error),
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
