//! Products service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::StorageFailure;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid product data")]
    InvalidData(Vec<String>),

    #[error("insufficient stock: {available} available")]
    InsufficientStock { available: u32 },

    #[error("storage timed out")]
    StorageTimeout(#[source] Error),

    #[error("storage unavailable")]
    StorageUnavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::classify(error) {
            StorageFailure::RowNotFound => Self::NotFound,
            StorageFailure::UniqueViolation => Self::AlreadyExists,
            StorageFailure::ForeignKeyViolation => Self::InvalidReference,
            StorageFailure::NotNullViolation | StorageFailure::CheckViolation => {
                Self::InvalidData(vec!["product data violates a storage constraint".to_string()])
            }
            StorageFailure::Timeout(error) => Self::StorageTimeout(error),
            StorageFailure::Unavailable(error) => Self::StorageUnavailable(error),
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
