//! Wishlists service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::StorageFailure;

#[derive(Debug, Error)]
pub enum WishlistsServiceError {
    #[error("product not found")]
    ProductNotFound,

    #[error("wishlist entry violates a storage constraint")]
    Constraint,

    #[error("storage timed out")]
    StorageTimeout(#[source] Error),

    #[error("storage unavailable")]
    StorageUnavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for WishlistsServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::classify(error) {
            StorageFailure::RowNotFound | StorageFailure::ForeignKeyViolation => {
                Self::ProductNotFound
            }
            StorageFailure::Timeout(error) => Self::StorageTimeout(error),
            StorageFailure::Unavailable(error) => Self::StorageUnavailable(error),
            StorageFailure::UniqueViolation
            | StorageFailure::NotNullViolation
            | StorageFailure::CheckViolation => Self::Constraint,
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
