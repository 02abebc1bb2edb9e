//! Categories service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::StorageFailure;

#[derive(Debug, Error)]
pub enum CategoriesServiceError {
    #[error("category slug already in use")]
    AlreadyExists,

    #[error("category not found")]
    NotFound,

    #[error("invalid category data")]
    InvalidData(Vec<String>),

    #[error("storage timed out")]
    StorageTimeout(#[source] Error),

    #[error("storage unavailable")]
    StorageUnavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CategoriesServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::classify(error) {
            StorageFailure::RowNotFound | StorageFailure::ForeignKeyViolation => Self::NotFound,
            StorageFailure::UniqueViolation => Self::AlreadyExists,
            StorageFailure::NotNullViolation | StorageFailure::CheckViolation => {
                Self::InvalidData(vec!["category data violates a storage constraint".to_string()])
            }
            StorageFailure::Timeout(error) => Self::StorageTimeout(error),
            StorageFailure::Unavailable(error) => Self::StorageUnavailable(error),
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
