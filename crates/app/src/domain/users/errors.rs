//! Users service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::StorageFailure;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("invalid user data")]
    InvalidData(Vec<String>),

    #[error("storage timed out")]
    StorageTimeout(#[source] Error),

    #[error("storage unavailable")]
    StorageUnavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::classify(error) {
            StorageFailure::RowNotFound => Self::NotFound,
            StorageFailure::UniqueViolation => Self::AlreadyExists,
            StorageFailure::NotNullViolation | StorageFailure::CheckViolation => {
                Self::InvalidData(vec!["user data violates a storage constraint".to_string()])
            }
            StorageFailure::Timeout(error) => Self::StorageTimeout(error),
            StorageFailure::Unavailable(error) => Self::StorageUnavailable(error),
            StorageFailure::ForeignKeyViolation => Self::NotFound,
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
