//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{auth::ApiTokenError, database::StorageFailure};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Missing, malformed, unknown, expired, revoked or mismatched credentials.
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("user not found")]
    UserNotFound,

    #[error("token processing error")]
    Token(#[source] ApiTokenError),

    #[error("api token violates a storage constraint")]
    Constraint,

    #[error("storage timed out")]
    StorageTimeout(#[source] Error),

    #[error("storage unavailable")]
    StorageUnavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::classify(error) {
            StorageFailure::RowNotFound => Self::Unauthenticated,
            StorageFailure::ForeignKeyViolation => Self::UserNotFound,
            StorageFailure::Timeout(error) => Self::StorageTimeout(error),
            StorageFailure::Unavailable(error) => Self::StorageUnavailable(error),
            StorageFailure::UniqueViolation
            | StorageFailure::NotNullViolation
            | StorageFailure::CheckViolation => Self::Constraint,
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}
