use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::repository::RepositoryError;

pub mod categories;
pub mod products;
pub mod tags;

/// Result type returned by all service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors exposed by the service layer.
///
/// Every externally visible failure is normalized into one of these
/// variants; `InvalidInput` messages are safe to return to clients, while
/// `Repository` keeps the full detail for server-side logging only.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,
    /// The client's payload was rejected; the message is client-safe.
    #[error("{0}")]
    InvalidInput(String),
    /// An infrastructure failure the client should not learn details of.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Database(DieselError::DatabaseError(kind, info)) => match kind {
                DatabaseErrorKind::ForeignKeyViolation => ServiceError::InvalidInput(
                    "a referenced category or tag does not exist".to_string(),
                ),
                DatabaseErrorKind::UniqueViolation => ServiceError::InvalidInput(
                    "a record with the same unique value already exists".to_string(),
                ),
                DatabaseErrorKind::NotNullViolation | DatabaseErrorKind::CheckViolation => {
                    ServiceError::InvalidInput(
                        "the payload violates a database constraint".to_string(),
                    )
                }
                _ => ServiceError::Repository(RepositoryError::Database(
                    DieselError::DatabaseError(kind, info),
                )),
            },
            other => ServiceError::Repository(other),
        }
    }
}
