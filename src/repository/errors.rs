use diesel::result::Error as DieselError;
use thiserror::Error;

/// Result type returned by all repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested record does not exist.
    #[error("record not found")]
    NotFound,
    /// The connection pool could not hand out a connection.
    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            other => RepositoryError::Database(other),
        }
    }
}
