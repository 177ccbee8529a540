use thiserror::Error;

pub type DaoResult<T> = Result<T, DaoError>;

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Sharing report {0} not found")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}
