pub mod category_repository;
pub mod transaction_repository;
pub mod user_repository;

/// Repository errors for database operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Resource not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Resource is still referenced: {0}")]
    ReferenceViolation(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::ConstraintViolation(db_err.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::ReferenceViolation(db_err.to_string())
            }
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            e => RepositoryError::DatabaseError(e.to_string()),
        }
    }
}
