use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Query execution error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Integrity constraint violation: {0}")]
    IntegrityError(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("Retry limit exceeded after {attempts} attempts")]
    RetryLimitExceeded { attempts: u8 },
}

impl DatabaseError {
    /// Check if this is a uniqueness violation (duplicate natural key)
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::IntegrityError(_) => true,
            Self::QueryError(e) => e
                .as_database_error()
                .map(|db_error| db_error.code().as_deref() == Some("23505"))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Check if a write pointed at a row that does not exist (foreign key)
    pub fn is_missing_reference(&self) -> bool {
        match self {
            Self::MissingReference(_) => true,
            Self::QueryError(e) => e
                .as_database_error()
                .map(|db_error| db_error.code().as_deref() == Some("23503"))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::QueryError(e) => {
                // Transient errors: serialization failures and deadlocks
                if let Some(db_error) = e.as_database_error() {
                    matches!(
                        db_error.code().as_deref(),
                        Some("40001") | // serialization_failure
                        Some("40P01") // deadlock_detected
                    )
                } else {
                    matches!(e, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
                }
            }
            Self::ConnectionError(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reference_is_not_a_unique_violation() {
        let err = DatabaseError::MissingReference("restaurant 7".to_string());

        assert!(err.is_missing_reference());
        assert!(!err.is_unique_violation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_duplicate_is_not_a_missing_reference() {
        let err = DatabaseError::IntegrityError("display_name 'alice'".to_string());

        assert!(err.is_unique_violation());
        assert!(!err.is_missing_reference());
    }

    #[test]
    fn test_pool_errors_stay_retryable_through_conversion() {
        let err: DatabaseError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_retryable());

        let err: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(!err.is_retryable());
    }
}
