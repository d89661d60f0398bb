//! Custom error types for the common library
//!
//! This module defines the error taxonomy shared by every store in the
//! workspace, whether it talks to PostgreSQL or keeps records in process.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_detail() {
        let err = DatabaseError::Configuration("missing host".to_string());
        assert_eq!(err.to_string(), "Database configuration error: missing host");

        let err = DatabaseError::Query(SqlxError::RowNotFound);
        assert!(err.to_string().starts_with("Database query error:"));
    }
}
