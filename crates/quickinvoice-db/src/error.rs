//! # Store Error Types
//!
//! The persistence half of the error taxonomy. Whatever sqlx reports is
//! folded into [`StoreError`] at this boundary, so callers reason about
//! store outcomes, not driver internals.
//!
//! Two deliberate non-errors:
//! - a missing id: `get_by_id` returns `Ok(None)`
//! - an invalid invoice: validation is data, produced in core, and never
//!   travels through `Result`
//!
//! A failed transaction means nothing was written; callers surface the
//! failed action (save, delete, list) to the user and must not assume
//! partial success.

use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. For finalization this is
    /// the invoice-number backstop firing.
    #[error("duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Invoice-number reservation kept colliding.
    ///
    /// Each collision is retried internally with a fresh sequence; this
    /// surfaces only once the bounded retry budget is exhausted.
    #[error("invoice number generation failed after {attempts} attempts")]
    NumberCollision { attempts: u32 },

    /// The store could not be opened: missing directory, bad
    /// permissions, full disk, or a closed pool.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// A schema migration did not apply.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// A statement failed to execute.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Commit failed; the caller must assume nothing was written.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Every pooled connection was busy past the acquire timeout.
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Anything the driver reports that has no better category.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl StoreError {
    /// True when a write bounced off the unique invoice-number index or
    /// a concurrent writer held the database lock; both are retryable
    /// collisions for the number generator, not terminal failures.
    pub fn is_retryable_collision(&self) -> bool {
        match self {
            StoreError::UniqueViolation { field, .. } => field.contains("invoice_number"),
            StoreError::QueryFailed(msg) => msg.contains("database is locked"),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    // SQLite spells it "UNIQUE constraint failed:
                    // <table>.<column>"; keep the column path for
                    // collision classification.
                    let field = db_err
                        .message()
                        .rsplit("UNIQUE constraint failed: ")
                        .next()
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else {
                    StoreError::QueryFailed(db_err.message().to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_collision_classification() {
        let number_clash = StoreError::UniqueViolation {
            field: "invoices.invoice_number".to_string(),
            value: "unknown".to_string(),
        };
        assert!(number_clash.is_retryable_collision());

        let other_clash = StoreError::UniqueViolation {
            field: "invoices.id".to_string(),
            value: "unknown".to_string(),
        };
        assert!(!other_clash.is_retryable_collision());

        let locked = StoreError::QueryFailed("database is locked".to_string());
        assert!(locked.is_retryable_collision());

        let boom = StoreError::Internal("boom".to_string());
        assert!(!boom.is_retryable_collision());
    }
}
