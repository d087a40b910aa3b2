//! Mapping from `sqlx::Error` to store errors.

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{StoreError, UniqueConstraint};

const UNIQUE_VIOLATION: &str = "23505";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Classifies a sqlx error for the payment unit of work.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    match db_err.constraint().and_then(UniqueConstraint::from_name) {
                        Some(constraint) => StoreError::ConstraintViolation(constraint),
                        // Primary key collisions get fresh ids on retry
                        None => StoreError::Conflict(err.to_string()),
                    }
                }
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
                    StoreError::Conflict(err.to_string())
                }
                _ => StoreError::unavailable(err.to_string()),
            }
        }
        sqlx::Error::RowNotFound
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => StoreError::corrupt(err.to_string()),
        _ => StoreError::unavailable(err.to_string()),
    }
}

/// Classifies a sqlx error for read paths and repositories.
pub(crate) fn database_error(context: &str, err: sqlx::Error) -> DomainError {
    match store_error(err) {
        StoreError::Unavailable(msg) => DomainError::new(
            ErrorCode::StoreUnavailable,
            format!("{}: {}", context, msg),
        ),
        other => DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, other)),
    }
}

/// Error for a stored value that no longer parses.
pub(crate) fn invalid_column(column: &str, value: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeouts_are_unavailable() {
        assert!(matches!(
            store_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn missing_rows_are_corrupt() {
        assert!(matches!(
            store_error(sqlx::Error::RowNotFound),
            StoreError::Corrupt(_)
        ));
    }

    #[test]
    fn read_path_keeps_unavailable_code() {
        let err = database_error("Failed to load subscription", sqlx::Error::PoolClosed);
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
        assert!(err.message.starts_with("Failed to load subscription"));
    }
}
