//! Error handling utilities for repositories

use portal_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and map it via the constraint message
///
/// SQLite reports violations as `UNIQUE constraint failed: table.column`;
/// the closure receives that message to pick the right conflict error.
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(&str) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.message());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "patient not found" error
pub fn patient_not_found(id: i64) -> DomainError {
    DomainError::PatientNotFound(id)
}

/// Create a "doctor not found" error
pub fn doctor_not_found(id: i64) -> DomainError {
    DomainError::DoctorNotFound(id)
}

/// Create an "exam not found" error
pub fn exam_not_found(id: i64) -> DomainError {
    DomainError::ExamNotFound(id)
}
