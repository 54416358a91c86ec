//! Domain errors - error types for the domain layer

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Account not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Account locked until {until}")]
    AccountLocked { until: DateTime<Utc> },

    #[error("Invalid or expired temporary token")]
    InvalidTempToken,

    #[error("Invalid verification code")]
    InvalidTwoFactorToken,

    #[error("Verification code has expired")]
    ExpiredTwoFactorToken,

    #[error("Invalid recovery code")]
    InvalidResetToken,

    #[error("Recovery code has expired")]
    ExpiredResetToken,

    #[error("Invalid session token")]
    InvalidRefreshToken,

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Patient not found: {0}")]
    PatientNotFound(i64),

    #[error("Doctor not found: {0}")]
    DoctorNotFound(i64),

    #[error("Exam not found: {0}")]
    ExamNotFound(i64),

    #[error("Share link not found")]
    ShareNotFound,

    #[error("Share link has expired")]
    ShareExpired,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid CPF: {0}")]
    InvalidCpf(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Access denied")]
    AccessDenied,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("CPF already registered")]
    DuplicateCpf,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("CRM already registered")]
    DuplicateCrm,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Authentication
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::AccountLocked { .. } => "ACCOUNT_LOCKED",
            Self::InvalidTempToken => "INVALID_TEMP_TOKEN",
            Self::InvalidTwoFactorToken => "INVALID_2FA_TOKEN",
            Self::ExpiredTwoFactorToken => "EXPIRED_2FA_TOKEN",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::ExpiredResetToken => "EXPIRED_RESET_TOKEN",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",

            // Not Found
            Self::PatientNotFound(_) => "PATIENT_NOT_FOUND",
            Self::DoctorNotFound(_) => "DOCTOR_NOT_FOUND",
            Self::ExamNotFound(_) => "EXAM_NOT_FOUND",
            Self::ShareNotFound => "SHARE_NOT_FOUND",
            Self::ShareExpired => "SHARE_EXPIRED",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidCpf(_) => "INVALID_CPF",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Authorization
            Self::AccessDenied => "ACCESS_DENIED",

            // Conflict
            Self::DuplicateCpf => "DUPLICATE_CPF",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::DuplicateCrm => "DUPLICATE_CRM",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound
                | Self::PatientNotFound(_)
                | Self::DoctorNotFound(_)
                | Self::ExamNotFound(_)
                | Self::ShareNotFound
        )
    }

    /// Check if this is an authentication failure (401)
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidPassword
                | Self::InvalidTempToken
                | Self::InvalidTwoFactorToken
                | Self::ExpiredTwoFactorToken
                | Self::InvalidResetToken
                | Self::ExpiredResetToken
                | Self::InvalidRefreshToken
        )
    }

    /// Check if this is an active account lockout (423)
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::AccountLocked { .. })
    }

    /// Check if this is a validation error (400)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidCpf(_) | Self::WeakPassword(_)
        )
    }

    /// Check if this is an authorization error (403)
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AccessDenied)
    }

    /// Check if this is a conflict error (409)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateCpf | Self::DuplicateEmail | Self::DuplicateCrm)
    }

    /// Check if this refers to a resource that existed but lapsed (410)
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::ShareExpired)
    }
}
