//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and, where they carry free-form
//! input, `Validate`. Wire field names follow the original portal API
//! (`senha`, `novaSenha`, `tempToken`, `refreshToken`).

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Login request (step one of the two-factor flow)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 11, max = 14, message = "CPF must have 11 digits"))]
    pub cpf: String,

    #[serde(rename = "senha")]
    pub password: String,
}

/// Second-factor verification request (step two)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyTwoFactorRequest {
    #[serde(rename = "tempToken")]
    pub temp_token: String,

    #[validate(length(equal = 6, message = "Verification code must have 6 digits"))]
    pub token: String,
}

/// Password recovery request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 11, max = 14, message = "CPF must have 11 digits"))]
    pub cpf: String,
}

/// Password reset request, completing a recovery
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 11, max = 14, message = "CPF must have 11 digits"))]
    pub cpf: String,

    #[validate(length(equal = 6, message = "Recovery code must have 6 digits"))]
    pub token: String,

    #[serde(rename = "novaSenha")]
    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub new_password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Logout request (optional refresh token to revoke)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

// ============================================================================
// Patient Requests
// ============================================================================

/// Patient self-registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterPatientRequest {
    #[validate(length(min = 11, max = 14, message = "CPF must have 11 digits"))]
    pub cpf: String,

    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(rename = "senha")]
    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,
}

/// Patient profile update request (admin)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePatientRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,
}

// ============================================================================
// Doctor Requests
// ============================================================================

/// Create doctor request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDoctorRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(length(min = 4, max = 20, message = "CRM must be 4-20 characters"))]
    pub crm: String,

    #[validate(length(max = 100, message = "Specialty must be at most 100 characters"))]
    pub specialty: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}

/// Update doctor request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDoctorRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 4, max = 20, message = "CRM must be 4-20 characters"))]
    pub crm: Option<String>,

    #[validate(length(max = 100, message = "Specialty must be at most 100 characters"))]
    pub specialty: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}

// ============================================================================
// Exam Requests
// ============================================================================

/// Create exam request (admin)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[serde(rename = "patientId")]
    pub patient_id: i64,

    #[serde(rename = "doctorId")]
    pub doctor_id: Option<i64>,

    #[serde(rename = "examType")]
    #[validate(length(min = 2, max = 100, message = "Exam type must be 2-100 characters"))]
    pub exam_type: String,

    #[serde(rename = "examDate")]
    pub exam_date: NaiveDate,

    /// pending | in_progress | completed; defaults to pending
    pub status: Option<String>,

    #[validate(length(max = 5000, message = "Result must be at most 5000 characters"))]
    pub result: Option<String>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Update exam request (admin)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateExamRequest {
    #[serde(rename = "doctorId")]
    pub doctor_id: Option<i64>,

    #[serde(rename = "examType")]
    #[validate(length(min = 2, max = 100, message = "Exam type must be 2-100 characters"))]
    pub exam_type: Option<String>,

    #[serde(rename = "examDate")]
    pub exam_date: Option<NaiveDate>,

    pub status: Option<String>,

    #[validate(length(max = 5000, message = "Result must be at most 5000 characters"))]
    pub result: Option<String>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Share Requests
// ============================================================================

/// Create share link request
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct ShareExamRequest {
    /// Link lifetime in hours; defaults to 24, capped at 168 (one week)
    #[serde(rename = "expiresInHours")]
    #[validate(range(min = 1, max = 168, message = "Expiry must be 1-168 hours"))]
    pub expires_in_hours: Option<i64>,
}
