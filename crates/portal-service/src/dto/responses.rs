//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Field names are
//! camelCase to match the original portal API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use portal_core::entities::{AccountCredentials, Doctor, Exam, ExamShare, Patient};
use portal_core::value_objects::Role;

// ============================================================================
// Common Response Types
// ============================================================================

/// Paginated response with offset-based pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta { total, limit, offset },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Account summary embedded in auth responses
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&AccountCredentials> for AccountResponse {
    fn from(creds: &AccountCredentials) -> Self {
        Self {
            id: creds.id,
            cpf: creds.cpf.formatted(),
            name: creds.name.clone(),
            email: creds.email.clone(),
            role: creds.role,
        }
    }
}

/// Response to a successful password check; the session is not open yet
#[derive(Debug, Serialize)]
pub struct TwoFactorRequiredResponse {
    #[serde(rename = "requires2FA")]
    pub requires_two_factor: bool,

    #[serde(rename = "tempToken")]
    pub temp_token: String,

    pub user: AccountResponse,

    /// Verification code, present only in development builds
    #[serde(rename = "twoFactorCode", skip_serializing_if = "Option::is_none")]
    pub two_factor_code: Option<String>,
}

/// Full session response after second-factor verification
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,

    #[serde(rename = "refreshToken")]
    pub refresh_token: String,

    #[serde(rename = "expiresIn")]
    pub expires_in: i64,

    pub user: AccountResponse,
}

// ============================================================================
// Patient Responses
// ============================================================================

/// Patient profile response
#[derive(Debug, Clone, Serialize)]
pub struct PatientResponse {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,
    pub active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Patient> for PatientResponse {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id,
            cpf: p.cpf.formatted(),
            name: p.name.clone(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            birth_date: p.birth_date,
            active: p.active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ============================================================================
// Doctor Responses
// ============================================================================

/// Doctor record response
#[derive(Debug, Clone, Serialize)]
pub struct DoctorResponse {
    pub id: i64,
    pub name: String,
    pub crm: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
}

impl From<&Doctor> for DoctorResponse {
    fn from(d: &Doctor) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            crm: d.crm.clone(),
            specialty: d.specialty.clone(),
            email: d.email.clone(),
            phone: d.phone.clone(),
            active: d.active,
        }
    }
}

// ============================================================================
// Exam Responses
// ============================================================================

/// Exam record response
#[derive(Debug, Clone, Serialize)]
pub struct ExamResponse {
    pub id: i64,
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    #[serde(rename = "doctorId")]
    pub doctor_id: Option<i64>,
    #[serde(rename = "examType")]
    pub exam_type: String,
    #[serde(rename = "examDate")]
    pub exam_date: NaiveDate,
    pub status: String,
    pub result: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Exam> for ExamResponse {
    fn from(e: &Exam) -> Self {
        Self {
            id: e.id,
            patient_id: e.patient_id,
            doctor_id: e.doctor_id,
            exam_type: e.exam_type.clone(),
            exam_date: e.exam_date,
            status: e.status.as_str().to_string(),
            result: e.result.clone(),
            notes: e.notes.clone(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

// ============================================================================
// Share Responses
// ============================================================================

/// Response after creating a share link
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub token: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl From<&ExamShare> for ShareResponse {
    fn from(s: &ExamShare) -> Self {
        Self {
            token: s.token.clone(),
            expires_at: s.expires_at,
        }
    }
}

/// Read-only exam view returned for an unexpired share token
#[derive(Debug, Serialize)]
pub struct SharedExamResponse {
    pub exam: ExamResponse,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}
