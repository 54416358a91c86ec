//! Test fixtures and data generators
//!
//! Provides reusable wire-format request/response types and generators
//! for unique, check-digit-valid CPFs.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

fn cpf_check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=start_weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    let rem = (sum * 10) % 11;
    if rem == 10 {
        0
    } else {
        rem
    }
}

/// Generate a unique, valid CPF (correct check digits)
pub fn unique_cpf() -> String {
    let base = 100_000_000 + unique_suffix();
    let mut digits: Vec<u32> = format!("{base:09}")
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    let d1 = cpf_check_digit(&digits, 10);
    digits.push(d1);
    let d2 = cpf_check_digit(&digits, 11);
    digits.push(d2);

    digits.iter().map(ToString::to_string).collect()
}

// ============================================================================
// Requests (wire format)
// ============================================================================

/// Patient registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPatient {
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub senha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl RegisterPatient {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            cpf: unique_cpf(),
            name: format!("Test Patient {suffix}"),
            email: format!("patient{suffix}@example.com"),
            senha: "Password123".to_string(),
            phone: None,
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct Login {
    pub cpf: String,
    pub senha: String,
}

impl Login {
    pub fn new(cpf: &str, senha: &str) -> Self {
        Self {
            cpf: cpf.to_string(),
            senha: senha.to_string(),
        }
    }

    pub fn from_register(reg: &RegisterPatient) -> Self {
        Self::new(&reg.cpf, &reg.senha)
    }
}

/// Second-factor verification request
#[derive(Debug, Serialize)]
pub struct Verify2fa {
    #[serde(rename = "tempToken")]
    pub temp_token: String,
    pub token: String,
}

/// Password recovery request
#[derive(Debug, Serialize)]
pub struct ForgotPassword {
    pub cpf: String,
}

/// Password reset request
#[derive(Debug, Serialize)]
pub struct ResetPassword {
    pub cpf: String,
    pub token: String,
    #[serde(rename = "novaSenha")]
    pub new_password: String,
}

/// Token refresh request
#[derive(Debug, Serialize)]
pub struct Refresh {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Logout request
#[derive(Debug, Serialize)]
pub struct Logout {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Create doctor request
#[derive(Debug, Serialize)]
pub struct CreateDoctor {
    pub name: String,
    pub crm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

impl CreateDoctor {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("Dr. Test {suffix}"),
            crm: format!("CRM{suffix:06}"),
            specialty: Some("Radiology".to_string()),
        }
    }
}

/// Create exam request
#[derive(Debug, Serialize)]
pub struct CreateExam {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    #[serde(rename = "doctorId", skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(rename = "examType")]
    pub exam_type: String,
    #[serde(rename = "examDate")]
    pub exam_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CreateExam {
    pub fn for_patient(patient_id: i64) -> Self {
        Self {
            patient_id,
            doctor_id: None,
            exam_type: "Blood panel".to_string(),
            exam_date: "2026-08-01".to_string(),
            status: None,
        }
    }
}

/// Create share link request
#[derive(Debug, Serialize)]
pub struct ShareExam {
    #[serde(rename = "expiresInHours")]
    pub expires_in_hours: i64,
}

// ============================================================================
// Responses (wire format)
// ============================================================================

/// Success envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the data payload, panicking with context if absent
    pub fn into_data(self) -> T {
        self.data.expect("envelope carried no data")
    }
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub code: String,
    pub details: Option<serde_json::Value>,
}

/// Account summary in auth responses
#[derive(Debug, Deserialize)]
pub struct AccountData {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Login step-one response
#[derive(Debug, Deserialize)]
pub struct TwoFactorData {
    #[serde(rename = "requires2FA")]
    pub requires_2fa: bool,
    #[serde(rename = "tempToken")]
    pub temp_token: String,
    pub user: AccountData,
    #[serde(rename = "twoFactorCode")]
    pub two_factor_code: Option<String>,
}

/// Session response after 2FA or refresh
#[derive(Debug, Deserialize)]
pub struct SessionData {
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
    pub user: AccountData,
}

/// Patient profile response
#[derive(Debug, Deserialize)]
pub struct PatientData {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub active: bool,
}

/// Doctor record response
#[derive(Debug, Deserialize)]
pub struct DoctorData {
    pub id: i64,
    pub name: String,
    pub crm: String,
}

/// Exam record response
#[derive(Debug, Deserialize)]
pub struct ExamData {
    pub id: i64,
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    #[serde(rename = "examType")]
    pub exam_type: String,
    pub status: String,
}

/// Paginated list response
#[derive(Debug, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationData,
}

/// Pagination metadata
#[derive(Debug, Deserialize)]
pub struct PaginationData {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Share link response
#[derive(Debug, Deserialize)]
pub struct ShareData {
    pub token: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
}

/// Shared exam view
#[derive(Debug, Deserialize)]
pub struct SharedExamData {
    pub exam: ExamData,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_cpf_is_valid() {
        // Spot-check against a known-good CPF's algorithm
        let digits: Vec<u32> = "529982247".chars().filter_map(|c| c.to_digit(10)).collect();
        let d1 = cpf_check_digit(&digits, 10);
        assert_eq!(d1, 2);
        let mut with_d1 = digits;
        with_d1.push(d1);
        assert_eq!(cpf_check_digit(&with_d1, 11), 5);

        let cpf = unique_cpf();
        assert_eq!(cpf.len(), 11);
        assert_ne!(unique_cpf(), cpf);
    }
}
