//! Repository trait definitions
//!
//! The persistence layer implements these against SQLite; services depend
//! only on the traits so auth logic stays identical for patients and admins.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    AccountCredentials, AccountRef, Admin, Doctor, Exam, ExamShare, ExamStatus, Patient,
    SecondFactorToken, TokenPurpose,
};
use crate::error::DomainError;
use crate::value_objects::{Cpf, Role};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Credential-side account operations, shared by both realms
///
/// `record_failed_attempt` must be atomic (increment-and-return in one
/// statement) so concurrent failed logins cannot read the same counter value.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find login credentials by CPF within one realm
    async fn find_credentials(&self, role: Role, cpf: &Cpf)
        -> RepoResult<Option<AccountCredentials>>;

    /// Find login credentials by account reference
    async fn find_credentials_by_id(
        &self,
        account: AccountRef,
    ) -> RepoResult<Option<AccountCredentials>>;

    /// Atomically increment the failed-attempt counter, returning the new count
    async fn record_failed_attempt(&self, account: AccountRef) -> RepoResult<i64>;

    /// Set the lockout expiry for an account
    async fn set_lockout(&self, account: AccountRef, until: DateTime<Utc>) -> RepoResult<()>;

    /// Reset the failed-attempt counter and clear any lockout
    async fn clear_failed_attempts(&self, account: AccountRef) -> RepoResult<()>;

    /// Complete a password reset as one transaction: update the hash, mark
    /// the recovery code used, revoke all refresh tokens, clear lockout state
    async fn reset_password(
        &self,
        account: AccountRef,
        token_id: i64,
        password_hash: &str,
    ) -> RepoResult<()>;
}

/// One-time second-factor code storage
#[async_trait]
pub trait SecondFactorRepository: Send + Sync {
    /// Persist a fresh code, invalidating any older unused codes of the same
    /// purpose for the account in the same transaction
    async fn issue(
        &self,
        account: AccountRef,
        purpose: TokenPurpose,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<SecondFactorToken>;

    /// Find the newest unused code of the given purpose matching `code`
    async fn find_latest_unused(
        &self,
        account: AccountRef,
        purpose: TokenPurpose,
        code: &str,
    ) -> RepoResult<Option<SecondFactorToken>>;

    /// Mark a code used; returns false if it was already consumed
    async fn mark_used(&self, token_id: i64) -> RepoResult<bool>;
}

/// Refresh-token session rows, keyed by the JWT `jti` claim
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Store a new session row
    async fn store(
        &self,
        account: AccountRef,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Look up an unrevoked, unexpired session by `jti`
    async fn find_active(&self, jti: &str) -> RepoResult<Option<AccountRef>>;

    /// Revoke one session; no-op if unknown
    async fn revoke(&self, jti: &str) -> RepoResult<()>;

    /// Revoke every session of an account, returning how many were active
    async fn revoke_all(&self, account: AccountRef) -> RepoResult<u64>;
}

/// New patient registration data
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub cpf: Cpf,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Listing filter for patients (admin views)
#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    /// Substring match on name
    pub name: Option<String>,
    pub cpf: Option<Cpf>,
    pub active: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

/// Patient profile storage
#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create(&self, patient: &NewPatient, password_hash: &str) -> RepoResult<Patient>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Patient>>;

    async fn find_by_cpf(&self, cpf: &Cpf) -> RepoResult<Option<Patient>>;

    async fn list(&self, filter: &PatientFilter) -> RepoResult<Vec<Patient>>;

    async fn count(&self, filter: &PatientFilter) -> RepoResult<i64>;

    /// Update mutable profile fields (name, email, phone, birth date)
    async fn update(&self, patient: &Patient) -> RepoResult<()>;

    /// Deactivate the account; deactivated patients cannot log in
    async fn deactivate(&self, id: i64) -> RepoResult<()>;
}

/// New admin data (seeding and back-office provisioning)
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub cpf: Cpf,
    pub name: String,
    pub email: String,
}

/// Admin profile storage
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, admin: &NewAdmin, password_hash: &str) -> RepoResult<Admin>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Admin>>;
}

/// New doctor record
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub name: String,
    pub crm: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Doctor record storage
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn create(&self, doctor: &NewDoctor) -> RepoResult<Doctor>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Doctor>>;

    async fn list(&self, active_only: bool) -> RepoResult<Vec<Doctor>>;

    async fn update(&self, doctor: &Doctor) -> RepoResult<()>;

    async fn deactivate(&self, id: i64) -> RepoResult<()>;
}

/// New exam record
#[derive(Debug, Clone)]
pub struct NewExam {
    pub patient_id: i64,
    pub doctor_id: Option<i64>,
    pub exam_type: String,
    pub exam_date: NaiveDate,
    pub status: ExamStatus,
    pub result: Option<String>,
    pub notes: Option<String>,
}

/// Listing filter for exams; every field becomes a bound parameter
#[derive(Debug, Clone, Default)]
pub struct ExamFilter {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub status: Option<ExamStatus>,
    /// Substring match on exam type
    pub exam_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: i64,
    pub offset: i64,
}

/// Exam record storage
#[async_trait]
pub trait ExamRepository: Send + Sync {
    async fn create(&self, exam: &NewExam) -> RepoResult<Exam>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Exam>>;

    async fn list(&self, filter: &ExamFilter) -> RepoResult<Vec<Exam>>;

    async fn count(&self, filter: &ExamFilter) -> RepoResult<i64>;

    async fn update(&self, exam: &Exam) -> RepoResult<()>;

    async fn delete(&self, id: i64) -> RepoResult<()>;
}

/// Share link storage
#[async_trait]
pub trait ShareRepository: Send + Sync {
    async fn create(
        &self,
        exam_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<ExamShare>;

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<ExamShare>>;

    /// Remove expired links, returning how many were deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}
