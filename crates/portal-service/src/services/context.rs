//! Service context - dependency container for services
//!
//! Holds the connection pool, repositories, JWT service, and configuration.
//! Repositories are injected as trait objects so services never depend on a
//! concrete store, and nothing here is a global singleton.

use std::sync::Arc;

use portal_common::auth::JwtService;
use portal_common::config::AppConfig;
use portal_core::traits::{
    AccountRepository, AdminRepository, DoctorRepository, ExamRepository, PatientRepository,
    RefreshTokenRepository, SecondFactorRepository, ShareRepository,
};
use portal_db::{
    SqliteAdminRepository, SqliteAuthRepository, SqliteDoctorRepository, SqliteExamRepository,
    SqlitePatientRepository, SqlitePool, SqliteShareRepository,
};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    pool: SqlitePool,

    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    second_factor_repo: Arc<dyn SecondFactorRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    patient_repo: Arc<dyn PatientRepository>,
    admin_repo: Arc<dyn AdminRepository>,
    doctor_repo: Arc<dyn DoctorRepository>,
    exam_repo: Arc<dyn ExamRepository>,
    share_repo: Arc<dyn ShareRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    config: Arc<AppConfig>,
}

impl ServiceContext {
    /// Wire a full context over a SQLite pool with the default repositories
    pub fn for_sqlite(pool: SqlitePool, config: Arc<AppConfig>) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry,
            config.jwt.refresh_token_expiry,
            config.jwt.temp_token_expiry,
        ));
        let auth = Arc::new(SqliteAuthRepository::new(pool.clone()));

        Self {
            pool: pool.clone(),
            account_repo: auth.clone(),
            second_factor_repo: auth.clone(),
            refresh_token_repo: auth,
            patient_repo: Arc::new(SqlitePatientRepository::new(pool.clone())),
            admin_repo: Arc::new(SqliteAdminRepository::new(pool.clone())),
            doctor_repo: Arc::new(SqliteDoctorRepository::new(pool.clone())),
            exam_repo: Arc::new(SqliteExamRepository::new(pool.clone())),
            share_repo: Arc::new(SqliteShareRepository::new(pool)),
            jwt_service,
            config,
        }
    }

    /// Get the SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // === Repositories ===

    /// Get the account (credential) repository
    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    /// Get the second-factor code repository
    pub fn second_factor_repo(&self) -> &dyn SecondFactorRepository {
        self.second_factor_repo.as_ref()
    }

    /// Get the refresh-token session repository
    pub fn refresh_token_repo(&self) -> &dyn RefreshTokenRepository {
        self.refresh_token_repo.as_ref()
    }

    /// Get the patient repository
    pub fn patient_repo(&self) -> &dyn PatientRepository {
        self.patient_repo.as_ref()
    }

    /// Get the admin repository
    pub fn admin_repo(&self) -> &dyn AdminRepository {
        self.admin_repo.as_ref()
    }

    /// Get the doctor repository
    pub fn doctor_repo(&self) -> &dyn DoctorRepository {
        self.doctor_repo.as_ref()
    }

    /// Get the exam repository
    pub fn exam_repo(&self) -> &dyn ExamRepository {
        self.exam_repo.as_ref()
    }

    /// Get the share link repository
    pub fn share_repo(&self) -> &dyn ShareRepository {
        self.share_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        self.config.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"SqlitePool")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom dependencies (tests swap
/// individual repositories for fakes)
pub struct ServiceContextBuilder {
    pool: Option<SqlitePool>,
    account_repo: Option<Arc<dyn AccountRepository>>,
    second_factor_repo: Option<Arc<dyn SecondFactorRepository>>,
    refresh_token_repo: Option<Arc<dyn RefreshTokenRepository>>,
    patient_repo: Option<Arc<dyn PatientRepository>>,
    admin_repo: Option<Arc<dyn AdminRepository>>,
    doctor_repo: Option<Arc<dyn DoctorRepository>>,
    exam_repo: Option<Arc<dyn ExamRepository>>,
    share_repo: Option<Arc<dyn ShareRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    config: Option<Arc<AppConfig>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            account_repo: None,
            second_factor_repo: None,
            refresh_token_repo: None,
            patient_repo: None,
            admin_repo: None,
            doctor_repo: None,
            exam_repo: None,
            share_repo: None,
            jwt_service: None,
            config: None,
        }
    }

    pub fn pool(mut self, pool: SqlitePool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn second_factor_repo(mut self, repo: Arc<dyn SecondFactorRepository>) -> Self {
        self.second_factor_repo = Some(repo);
        self
    }

    pub fn refresh_token_repo(mut self, repo: Arc<dyn RefreshTokenRepository>) -> Self {
        self.refresh_token_repo = Some(repo);
        self
    }

    pub fn patient_repo(mut self, repo: Arc<dyn PatientRepository>) -> Self {
        self.patient_repo = Some(repo);
        self
    }

    pub fn admin_repo(mut self, repo: Arc<dyn AdminRepository>) -> Self {
        self.admin_repo = Some(repo);
        self
    }

    pub fn doctor_repo(mut self, repo: Arc<dyn DoctorRepository>) -> Self {
        self.doctor_repo = Some(repo);
        self
    }

    pub fn exam_repo(mut self, repo: Arc<dyn ExamRepository>) -> Self {
        self.exam_repo = Some(repo);
        self
    }

    pub fn share_repo(mut self, repo: Arc<dyn ShareRepository>) -> Self {
        self.share_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn config(mut self, config: Arc<AppConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext {
            pool: self.pool.ok_or_else(|| ServiceError::validation("pool is required"))?,
            account_repo: self
                .account_repo
                .ok_or_else(|| ServiceError::validation("account_repo is required"))?,
            second_factor_repo: self
                .second_factor_repo
                .ok_or_else(|| ServiceError::validation("second_factor_repo is required"))?,
            refresh_token_repo: self
                .refresh_token_repo
                .ok_or_else(|| ServiceError::validation("refresh_token_repo is required"))?,
            patient_repo: self
                .patient_repo
                .ok_or_else(|| ServiceError::validation("patient_repo is required"))?,
            admin_repo: self
                .admin_repo
                .ok_or_else(|| ServiceError::validation("admin_repo is required"))?,
            doctor_repo: self
                .doctor_repo
                .ok_or_else(|| ServiceError::validation("doctor_repo is required"))?,
            exam_repo: self
                .exam_repo
                .ok_or_else(|| ServiceError::validation("exam_repo is required"))?,
            share_repo: self
                .share_repo
                .ok_or_else(|| ServiceError::validation("share_repo is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            config: self.config.ok_or_else(|| ServiceError::validation("config is required"))?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
