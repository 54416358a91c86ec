//! Patient service
//!
//! Registration is public; listing and administration are admin-only at the
//! route layer, and the self-profile lookup is patient-scoped.

use tracing::{info, instrument};

use portal_common::auth::{hash_password, validate_password_strength};
use portal_core::entities::AccountRef;
use portal_core::traits::{NewPatient, PatientFilter};
use portal_core::value_objects::{Cpf, Role};
use portal_core::DomainError;

use crate::dto::{
    PaginatedResponse, PatientResponse, RegisterPatientRequest, UpdatePatientRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Patient service
pub struct PatientService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PatientService<'a> {
    /// Create a new PatientService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new patient account
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterPatientRequest) -> ServiceResult<PatientResponse> {
        let cpf = Cpf::parse(&request.cpf)
            .map_err(|e| ServiceError::from(DomainError::InvalidCpf(e.to_string())))?;
        validate_password_strength(&request.password)?;

        let password_hash = hash_password(&request.password)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        let patient = self
            .ctx
            .patient_repo()
            .create(
                &NewPatient {
                    cpf,
                    name: request.name,
                    email: request.email,
                    phone: request.phone,
                    birth_date: request.birth_date,
                },
                &password_hash,
            )
            .await?;

        info!(patient_id = patient.id, "Patient registered");
        Ok(PatientResponse::from(&patient))
    }

    /// Get the calling patient's own profile
    #[instrument(skip(self))]
    pub async fn profile(&self, account: AccountRef) -> ServiceResult<PatientResponse> {
        if account.role != Role::Patient {
            return Err(DomainError::AccessDenied.into());
        }

        let patient = self
            .ctx
            .patient_repo()
            .find_by_id(account.id)
            .await?
            .ok_or(DomainError::PatientNotFound(account.id))?;

        Ok(PatientResponse::from(&patient))
    }

    /// Get one patient by id (admin)
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ServiceResult<PatientResponse> {
        let patient = self
            .ctx
            .patient_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PatientNotFound(id))?;

        Ok(PatientResponse::from(&patient))
    }

    /// List patients with filters and offset pagination (admin)
    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        filter: PatientFilter,
    ) -> ServiceResult<PaginatedResponse<PatientResponse>> {
        let total = self.ctx.patient_repo().count(&filter).await?;
        let patients = self.ctx.patient_repo().list(&filter).await?;

        let data = patients.iter().map(PatientResponse::from).collect();
        Ok(PaginatedResponse::new(data, total, filter.limit, filter.offset))
    }

    /// Update a patient's profile fields (admin)
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i64,
        request: UpdatePatientRequest,
    ) -> ServiceResult<PatientResponse> {
        let mut patient = self
            .ctx
            .patient_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PatientNotFound(id))?;

        if let Some(name) = request.name {
            patient.name = name;
        }
        if let Some(email) = request.email {
            patient.email = email;
        }
        if let Some(phone) = request.phone {
            patient.phone = Some(phone);
        }
        if let Some(birth_date) = request.birth_date {
            patient.birth_date = Some(birth_date);
        }

        self.ctx.patient_repo().update(&patient).await?;
        info!(patient_id = id, "Patient updated");

        self.get(id).await
    }

    /// Deactivate a patient account (admin); blocks future logins
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i64) -> ServiceResult<()> {
        self.ctx.patient_repo().deactivate(id).await?;
        info!(patient_id = id, "Patient deactivated");
        Ok(())
    }
}
