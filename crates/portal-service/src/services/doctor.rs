//! Doctor service (admin-managed records; doctors do not log in)

use tracing::{info, instrument};

use portal_core::traits::NewDoctor;
use portal_core::DomainError;

use crate::dto::{CreateDoctorRequest, DoctorResponse, UpdateDoctorRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Doctor service
pub struct DoctorService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DoctorService<'a> {
    /// Create a new DoctorService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a doctor record
    #[instrument(skip(self, request), fields(crm = %request.crm))]
    pub async fn create(&self, request: CreateDoctorRequest) -> ServiceResult<DoctorResponse> {
        let doctor = self
            .ctx
            .doctor_repo()
            .create(&NewDoctor {
                name: request.name,
                crm: request.crm,
                specialty: request.specialty,
                email: request.email,
                phone: request.phone,
            })
            .await?;

        info!(doctor_id = doctor.id, "Doctor created");
        Ok(DoctorResponse::from(&doctor))
    }

    /// Get one doctor by id
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ServiceResult<DoctorResponse> {
        let doctor = self
            .ctx
            .doctor_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::DoctorNotFound(id))?;

        Ok(DoctorResponse::from(&doctor))
    }

    /// List doctors, optionally only active ones
    #[instrument(skip(self))]
    pub async fn list(&self, active_only: bool) -> ServiceResult<Vec<DoctorResponse>> {
        let doctors = self.ctx.doctor_repo().list(active_only).await?;
        Ok(doctors.iter().map(DoctorResponse::from).collect())
    }

    /// Update a doctor record
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i64, request: UpdateDoctorRequest) -> ServiceResult<DoctorResponse> {
        let mut doctor = self
            .ctx
            .doctor_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::DoctorNotFound(id))?;

        if let Some(name) = request.name {
            doctor.name = name;
        }
        if let Some(crm) = request.crm {
            doctor.crm = crm;
        }
        if let Some(specialty) = request.specialty {
            doctor.specialty = Some(specialty);
        }
        if let Some(email) = request.email {
            doctor.email = Some(email);
        }
        if let Some(phone) = request.phone {
            doctor.phone = Some(phone);
        }

        self.ctx.doctor_repo().update(&doctor).await?;
        info!(doctor_id = id, "Doctor updated");

        self.get(id).await
    }

    /// Deactivate a doctor record
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i64) -> ServiceResult<()> {
        self.ctx.doctor_repo().deactivate(id).await?;
        info!(doctor_id = id, "Doctor deactivated");
        Ok(())
    }
}
