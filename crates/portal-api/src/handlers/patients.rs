//! Patient handlers
//!
//! Registration is public; the profile route is for the logged-in patient;
//! everything else is admin-only.

use axum::extract::{Path, State};
use portal_service::dto::{PaginatedResponse, PatientResponse, RegisterPatientRequest, UpdatePatientRequest};
use portal_service::PatientService;

use crate::extractors::{AdminUser, AuthUser, PatientListQuery, ValidatedJson};
use crate::response::{ApiResult, Created, Envelope};
use crate::state::AppState;

/// Register a new patient account
///
/// POST /api/patients
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterPatientRequest>,
) -> ApiResult<Created<Envelope<PatientResponse>>> {
    let service = PatientService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Envelope::new("Patient registered", response)))
}

/// Profile of the logged-in patient
///
/// GET /api/patients/me
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Envelope<PatientResponse>> {
    let service = PatientService::new(state.service_context());
    let response = service.profile(auth.account).await?;
    Ok(Envelope::new("Profile", response))
}

/// List patients with filters and pagination
///
/// GET /api/patients
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    PatientListQuery(filter): PatientListQuery,
) -> ApiResult<Envelope<PaginatedResponse<PatientResponse>>> {
    let service = PatientService::new(state.service_context());
    let response = service.list(filter).await?;
    Ok(Envelope::new("Patients", response))
}

/// Get one patient by id
///
/// GET /api/patients/:id
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<PatientResponse>> {
    let service = PatientService::new(state.service_context());
    let response = service.get(id).await?;
    Ok(Envelope::new("Patient", response))
}

/// Update a patient's profile fields
///
/// PUT /api/patients/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdatePatientRequest>,
) -> ApiResult<Envelope<PatientResponse>> {
    let service = PatientService::new(state.service_context());
    let response = service.update(id, request).await?;
    Ok(Envelope::new("Patient updated", response))
}

/// Deactivate a patient account
///
/// DELETE /api/patients/:id
pub async fn deactivate(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<()>> {
    let service = PatientService::new(state.service_context());
    service.deactivate(id).await?;
    Ok(Envelope::message("Patient deactivated"))
}
