//! Doctor handlers (admin-only)

use axum::extract::{Path, Query, State};
use portal_service::dto::{CreateDoctorRequest, DoctorResponse, UpdateDoctorRequest};
use portal_service::DoctorService;
use serde::Deserialize;

use crate::extractors::{AdminUser, ValidatedJson};
use crate::response::{ApiResult, Created, Envelope};
use crate::state::AppState;

/// Doctor list query parameters
#[derive(Debug, Deserialize)]
pub struct DoctorListParams {
    /// When true, only active doctors are returned
    #[serde(default)]
    pub active: bool,
}

/// Create a doctor record
///
/// POST /api/doctors
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CreateDoctorRequest>,
) -> ApiResult<Created<Envelope<DoctorResponse>>> {
    let service = DoctorService::new(state.service_context());
    let response = service.create(request).await?;
    Ok(Created(Envelope::new("Doctor created", response)))
}

/// List doctors
///
/// GET /api/doctors
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<DoctorListParams>,
) -> ApiResult<Envelope<Vec<DoctorResponse>>> {
    let service = DoctorService::new(state.service_context());
    let response = service.list(params.active).await?;
    Ok(Envelope::new("Doctors", response))
}

/// Get one doctor by id
///
/// GET /api/doctors/:id
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<DoctorResponse>> {
    let service = DoctorService::new(state.service_context());
    let response = service.get(id).await?;
    Ok(Envelope::new("Doctor", response))
}

/// Update a doctor record
///
/// PUT /api/doctors/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateDoctorRequest>,
) -> ApiResult<Envelope<DoctorResponse>> {
    let service = DoctorService::new(state.service_context());
    let response = service.update(id, request).await?;
    Ok(Envelope::new("Doctor updated", response))
}

/// Deactivate a doctor record
///
/// DELETE /api/doctors/:id
pub async fn deactivate(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<()>> {
    let service = DoctorService::new(state.service_context());
    service.deactivate(id).await?;
    Ok(Envelope::message("Doctor deactivated"))
}
