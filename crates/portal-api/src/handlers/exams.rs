//! Exam handlers
//!
//! Reads are available to any authenticated account (patients see only
//! their own records, enforced in the service); writes are admin-only.

use axum::extract::{Path, State};
use portal_service::dto::{CreateExamRequest, ExamResponse, PaginatedResponse, UpdateExamRequest};
use portal_service::ExamService;

use crate::extractors::{AdminUser, AuthUser, ExamListQuery, ValidatedJson};
use crate::response::{ApiResult, Created, Envelope};
use crate::state::AppState;

/// Create an exam record
///
/// POST /api/exams
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CreateExamRequest>,
) -> ApiResult<Created<Envelope<ExamResponse>>> {
    let service = ExamService::new(state.service_context());
    let response = service.create(request).await?;
    Ok(Created(Envelope::new("Exam created", response)))
}

/// List exams with filters and pagination
///
/// GET /api/exams
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ExamListQuery(filter): ExamListQuery,
) -> ApiResult<Envelope<PaginatedResponse<ExamResponse>>> {
    let service = ExamService::new(state.service_context());
    let response = service.list(auth.account, filter).await?;
    Ok(Envelope::new("Exams", response))
}

/// Get one exam by id
///
/// GET /api/exams/:id
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<ExamResponse>> {
    let service = ExamService::new(state.service_context());
    let response = service.get(auth.account, id).await?;
    Ok(Envelope::new("Exam", response))
}

/// Update an exam record
///
/// PUT /api/exams/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateExamRequest>,
) -> ApiResult<Envelope<ExamResponse>> {
    let service = ExamService::new(state.service_context());
    let response = service.update(id, request).await?;
    Ok(Envelope::new("Exam updated", response))
}

/// Delete an exam record
///
/// DELETE /api/exams/:id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Envelope<()>> {
    let service = ExamService::new(state.service_context());
    service.delete(id).await?;
    Ok(Envelope::message("Exam deleted"))
}
