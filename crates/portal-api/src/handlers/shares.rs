//! Share link handlers
//!
//! Creating a link requires authentication; resolving one does not.

use axum::extract::{Path, State};
use portal_service::dto::{ShareExamRequest, ShareResponse, SharedExamResponse};
use portal_service::ShareService;

use crate::extractors::{AuthUser, OptionalValidatedJson};
use crate::response::{ApiResult, Created, Envelope};
use crate::state::AppState;

/// Create a time-limited share link for an exam
///
/// POST /api/exams/:id/share
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(exam_id): Path<i64>,
    OptionalValidatedJson(request): OptionalValidatedJson<ShareExamRequest>,
) -> ApiResult<Created<Envelope<ShareResponse>>> {
    let service = ShareService::new(state.service_context());
    let response = service
        .create(auth.account, exam_id, request.unwrap_or_default())
        .await?;
    Ok(Created(Envelope::new("Share link created", response)))
}

/// Resolve a share token into a read-only exam view
///
/// GET /api/share/:token
pub async fn resolve(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Envelope<SharedExamResponse>> {
    let service = ShareService::new(state.service_context());
    let response = service.resolve(&token).await?;
    Ok(Envelope::new("Shared exam", response))
}
