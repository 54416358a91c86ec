//! Share link service
//!
//! Time-limited anonymous read access to a single exam. Patients can only
//! share their own exams; the resulting token works without authentication
//! until it expires.

use chrono::{Duration, Utc};
use tracing::{info, instrument};

use portal_common::auth::generate_share_token;
use portal_core::entities::AccountRef;
use portal_core::value_objects::Role;
use portal_core::DomainError;

use crate::dto::{ExamResponse, ShareExamRequest, ShareResponse, SharedExamResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Opaque share token length
const SHARE_TOKEN_LENGTH: usize = 32;

/// Default link lifetime in hours
const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Share link service
pub struct ShareService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ShareService<'a> {
    /// Create a new ShareService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a share link for an exam
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        account: AccountRef,
        exam_id: i64,
        request: ShareExamRequest,
    ) -> ServiceResult<ShareResponse> {
        let exam = self
            .ctx
            .exam_repo()
            .find_by_id(exam_id)
            .await?
            .ok_or(DomainError::ExamNotFound(exam_id))?;

        if account.role == Role::Patient && exam.patient_id != account.id {
            return Err(DomainError::AccessDenied.into());
        }

        let hours = request.expires_in_hours.unwrap_or(DEFAULT_EXPIRY_HOURS);
        let token = generate_share_token(SHARE_TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::hours(hours);

        let share = self.ctx.share_repo().create(exam.id, &token, expires_at).await?;

        info!(exam_id, expires_at = %expires_at, "Share link created");
        Ok(ShareResponse::from(&share))
    }

    /// Resolve a share token into a read-only exam view (no auth)
    #[instrument(skip(self, token))]
    pub async fn resolve(&self, token: &str) -> ServiceResult<SharedExamResponse> {
        let share = self
            .ctx
            .share_repo()
            .find_by_token(token)
            .await?
            .ok_or(DomainError::ShareNotFound)?;

        if share.is_expired(Utc::now()) {
            return Err(DomainError::ShareExpired.into());
        }

        let exam = self
            .ctx
            .exam_repo()
            .find_by_id(share.exam_id)
            .await?
            .ok_or(DomainError::ShareNotFound)?;

        Ok(SharedExamResponse {
            exam: ExamResponse::from(&exam),
            expires_at: share.expires_at,
        })
    }

    /// Purge expired share links, returning how many were removed
    #[instrument(skip(self))]
    pub async fn purge_expired(&self) -> ServiceResult<u64> {
        let removed = self.ctx.share_repo().delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Expired share links purged");
        }
        Ok(removed)
    }
}
