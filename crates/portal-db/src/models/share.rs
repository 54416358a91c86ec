//! Exam share link database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use portal_core::entities::ExamShare;

/// Database model for exam_shares table
#[derive(Debug, Clone, FromRow)]
pub struct ExamShareModel {
    pub id: i64,
    pub exam_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<ExamShareModel> for ExamShare {
    fn from(m: ExamShareModel) -> Self {
        Self {
            id: m.id,
            exam_id: m.exam_id,
            token: m.token,
            expires_at: m.expires_at,
            created_at: m.created_at,
        }
    }
}
