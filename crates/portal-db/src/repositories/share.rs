//! SQLite implementation of ShareRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use portal_core::entities::ExamShare;
use portal_core::traits::{RepoResult, ShareRepository};

use crate::models::ExamShareModel;

use super::error::map_db_error;

/// SQLite implementation of ShareRepository
#[derive(Clone)]
pub struct SqliteShareRepository {
    pool: SqlitePool,
}

impl SqliteShareRepository {
    /// Create a new SqliteShareRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareRepository for SqliteShareRepository {
    #[instrument(skip(self, token))]
    async fn create(
        &self,
        exam_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<ExamShare> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO exam_shares (exam_id, token, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(exam_id)
        .bind(token)
        .bind(expires_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ExamShare {
            id,
            exam_id,
            token: token.to_string(),
            expires_at,
            created_at: now,
        })
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<ExamShare>> {
        let result = sqlx::query_as::<_, ExamShareModel>(
            r"
            SELECT id, exam_id, token, expires_at, created_at
            FROM exam_shares
            WHERE token = ?
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ExamShare::from))
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM exam_shares WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
