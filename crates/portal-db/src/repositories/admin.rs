//! SQLite implementation of AdminRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use portal_core::entities::Admin;
use portal_core::error::DomainError;
use portal_core::traits::{AdminRepository, NewAdmin, RepoResult};

use crate::models::AdminModel;

use super::error::{map_db_error, map_unique_violation};

/// SQLite implementation of AdminRepository
#[derive(Clone)]
pub struct SqliteAdminRepository {
    pool: SqlitePool,
}

impl SqliteAdminRepository {
    /// Create a new SqliteAdminRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    #[instrument(skip(self, admin, password_hash))]
    async fn create(&self, admin: &NewAdmin, password_hash: &str) -> RepoResult<Admin> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO admins (cpf, name, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(admin.cpf.as_str())
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, |msg| {
                if msg.contains(".cpf") {
                    DomainError::DuplicateCpf
                } else {
                    DomainError::DuplicateEmail
                }
            })
        })?;

        Ok(Admin {
            id,
            cpf: admin.cpf.clone(),
            name: admin.name.clone(),
            email: admin.email.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Admin>> {
        let result = sqlx::query_as::<_, AdminModel>(
            r"
            SELECT id, cpf, name, email, active, created_at, updated_at
            FROM admins
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AdminModel::into_entity).transpose()
    }
}
