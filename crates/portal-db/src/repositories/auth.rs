//! SQLite implementation of the authentication repositories
//!
//! One repository backs all three credential-side traits. Patients and
//! admins live in separate tables; `AccountRef.role` picks the table and
//! every statement binds values with `?` placeholders.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use portal_core::entities::{AccountCredentials, AccountRef, SecondFactorToken, TokenPurpose};
use portal_core::error::DomainError;
use portal_core::traits::{
    AccountRepository, RefreshTokenRepository, RepoResult, SecondFactorRepository,
};
use portal_core::value_objects::{Cpf, Role};

use crate::models::{CredentialModel, SecondFactorModel};

use super::error::map_db_error;

/// Table holding the credentials for a realm. Only ever one of two static
/// strings, so interpolating it into SQL is safe.
const fn credential_table(role: Role) -> &'static str {
    match role {
        Role::Patient => "patients",
        Role::Admin => "admins",
    }
}

/// SQLite implementation of the account, second-factor, and refresh-token
/// repositories
#[derive(Clone)]
pub struct SqliteAuthRepository {
    pool: SqlitePool,
}

impl SqliteAuthRepository {
    /// Create a new SqliteAuthRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqliteAuthRepository {
    #[instrument(skip(self))]
    async fn find_credentials(
        &self,
        role: Role,
        cpf: &Cpf,
    ) -> RepoResult<Option<AccountCredentials>> {
        let sql = format!(
            r"
            SELECT id, cpf, name, email, password_hash, failed_login_attempts,
                   locked_until, active
            FROM {}
            WHERE cpf = ?
            ",
            credential_table(role),
        );

        let result = sqlx::query_as::<_, CredentialModel>(&sql)
            .bind(cpf.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(|m| m.into_credentials(role)).transpose()
    }

    #[instrument(skip(self))]
    async fn find_credentials_by_id(
        &self,
        account: AccountRef,
    ) -> RepoResult<Option<AccountCredentials>> {
        let sql = format!(
            r"
            SELECT id, cpf, name, email, password_hash, failed_login_attempts,
                   locked_until, active
            FROM {}
            WHERE id = ?
            ",
            credential_table(account.role),
        );

        let result = sqlx::query_as::<_, CredentialModel>(&sql)
            .bind(account.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(|m| m.into_credentials(account.role)).transpose()
    }

    #[instrument(skip(self))]
    async fn record_failed_attempt(&self, account: AccountRef) -> RepoResult<i64> {
        // Increment-and-return in one statement so concurrent failures
        // cannot observe the same counter value
        let sql = format!(
            r"
            UPDATE {}
            SET failed_login_attempts = failed_login_attempts + 1, updated_at = ?
            WHERE id = ?
            RETURNING failed_login_attempts
            ",
            credential_table(account.role),
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(Utc::now())
            .bind(account.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or(DomainError::UserNotFound)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn set_lockout(&self, account: AccountRef, until: DateTime<Utc>) -> RepoResult<()> {
        let sql = format!(
            r"
            UPDATE {}
            SET locked_until = ?, updated_at = ?
            WHERE id = ?
            ",
            credential_table(account.role),
        );

        let result = sqlx::query(&sql)
            .bind(until)
            .bind(Utc::now())
            .bind(account.id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_failed_attempts(&self, account: AccountRef) -> RepoResult<()> {
        let sql = format!(
            r"
            UPDATE {}
            SET failed_login_attempts = 0, locked_until = NULL, updated_at = ?
            WHERE id = ?
            ",
            credential_table(account.role),
        );

        sqlx::query(&sql)
            .bind(Utc::now())
            .bind(account.id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    async fn reset_password(
        &self,
        account: AccountRef,
        token_id: i64,
        password_hash: &str,
    ) -> RepoResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let sql = format!(
            r"
            UPDATE {}
            SET password_hash = ?, failed_login_attempts = 0, locked_until = NULL,
                updated_at = ?
            WHERE id = ?
            ",
            credential_table(account.role),
        );

        let result = sqlx::query(&sql)
            .bind(password_hash)
            .bind(now)
            .bind(account.id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound);
        }

        // Consume the recovery code; a concurrent reset with the same code
        // loses here and rolls back
        let consumed = sqlx::query(
            r"
            UPDATE second_factor_tokens SET used = 1 WHERE id = ? AND used = 0
            ",
        )
        .bind(token_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if consumed.rows_affected() == 0 {
            return Err(DomainError::InvalidResetToken);
        }

        // Every open session dies with the old password
        sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked_at = ?
            WHERE account_id = ? AND role = ? AND revoked_at IS NULL
            ",
        )
        .bind(now)
        .bind(account.id)
        .bind(account.role.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl SecondFactorRepository for SqliteAuthRepository {
    #[instrument(skip(self, code))]
    async fn issue(
        &self,
        account: AccountRef,
        purpose: TokenPurpose,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<SecondFactorToken> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Older pending codes of the same purpose stop working the moment
        // a fresh one is issued
        sqlx::query(
            r"
            UPDATE second_factor_tokens
            SET used = 1
            WHERE account_id = ? AND role = ? AND purpose = ? AND used = 0
            ",
        )
        .bind(account.id)
        .bind(account.role.as_str())
        .bind(purpose.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO second_factor_tokens
                (account_id, role, purpose, code, expires_at, used, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            RETURNING id
            ",
        )
        .bind(account.id)
        .bind(account.role.as_str())
        .bind(purpose.as_str())
        .bind(code)
        .bind(expires_at)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(SecondFactorToken {
            id,
            account_id: account.id,
            role: account.role,
            purpose,
            code: code.to_string(),
            expires_at,
            used: false,
            created_at: now,
        })
    }

    #[instrument(skip(self, code))]
    async fn find_latest_unused(
        &self,
        account: AccountRef,
        purpose: TokenPurpose,
        code: &str,
    ) -> RepoResult<Option<SecondFactorToken>> {
        let result = sqlx::query_as::<_, SecondFactorModel>(
            r"
            SELECT id, account_id, role, purpose, code, expires_at, used, created_at
            FROM second_factor_tokens
            WHERE account_id = ? AND role = ? AND purpose = ? AND code = ? AND used = 0
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            ",
        )
        .bind(account.id)
        .bind(account.role.as_str())
        .bind(purpose.as_str())
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(SecondFactorModel::into_entity).transpose()
    }

    #[instrument(skip(self))]
    async fn mark_used(&self, token_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE second_factor_tokens SET used = 1 WHERE id = ? AND used = 0
            ",
        )
        .bind(token_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RefreshTokenRepository for SqliteAuthRepository {
    #[instrument(skip(self))]
    async fn store(
        &self,
        account: AccountRef,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (jti, account_id, role, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(jti)
        .bind(account.id)
        .bind(account.role.as_str())
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_active(&self, jti: &str) -> RepoResult<Option<AccountRef>> {
        let result = sqlx::query_as::<_, crate::models::RefreshTokenModel>(
            r"
            SELECT id, jti, account_id, role, expires_at, created_at, revoked_at
            FROM refresh_tokens
            WHERE jti = ? AND revoked_at IS NULL AND expires_at > ?
            ",
        )
        .bind(jti)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(|m| m.account_ref()).transpose()
    }

    #[instrument(skip(self))]
    async fn revoke(&self, jti: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE refresh_tokens SET revoked_at = ? WHERE jti = ? AND revoked_at IS NULL
            ",
        )
        .bind(Utc::now())
        .bind(jti)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn revoke_all(&self, account: AccountRef) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens
            SET revoked_at = ?
            WHERE account_id = ? AND role = ? AND revoked_at IS NULL
            ",
        )
        .bind(Utc::now())
        .bind(account.id)
        .bind(account.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
