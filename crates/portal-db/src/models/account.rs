//! Credential-side models shared by the patients and admins tables

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use portal_core::entities::{AccountCredentials, AccountRef, SecondFactorToken, TokenPurpose};
use portal_core::error::DomainError;
use portal_core::value_objects::{Cpf, Role};

use super::corrupt;

/// Credential projection row, read from either credential table
#[derive(Debug, Clone, FromRow)]
pub struct CredentialModel {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub failed_login_attempts: i64,
    pub locked_until: Option<DateTime<Utc>>,
    pub active: bool,
}

impl CredentialModel {
    /// Convert into the domain projection, tagging the row with its realm
    pub fn into_credentials(self, role: Role) -> Result<AccountCredentials, DomainError> {
        let cpf = Cpf::parse(&self.cpf).map_err(|e| corrupt("cpf", e))?;
        Ok(AccountCredentials {
            id: self.id,
            role,
            cpf,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            failed_login_attempts: self.failed_login_attempts,
            locked_until: self.locked_until,
            active: self.active,
        })
    }
}

/// Database model for second_factor_tokens table
#[derive(Debug, Clone, FromRow)]
pub struct SecondFactorModel {
    pub id: i64,
    pub account_id: i64,
    pub role: String,
    pub purpose: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl SecondFactorModel {
    pub fn into_entity(self) -> Result<SecondFactorToken, DomainError> {
        let role: Role = self.role.parse().map_err(|e| corrupt("role", e))?;
        let purpose = match self.purpose.as_str() {
            "2fa" => TokenPurpose::TwoFactor,
            "recovery" => TokenPurpose::Recovery,
            other => return Err(corrupt("purpose", other)),
        };
        Ok(SecondFactorToken {
            id: self.id,
            account_id: self.account_id,
            role,
            purpose,
            code: self.code,
            expires_at: self.expires_at,
            used: self.used,
            created_at: self.created_at,
        })
    }
}

/// Database model for refresh_tokens table
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenModel {
    pub id: i64,
    pub jti: String,
    pub account_id: i64,
    pub role: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenModel {
    /// Check if token is valid (not revoked and not expired)
    #[inline]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }

    pub fn account_ref(&self) -> Result<AccountRef, DomainError> {
        let role: Role = self.role.parse().map_err(|e| corrupt("role", e))?;
        Ok(AccountRef::new(self.account_id, role))
    }
}
