//! Account auth projections - the credential-side view of patients and admins
//!
//! Patients and admins live in separate tables but share one authentication
//! flow. `AccountRef` identifies a principal across both realms and
//! `AccountCredentials` is the projection the login state machine operates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{Cpf, Role};

/// Reference to an account in either credential realm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountRef {
    pub id: i64,
    pub role: Role,
}

impl AccountRef {
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

/// Credential-side projection of an account, mutated on every login attempt
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub id: i64,
    pub role: Role,
    pub cpf: Cpf,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub failed_login_attempts: i64,
    pub locked_until: Option<DateTime<Utc>>,
    pub active: bool,
}

impl AccountCredentials {
    #[must_use]
    pub const fn account_ref(&self) -> AccountRef {
        AccountRef::new(self.id, self.role)
    }

    /// Whether the lockout window is still open
    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

/// Purpose of a one-time second-factor code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    #[serde(rename = "2fa")]
    TwoFactor,
    Recovery,
}

impl TokenPurpose {
    /// Stable string form persisted in the `purpose` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoFactor => "2fa",
            Self::Recovery => "recovery",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-time 6-digit code, consumed exactly once
#[derive(Debug, Clone)]
pub struct SecondFactorToken {
    pub id: i64,
    pub account_id: i64,
    pub role: Role,
    pub purpose: TokenPurpose,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl SecondFactorToken {
    /// Check if the code is past its expiry
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
