//! JWT utilities for authentication
//!
//! Provides token encoding, decoding, and validation using the `jsonwebtoken`
//! crate. Three token types exist: `Access` for API calls, `Refresh` for
//! session renewal (carries a `jti` matched against a database row), and
//! `TwoFactor` for the short window between password check and code entry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use portal_core::{AccountRef, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    /// Temporary token issued after password check, valid only for 2FA completion
    TwoFactor,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Account role (patient or admin)
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type
    pub token_type: TokenType,
    /// Token ID; present on refresh tokens, matched against session rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Get the account reference from the claims
    ///
    /// # Errors
    /// Returns an error if the subject cannot be parsed as an ID
    pub fn account(&self) -> Result<AccountRef, AppError> {
        self.sub
            .parse::<i64>()
            .map(|id| AccountRef::new(id, self.role))
            .map_err(|_| AppError::InvalidToken)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Token pair containing access and refresh tokens
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// `jti` claim of the refresh token, to be stored as a session row
    pub refresh_jti: String,
    pub expires_in: i64,
}

/// JWT service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    temp_token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry times (seconds)
    #[must_use]
    pub fn new(
        secret: &str,
        access_token_expiry: i64,
        refresh_token_expiry: i64,
        temp_token_expiry: i64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
            temp_token_expiry,
        }
    }

    /// Generate an access + refresh token pair for a verified account
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn generate_session(&self, account: AccountRef) -> Result<TokenPair, AppError> {
        let access_token = self.encode_token(account, TokenType::Access, None)?;
        let refresh_jti = Uuid::new_v4().to_string();
        let refresh_token =
            self.encode_token(account, TokenType::Refresh, Some(refresh_jti.clone()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_jti,
            expires_in: self.access_token_expiry,
        })
    }

    /// Generate a temporary token for the 2FA step; grants no API access
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn generate_temp_token(&self, account: AccountRef) -> Result<String, AppError> {
        self.encode_token(account, TokenType::TwoFactor, None)
    }

    /// Refresh token lifetime in seconds
    #[must_use]
    pub fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }

    /// Encode a JWT token
    fn encode_token(
        &self,
        account: AccountRef,
        token_type: TokenType,
        jti: Option<String>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expiry = match token_type {
            TokenType::Access => self.access_token_expiry,
            TokenType::Refresh => self.refresh_token_expiry,
            TokenType::TwoFactor => self.temp_token_expiry,
        };

        let claims = Claims {
            sub: account.id.to_string(),
            role: account.role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            token_type,
            jti,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate an access token and return the claims
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_typed(token, TokenType::Access)
    }

    /// Validate a refresh token and return the claims
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_typed(token, TokenType::Refresh)
    }

    /// Validate a temporary 2FA token and return the claims
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not a 2FA token
    pub fn validate_temp_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_typed(token, TokenType::TwoFactor)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if claims.token_type != expected {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("temp_token_expiry", &self.temp_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 86400, 604800, 600)
    }

    fn test_account() -> AccountRef {
        AccountRef::new(42, Role::Patient)
    }

    #[test]
    fn test_generate_session() {
        let service = create_test_service();

        let pair = service.generate_session(test_account()).unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert!(!pair.refresh_jti.is_empty());
        assert_eq!(pair.expires_in, 86400);
    }

    #[test]
    fn test_access_token_claims() {
        let service = create_test_service();

        let pair = service.generate_session(test_account()).unwrap();
        let claims = service.validate_access_token(&pair.access_token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::Patient);
        assert_eq!(claims.account().unwrap(), test_account());
        assert!(claims.jti.is_none());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_carries_jti() {
        let service = create_test_service();

        let pair = service.generate_session(test_account()).unwrap();
        let claims = service.validate_refresh_token(&pair.refresh_token).unwrap();

        assert_eq!(claims.jti.as_deref(), Some(pair.refresh_jti.as_str()));
    }

    #[test]
    fn test_token_type_is_enforced() {
        let service = create_test_service();
        let pair = service.generate_session(test_account()).unwrap();

        // A refresh token must not pass access validation, and vice versa
        assert!(service.validate_access_token(&pair.refresh_token).is_err());
        assert!(service.validate_refresh_token(&pair.access_token).is_err());

        // A temp token is neither
        let temp = service.generate_temp_token(test_account()).unwrap();
        assert!(service.validate_access_token(&temp).is_err());
        assert!(service.validate_temp_token(&temp).is_ok());
    }

    #[test]
    fn test_temp_token_role_preserved() {
        let service = create_test_service();
        let admin = AccountRef::new(7, Role::Admin);

        let temp = service.generate_temp_token(admin).unwrap();
        let claims = service.validate_temp_token(&temp).unwrap();

        assert_eq!(claims.account().unwrap(), admin);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();

        let result = service.decode_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Zero expiry with default 60s leeway would still pass; use a negative
        // expiry to push `exp` firmly into the past
        let service = JwtService::new("test-secret-key-that-is-long-enough", -120, -120, -120);
        let temp = service.generate_temp_token(test_account()).unwrap();

        assert!(matches!(
            service.validate_temp_token(&temp),
            Err(AppError::TokenExpired)
        ));
    }
}
