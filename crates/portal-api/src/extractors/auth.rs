//! Authentication extractors
//!
//! Extracts and validates JWT tokens from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use portal_core::{AccountRef, DomainError};

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated account extracted from a bearer access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// Account id and role from the token claims
    pub account: AccountRef,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        // Keeps the expired/invalid distinction from the JWT layer
        let claims = app_state
            .jwt_service()
            .validate_access_token(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::App(e)
            })?;

        let account = claims.account().map_err(|e| {
            tracing::warn!(error = %e, "Invalid subject in token");
            ApiError::App(e)
        })?;

        Ok(AuthUser { account })
    }
}

/// Authenticated account restricted to the admin role
#[derive(Debug, Clone, Copy)]
pub struct AdminUser {
    pub account: AccountRef,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser { account } = AuthUser::from_request_parts(parts, state).await?;

        if !account.role.is_admin() {
            tracing::warn!(account = %account, "Admin route rejected for non-admin account");
            return Err(DomainError::AccessDenied.into());
        }

        Ok(AdminUser { account })
    }
}
