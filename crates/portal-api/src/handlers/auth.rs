//! Authentication handlers
//!
//! The same two-step flow serves patients and admins; the admin routes
//! only differ in the role passed to the service.

use axum::{extract::State, Json};
use portal_core::Role;
use portal_service::dto::{
    AccountResponse, ForgotPasswordRequest, LoginRequest, LogoutRequest, RefreshTokenRequest,
    ResetPasswordRequest, SessionResponse, TwoFactorRequiredResponse, VerifyTwoFactorRequest,
};
use portal_service::AuthService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Envelope};
use crate::state::AppState;

/// The recovery flow is silent about whether the account exists, so both
/// outcomes share this exact message
const RECOVERY_MESSAGE: &str =
    "If the CPF is registered, a recovery code has been sent to the account email";

/// Patient login (password check, opens the 2FA window)
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Envelope<TwoFactorRequiredResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(Role::Patient, request).await?;
    Ok(Envelope::new("Verification code sent", response))
}

/// Admin login
///
/// POST /api/auth/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Envelope<TwoFactorRequiredResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(Role::Admin, request).await?;
    Ok(Envelope::new("Verification code sent", response))
}

/// Complete login with the 6-digit code
///
/// POST /api/auth/verify-2fa
pub async fn verify_two_factor(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyTwoFactorRequest>,
) -> ApiResult<Envelope<SessionResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.verify_two_factor(request).await?;
    Ok(Envelope::new("Login successful", response))
}

/// Start patient password recovery
///
/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Envelope<()>> {
    let service = AuthService::new(state.service_context());
    service.forgot_password(Role::Patient, request).await?;
    Ok(Envelope::message(RECOVERY_MESSAGE))
}

/// Start admin password recovery
///
/// POST /api/auth/admin/forgot-password
pub async fn admin_forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Envelope<()>> {
    let service = AuthService::new(state.service_context());
    service.forgot_password(Role::Admin, request).await?;
    Ok(Envelope::message(RECOVERY_MESSAGE))
}

/// Complete patient password recovery
///
/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Envelope<()>> {
    let service = AuthService::new(state.service_context());
    service.reset_password(Role::Patient, request).await?;
    Ok(Envelope::message("Password reset successfully"))
}

/// Complete admin password recovery
///
/// POST /api/auth/admin/reset-password
pub async fn admin_reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Envelope<()>> {
    let service = AuthService::new(state.service_context());
    service.reset_password(Role::Admin, request).await?;
    Ok(Envelope::message("Password reset successfully"))
}

/// Rotate a refresh token into a new session
///
/// POST /api/auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Envelope<SessionResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh_tokens(request).await?;
    Ok(Envelope::new("Session refreshed", response))
}

/// Logout: revoke one session or all of them
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<LogoutRequest>>,
) -> ApiResult<Envelope<()>> {
    let service = AuthService::new(state.service_context());
    let refresh_token = body.and_then(|b| b.0.refresh_token);
    service.logout(auth.account, refresh_token).await?;
    Ok(Envelope::message("Logged out"))
}

/// Account summary for the presented access token
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Envelope<AccountResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.current_account(auth.account).await?;
    Ok(Envelope::new("Authenticated", response))
}
