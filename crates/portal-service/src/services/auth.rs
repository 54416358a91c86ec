//! Authentication service
//!
//! The single implementation of the login state machine for both patients
//! and admins: password check with progressive lockout, one-time 6-digit
//! second factor, password recovery, and refresh-token sessions. The realm
//! is a `Role` parameter; repositories dispatch on it.

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};

use portal_common::auth::{
    generate_numeric_code, hash_password, validate_password_strength, verify_password,
};
use portal_common::config::LockoutConfig;
use portal_core::entities::{AccountCredentials, AccountRef, TokenPurpose};
use portal_core::value_objects::{Cpf, Role};
use portal_core::DomainError;

use crate::dto::{
    AccountResponse, ForgotPasswordRequest, LoginRequest, RefreshTokenRequest,
    ResetPasswordRequest, SessionResponse, TwoFactorRequiredResponse, VerifyTwoFactorRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Length of one-time verification and recovery codes
const CODE_LENGTH: usize = 6;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Lockout window for a given failure count: the schedule entries map to
    /// the threshold count and each excess failure, saturating at the last
    fn lockout_window(config: &LockoutConfig, count: i64) -> Duration {
        let excess = (count - config.max_attempts).max(0) as usize;
        let idx = excess.min(config.schedule_minutes.len().saturating_sub(1));
        let minutes = config.schedule_minutes.get(idx).copied().unwrap_or(5);
        Duration::minutes(minutes)
    }

    fn parse_cpf(input: &str) -> ServiceResult<Cpf> {
        Cpf::parse(input).map_err(|e| DomainError::InvalidCpf(e.to_string()).into())
    }

    async fn find_active_credentials(
        &self,
        role: Role,
        cpf: &Cpf,
    ) -> ServiceResult<Option<AccountCredentials>> {
        let creds = self.ctx.account_repo().find_credentials(role, cpf).await?;
        Ok(creds.filter(|c| c.active))
    }

    /// Check the password and open the second-factor window
    ///
    /// On success the failure counter is cleared, a fresh 6-digit code is
    /// issued (invalidating older pending codes), and a short-lived temp
    /// token is returned. The session itself is not open yet.
    #[instrument(skip(self, request), fields(role = %role))]
    pub async fn login(
        &self,
        role: Role,
        request: LoginRequest,
    ) -> ServiceResult<TwoFactorRequiredResponse> {
        let cpf = Self::parse_cpf(&request.cpf)?;

        let creds = self
            .find_active_credentials(role, &cpf)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown or inactive account");
                ServiceError::from(DomainError::UserNotFound)
            })?;
        let account = creds.account_ref();

        let now = Utc::now();
        if let Some(until) = creds.locked_until.filter(|until| *until > now) {
            warn!(account = %account, "Login rejected: account locked");
            return Err(DomainError::AccountLocked { until }.into());
        }

        let password_ok = verify_password(&request.password, &creds.password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        if !password_ok {
            let count = self.ctx.account_repo().record_failed_attempt(account).await?;

            if count >= self.ctx.config().lockout.max_attempts {
                let window = Self::lockout_window(&self.ctx.config().lockout, count);
                let until = now + window;
                self.ctx.account_repo().set_lockout(account, until).await?;
                warn!(account = %account, attempts = count, until = %until, "Account locked");
            } else {
                warn!(account = %account, attempts = count, "Login failed: invalid password");
            }

            return Err(DomainError::InvalidPassword.into());
        }

        // Successful password check resets the lockout state before the
        // second factor is even attempted
        self.ctx.account_repo().clear_failed_attempts(account).await?;

        let code = generate_numeric_code(CODE_LENGTH);
        let expires_at = now + Duration::minutes(self.ctx.config().two_factor.code_ttl_minutes);
        self.ctx
            .second_factor_repo()
            .issue(account, TokenPurpose::TwoFactor, &code, expires_at)
            .await?;

        let temp_token = self.ctx.jwt_service().generate_temp_token(account)?;

        info!(account = %account, "Password verified, awaiting second factor");

        // The code rides along only in development; production dispatches it
        // out-of-band
        let two_factor_code = if self.ctx.config().app.env.is_development() {
            Some(code)
        } else {
            debug!(account = %account, "Second-factor code issued");
            None
        };

        Ok(TwoFactorRequiredResponse {
            requires_two_factor: true,
            temp_token,
            user: AccountResponse::from(&creds),
            two_factor_code,
        })
    }

    /// Complete login by verifying the 6-digit code and open a session
    #[instrument(skip(self, request))]
    pub async fn verify_two_factor(
        &self,
        request: VerifyTwoFactorRequest,
    ) -> ServiceResult<SessionResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_temp_token(&request.temp_token)
            .map_err(|_| ServiceError::from(DomainError::InvalidTempToken))?;
        let account = claims
            .account()
            .map_err(|_| ServiceError::from(DomainError::InvalidTempToken))?;

        let creds = self
            .ctx
            .account_repo()
            .find_credentials_by_id(account)
            .await?
            .filter(|c| c.active)
            .ok_or(DomainError::UserNotFound)?;

        let bypassed = self
            .ctx
            .config()
            .two_factor
            .dev_bypass_code
            .as_deref()
            .is_some_and(|bypass| bypass == request.token);

        if bypassed {
            debug!(account = %account, "Second factor satisfied by development bypass code");
        } else {
            let token = self
                .ctx
                .second_factor_repo()
                .find_latest_unused(account, TokenPurpose::TwoFactor, &request.token)
                .await?
                .ok_or(DomainError::InvalidTwoFactorToken)?;

            if token.is_expired(Utc::now()) {
                return Err(DomainError::ExpiredTwoFactorToken.into());
            }

            // Single use: a concurrent verification with the same code loses
            if !self.ctx.second_factor_repo().mark_used(token.id).await? {
                return Err(DomainError::InvalidTwoFactorToken.into());
            }
        }

        let session = self.open_session(&creds).await?;
        info!(account = %account, "Second factor verified, session opened");
        Ok(session)
    }

    /// Start password recovery
    ///
    /// Deliberately silent about whether the account exists: the caller gets
    /// the same success either way, and the code goes out-of-band.
    #[instrument(skip(self, request), fields(role = %role))]
    pub async fn forgot_password(
        &self,
        role: Role,
        request: ForgotPasswordRequest,
    ) -> ServiceResult<()> {
        let cpf = Self::parse_cpf(&request.cpf)?;

        if let Some(creds) = self.find_active_credentials(role, &cpf).await? {
            let account = creds.account_ref();
            let code = generate_numeric_code(CODE_LENGTH);
            let expires_at =
                Utc::now() + Duration::minutes(self.ctx.config().two_factor.recovery_ttl_minutes);

            self.ctx
                .second_factor_repo()
                .issue(account, TokenPurpose::Recovery, &code, expires_at)
                .await?;

            if self.ctx.config().app.env.is_development() {
                info!(account = %account, code = %code, "Recovery code issued");
            } else {
                debug!(account = %account, "Recovery code issued");
            }
        }

        Ok(())
    }

    /// Complete password recovery with the emailed code
    #[instrument(skip(self, request), fields(role = %role))]
    pub async fn reset_password(
        &self,
        role: Role,
        request: ResetPasswordRequest,
    ) -> ServiceResult<()> {
        let cpf = Self::parse_cpf(&request.cpf)?;
        validate_password_strength(&request.new_password)?;

        // Unknown accounts fail exactly like a wrong code
        let creds = self
            .find_active_credentials(role, &cpf)
            .await?
            .ok_or(DomainError::InvalidResetToken)?;
        let account = creds.account_ref();

        let token = self
            .ctx
            .second_factor_repo()
            .find_latest_unused(account, TokenPurpose::Recovery, &request.token)
            .await?
            .ok_or(DomainError::InvalidResetToken)?;

        if token.is_expired(Utc::now()) {
            return Err(DomainError::ExpiredResetToken.into());
        }

        let password_hash = hash_password(&request.new_password)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        // Hash update, code consumption, session revocation, and lockout
        // clearing happen in one transaction
        self.ctx
            .account_repo()
            .reset_password(account, token.id, &password_hash)
            .await?;

        info!(account = %account, "Password reset completed");
        Ok(())
    }

    /// Rotate a refresh token into a new session
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<SessionResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)
            .map_err(|_| ServiceError::from(DomainError::InvalidRefreshToken))?;
        let jti = claims.jti.as_deref().ok_or(DomainError::InvalidRefreshToken)?;
        let claimed_account = claims
            .account()
            .map_err(|_| ServiceError::from(DomainError::InvalidRefreshToken))?;

        let account = self
            .ctx
            .refresh_token_repo()
            .find_active(jti)
            .await?
            .filter(|stored| *stored == claimed_account)
            .ok_or(DomainError::InvalidRefreshToken)?;

        let creds = self
            .ctx
            .account_repo()
            .find_credentials_by_id(account)
            .await?
            .filter(|c| c.active)
            .ok_or(DomainError::UserNotFound)?;

        // Rotation: the presented token dies with this exchange
        self.ctx.refresh_token_repo().revoke(jti).await?;
        let session = self.open_session(&creds).await?;

        info!(account = %account, "Session refreshed");
        Ok(session)
    }

    /// Close sessions: the presented refresh token, or all of them
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(
        &self,
        account: AccountRef,
        refresh_token: Option<String>,
    ) -> ServiceResult<()> {
        match refresh_token {
            Some(token) => {
                let claims = self
                    .ctx
                    .jwt_service()
                    .validate_refresh_token(&token)
                    .map_err(|_| ServiceError::from(DomainError::InvalidRefreshToken))?;

                // Only the owner can revoke a session
                let owner = claims
                    .account()
                    .map_err(|_| ServiceError::from(DomainError::InvalidRefreshToken))?;
                if owner != account {
                    return Err(DomainError::AccessDenied.into());
                }

                if let Some(jti) = claims.jti.as_deref() {
                    self.ctx.refresh_token_repo().revoke(jti).await?;
                }
            }
            None => {
                let revoked = self.ctx.refresh_token_repo().revoke_all(account).await?;
                debug!(account = %account, revoked, "All sessions revoked");
            }
        }

        info!(account = %account, "Logged out");
        Ok(())
    }

    /// Load the account summary for a validated bearer token
    #[instrument(skip(self))]
    pub async fn current_account(&self, account: AccountRef) -> ServiceResult<AccountResponse> {
        let creds = self
            .ctx
            .account_repo()
            .find_credentials_by_id(account)
            .await?
            .filter(|c| c.active)
            .ok_or(DomainError::UserNotFound)?;

        Ok(AccountResponse::from(&creds))
    }

    async fn open_session(&self, creds: &AccountCredentials) -> ServiceResult<SessionResponse> {
        let account = creds.account_ref();
        let pair = self.ctx.jwt_service().generate_session(account)?;

        let expires_at =
            Utc::now() + Duration::seconds(self.ctx.jwt_service().refresh_token_expiry());
        self.ctx
            .refresh_token_repo()
            .store(account, &pair.refresh_jti, expires_at)
            .await?;

        Ok(SessionResponse {
            token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            user: AccountResponse::from(creds),
        })
    }
}
