//! Test helpers for integration tests
//!
//! Spawns the full Axum application on a loopback port over an in-memory
//! SQLite database, and provides request and seeding utilities.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use portal_api::{create_app, create_app_state, AppState};
use portal_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, JwtConfig, LockoutConfig,
    RateLimitConfig, ServerConfig, TwoFactorConfig,
};
use portal_core::entities::{AccountRef, TokenPurpose};
use portal_core::traits::NewAdmin;
use portal_core::value_objects::{Cpf, Role};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Development bypass code baked into the test configuration
pub const BYPASS_CODE: &str = "123456";

/// Counter for unique test ports
static PORT_COUNTER: AtomicU16 = AtomicU16::new(19000);

/// Get a unique port for testing
pub fn get_test_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server over a fresh in-memory database
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let port = get_test_port();
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let state = create_app_state(config).await?;
        let app = create_app(state.clone());

        let listener = TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(50)).await;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr: actual_addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await?)
    }

    /// Make a POST request with auth token and no body
    pub async fn post_auth_empty(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?)
    }

    /// Make a PUT request with auth token
    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .put(&url)
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?)
    }

    /// Seed an admin account directly; there is no admin registration route
    pub async fn seed_admin(&self, cpf: &str, password: &str) -> Result<i64> {
        let hash = portal_common::hash_password(password)?;
        let admin = self
            .state
            .service_context()
            .admin_repo()
            .create(
                &NewAdmin {
                    cpf: Cpf::parse(cpf)?,
                    name: "Test Admin".to_string(),
                    email: format!("admin{}@example.com", crate::fixtures::unique_suffix()),
                },
                &hash,
            )
            .await?;
        Ok(admin.id)
    }

    /// Read the newest issued one-time code for a purpose ('2fa' or 'recovery')
    ///
    /// Recovery codes never appear in response bodies, so tests pull them
    /// straight from storage like the out-of-band channel would.
    pub async fn latest_code(&self, purpose: &str) -> Result<String> {
        let code: String = sqlx::query_scalar(
            "SELECT code FROM second_factor_tokens WHERE purpose = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(purpose)
        .fetch_one(self.state.service_context().pool())
        .await?;
        Ok(code)
    }

    /// Issue a one-time code directly, allowing an already-expired expiry
    ///
    /// Goes through the repository so the usual newer-invalidates-older
    /// behavior applies.
    pub async fn seed_code(
        &self,
        account_id: i64,
        role: Role,
        purpose: TokenPurpose,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.state
            .service_context()
            .second_factor_repo()
            .issue(AccountRef::new(account_id, role), purpose, code, expires_at)
            .await?;
        Ok(())
    }

    /// Insert a share row directly, allowing an already-expired expiry
    pub async fn seed_share(
        &self,
        exam_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.state
            .service_context()
            .share_repo()
            .create(exam_id, token, expires_at)
            .await?;
        Ok(())
    }
}

/// Create the test configuration: development environment, in-memory SQLite
///
/// The pool is capped at one connection because every in-memory SQLite
/// connection is a separate database.
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "portal-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret-key-0123456789".to_string(),
            access_token_expiry: 86400,
            refresh_token_expiry: 604_800,
            temp_token_expiry: 600,
        },
        lockout: LockoutConfig {
            max_attempts: 5,
            schedule_minutes: vec![5, 15, 30, 60, 120],
        },
        two_factor: TwoFactorConfig {
            code_ttl_minutes: 5,
            recovery_ttl_minutes: 15,
            dev_bypass_code: Some(BYPASS_CODE.to_string()),
        },
        rate_limit: RateLimitConfig {
            // High enough that the suite never trips the limiter
            requests_per_second: 1000,
            burst: 1000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
