//! # portal-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    generate_numeric_code, generate_share_token, hash_password, validate_password_strength,
    verify_password, Claims, JwtService, TokenPair, TokenType,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    LockoutConfig, RateLimitConfig, ServerConfig, TwoFactorConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
