//! # portal-db
//!
//! Database layer implementing repository traits with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides SQLite implementations for all repository traits
//! defined in `portal-core`. It handles:
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Model ↔ Entity conversions
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portal_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use portal_db::repositories::SqliteAuthRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new("sqlite://portal.db", 5);
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let auth_repo = SqliteAuthRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_memory_pool, create_pool, run_migrations, DatabaseConfig, SqlitePool};
pub use repositories::{
    SqliteAdminRepository, SqliteAuthRepository, SqliteDoctorRepository, SqliteExamRepository,
    SqlitePatientRepository, SqliteShareRepository,
};
