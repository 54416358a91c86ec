//! Custom Axum extractors
//!
//! Bearer authentication, validated JSON bodies, and list query parameters.

pub mod auth;
pub mod query;
pub mod validated;

pub use auth::{AdminUser, AuthUser};
pub use query::{ExamListQuery, PatientListQuery};
pub use validated::{OptionalValidatedJson, ValidatedJson};
