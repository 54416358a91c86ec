//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod auth;
pub mod context;
pub mod doctor;
pub mod error;
pub mod exam;
pub mod patient;
pub mod share;

// Re-export all services for convenience
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use doctor::DoctorService;
pub use error::{ServiceError, ServiceResult};
pub use exam::ExamService;
pub use patient::PatientService;
pub use share::ShareService;
