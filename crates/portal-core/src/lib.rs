//! # portal-core
//!
//! Domain layer containing entities, value objects, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AccountCredentials, AccountRef, Admin, Doctor, Exam, ExamShare, ExamStatus, Patient,
    SecondFactorToken, TokenPurpose,
};
pub use error::DomainError;
pub use traits::{
    AccountRepository, AdminRepository, DoctorRepository, ExamFilter, ExamRepository, NewAdmin,
    NewDoctor, NewExam, NewPatient, PatientFilter, PatientRepository, RefreshTokenRepository,
    RepoResult, SecondFactorRepository, ShareRepository,
};
pub use value_objects::{Cpf, CpfParseError, Role};
