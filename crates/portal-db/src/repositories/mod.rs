//! Repository implementations

pub mod error;

mod admin;
mod auth;
mod doctor;
mod exam;
mod patient;
mod share;

pub use admin::SqliteAdminRepository;
pub use auth::SqliteAuthRepository;
pub use doctor::SqliteDoctorRepository;
pub use exam::SqliteExamRepository;
pub use patient::SqlitePatientRepository;
pub use share::SqliteShareRepository;
