//! Database models with SQLx `FromRow` derives
//!
//! Models mirror table rows; `into_entity` conversions re-validate the
//! stored string forms (CPF, role, status) and surface corrupt rows as
//! database errors.

mod account;
mod doctor;
mod exam;
mod patient;
mod share;

pub use account::{CredentialModel, RefreshTokenModel, SecondFactorModel};
pub use doctor::DoctorModel;
pub use exam::ExamModel;
pub use patient::{AdminModel, PatientModel};
pub use share::ExamShareModel;

use portal_core::error::DomainError;

/// Corrupt stored value (should be impossible for rows written by this crate)
pub(crate) fn corrupt(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::DatabaseError(format!("Corrupt {column} column: {err}"))
}
