//! Domain entities

mod account;
mod admin;
mod doctor;
mod exam;
mod patient;
mod share;

pub use account::{AccountCredentials, AccountRef, SecondFactorToken, TokenPurpose};
pub use admin::Admin;
pub use doctor::Doctor;
pub use exam::{Exam, ExamStatus};
pub use patient::Patient;
pub use share::ExamShare;
