//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod doctors;
pub mod exams;
pub mod health;
pub mod patients;
pub mod shares;
