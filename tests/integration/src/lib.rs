//! Integration test utilities for the exam portal
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API on an in-memory SQLite database.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
