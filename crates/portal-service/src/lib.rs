//! # portal-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, DoctorService, ExamService, PatientService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, ShareService,
};
