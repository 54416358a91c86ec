//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs

pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    CreateDoctorRequest, CreateExamRequest, ForgotPasswordRequest, LoginRequest, LogoutRequest,
    RefreshTokenRequest, RegisterPatientRequest, ResetPasswordRequest, ShareExamRequest,
    UpdateDoctorRequest, UpdateExamRequest, UpdatePatientRequest, VerifyTwoFactorRequest,
};

// Re-export commonly used response types
pub use responses::{
    AccountResponse, DoctorResponse, ExamResponse, PaginatedResponse, PaginationMeta,
    PatientResponse, SessionResponse, ShareResponse, SharedExamResponse,
    TwoFactorRequiredResponse,
};
