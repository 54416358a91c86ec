//! Route definitions
//!
//! All API routes organized by domain and mounted under /api. The auth
//! routes carry the rate limiter; health checks bypass it.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use portal_common::RateLimitConfig;

use crate::handlers::{auth, doctors, exams, health, patients, shares};
use crate::middleware::rate_limit_layer;
use crate::state::AppState;

/// Create the main API router with all routes (excluding health)
pub fn create_router(rate_limit: &RateLimitConfig) -> Router<AppState> {
    Router::new().nest("/api", api_routes(rate_limit))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes(rate_limit: &RateLimitConfig) -> Router<AppState> {
    Router::new()
        .merge(auth_routes().layer(rate_limit_layer(rate_limit)))
        .merge(patient_routes())
        .merge(doctor_routes())
        .merge(exam_routes())
        .merge(share_routes())
}

/// Authentication routes; the admin variants run the same flow with the
/// admin realm
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/admin/login", post(auth::admin_login))
        .route("/auth/verify-2fa", post(auth::verify_two_factor))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/admin/forgot-password", post(auth::admin_forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/auth/admin/reset-password", post(auth::admin_reset_password))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

/// Patient routes
fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/patients", post(patients::register))
        .route("/patients", get(patients::list))
        .route("/patients/me", get(patients::profile))
        .route("/patients/:id", get(patients::get))
        .route("/patients/:id", put(patients::update))
        .route("/patients/:id", delete(patients::deactivate))
}

/// Doctor routes (admin)
fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/doctors", post(doctors::create))
        .route("/doctors", get(doctors::list))
        .route("/doctors/:id", get(doctors::get))
        .route("/doctors/:id", put(doctors::update))
        .route("/doctors/:id", delete(doctors::deactivate))
}

/// Exam routes
fn exam_routes() -> Router<AppState> {
    Router::new()
        .route("/exams", post(exams::create))
        .route("/exams", get(exams::list))
        .route("/exams/:id", get(exams::get))
        .route("/exams/:id", put(exams::update))
        .route("/exams/:id", delete(exams::delete))
        .route("/exams/:id/share", post(shares::create))
}

/// Share resolution (no auth)
fn share_routes() -> Router<AppState> {
    Router::new().route("/share/:token", get(shares::resolve))
}
