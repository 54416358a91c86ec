//! API integration tests
//!
//! Each test spawns the full Axum application over its own in-memory
//! SQLite database, so tests are independent and need no external services.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chrono::{Duration, Utc};
use integration_tests::{assert_json, assert_status, fixtures::*, TestServer, BYPASS_CODE};
use portal_core::entities::TokenPurpose;
use portal_core::value_objects::Role;
use reqwest::StatusCode;

/// Register a patient and return the created profile
async fn register(server: &TestServer, reg: &RegisterPatient) -> PatientData {
    let response = server.post("/api/patients", reg).await.unwrap();
    let envelope: Envelope<PatientData> =
        assert_json(response, StatusCode::CREATED).await.unwrap();
    envelope.into_data()
}

/// Run the full two-step login and return the opened session
async fn login_session(server: &TestServer, cpf: &str, senha: &str) -> SessionData {
    let response = server
        .post("/api/auth/login", &Login::new(cpf, senha))
        .await
        .unwrap();
    let envelope: Envelope<TwoFactorData> = assert_json(response, StatusCode::OK).await.unwrap();
    let step_one = envelope.into_data();
    assert!(step_one.requires_2fa);

    let code = step_one
        .two_factor_code
        .expect("development mode returns the code in the payload");
    let response = server
        .post(
            "/api/auth/verify-2fa",
            &Verify2fa {
                temp_token: step_one.temp_token,
                token: code,
            },
        )
        .await
        .unwrap();
    let envelope: Envelope<SessionData> = assert_json(response, StatusCode::OK).await.unwrap();
    envelope.into_data()
}

/// Seed an admin account and open an admin session via the admin realm
async fn admin_session(server: &TestServer) -> SessionData {
    let cpf = unique_cpf();
    server.seed_admin(&cpf, "AdminPass123").await.unwrap();

    let response = server
        .post("/api/auth/admin/login", &Login::new(&cpf, "AdminPass123"))
        .await
        .unwrap();
    let envelope: Envelope<TwoFactorData> = assert_json(response, StatusCode::OK).await.unwrap();
    let step_one = envelope.into_data();

    let response = server
        .post(
            "/api/auth/verify-2fa",
            &Verify2fa {
                temp_token: step_one.temp_token,
                token: BYPASS_CODE.to_string(),
            },
        )
        .await
        .unwrap();
    let envelope: Envelope<SessionData> = assert_json(response, StatusCode::OK).await.unwrap();
    envelope.into_data()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_patient() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();

    let patient = register(&server, &request).await;
    assert_eq!(patient.email, request.email);
    assert!(patient.active);
    // CPF is echoed back formatted
    assert!(patient.cpf.contains('.'));
}

#[tokio::test]
async fn test_register_duplicate_cpf_and_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;

    // Same CPF, different email
    let mut dup_cpf = request.clone();
    dup_cpf.email = format!("other{}@example.com", unique_suffix());
    let response = server.post("/api/patients", &dup_cpf).await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.code, "DUPLICATE_CPF");

    // Same email, different CPF
    let mut dup_email = request.clone();
    dup_email.cpf = unique_cpf();
    let response = server.post("/api/patients", &dup_email).await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.code, "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_register_validation_details() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterPatient::unique();
    request.email = "not-an-email".to_string();

    let response = server.post("/api/patients", &request).await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!err.success);
    assert_eq!(err.code, "VALIDATION_ERROR");
    let details = err.details.expect("validation errors carry details");
    assert!(!details.as_array().unwrap().is_empty());
}

// ============================================================================
// Login flow
// ============================================================================

#[tokio::test]
async fn test_full_login_flow() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;

    let session = login_session(&server, &request.cpf, &request.senha).await;
    assert!(!session.token.is_empty());
    assert!(!session.refresh_token.is_empty());
    assert_eq!(session.user.role, "patient");

    // The access token opens authenticated routes
    let response = server.get_auth("/api/auth/me", &session.token).await.unwrap();
    let envelope: Envelope<AccountData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(envelope.into_data().email, request.email);

    let response = server
        .get_auth("/api/patients/me", &session.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_login_unknown_cpf() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/api/auth/login", &Login::new(&unique_cpf(), "Password123"))
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(err.code, "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_login_malformed_cpf() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post("/api/auth/login", &Login::new("11111111111", "Password123"))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_login_wrong_realm() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;

    // A patient CPF does not exist in the admin realm
    let response = server
        .post("/api/auth/admin/login", &Login::from_register(&request))
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(err.code, "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_progressive_lockout() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;

    // Five mismatches: all INVALID_PASSWORD, the fifth opens the lock window
    for _ in 0..5 {
        let response = server
            .post("/api/auth/login", &Login::new(&request.cpf, "WrongPass999"))
            .await
            .unwrap();
        let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
            .await
            .unwrap();
        assert_eq!(err.code, "INVALID_PASSWORD");
    }

    // Even the correct password is rejected while locked
    let response = server
        .post("/api/auth/login", &Login::from_register(&request))
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::LOCKED).await.unwrap();
    assert_eq!(err.code, "ACCOUNT_LOCKED");
}

// ============================================================================
// Second factor
// ============================================================================

#[tokio::test]
async fn test_verify_wrong_code() {
    // Bypass disabled so only the stored code counts
    let mut config = integration_tests::test_config();
    config.two_factor.dev_bypass_code = None;
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    let request = RegisterPatient::unique();
    register(&server, &request).await;

    let response = server
        .post("/api/auth/login", &Login::from_register(&request))
        .await
        .unwrap();
    let envelope: Envelope<TwoFactorData> = assert_json(response, StatusCode::OK).await.unwrap();
    let step_one = envelope.into_data();

    let real_code = step_one.two_factor_code.clone().unwrap();
    let wrong_code = if real_code == "000000" { "000001" } else { "000000" };

    let response = server
        .post(
            "/api/auth/verify-2fa",
            &Verify2fa {
                temp_token: step_one.temp_token,
                token: wrong_code.to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(err.code, "INVALID_2FA_TOKEN");
}

#[tokio::test]
async fn test_verify_code_is_single_use() {
    let mut config = integration_tests::test_config();
    config.two_factor.dev_bypass_code = None;
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    let request = RegisterPatient::unique();
    register(&server, &request).await;

    let response = server
        .post("/api/auth/login", &Login::from_register(&request))
        .await
        .unwrap();
    let envelope: Envelope<TwoFactorData> = assert_json(response, StatusCode::OK).await.unwrap();
    let step_one = envelope.into_data();
    let code = step_one.two_factor_code.clone().unwrap();

    // First use succeeds
    let response = server
        .post(
            "/api/auth/verify-2fa",
            &Verify2fa {
                temp_token: step_one.temp_token.clone(),
                token: code.clone(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Replay with the same code fails
    let response = server
        .post(
            "/api/auth/verify-2fa",
            &Verify2fa {
                temp_token: step_one.temp_token,
                token: code,
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(err.code, "INVALID_2FA_TOKEN");
}

#[tokio::test]
async fn test_verify_expired_code() {
    let mut config = integration_tests::test_config();
    config.two_factor.dev_bypass_code = None;
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    let request = RegisterPatient::unique();
    let patient = register(&server, &request).await;

    let response = server
        .post("/api/auth/login", &Login::from_register(&request))
        .await
        .unwrap();
    let envelope: Envelope<TwoFactorData> = assert_json(response, StatusCode::OK).await.unwrap();
    let step_one = envelope.into_data();

    // Replace the pending code with one that expired a minute ago
    server
        .seed_code(
            patient.id,
            Role::Patient,
            TokenPurpose::TwoFactor,
            "424242",
            Utc::now() - Duration::minutes(1),
        )
        .await
        .unwrap();

    let response = server
        .post(
            "/api/auth/verify-2fa",
            &Verify2fa {
                temp_token: step_one.temp_token,
                token: "424242".to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(err.code, "EXPIRED_2FA_TOKEN");
}

#[tokio::test]
async fn test_verify_rejects_access_token_as_temp() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;
    let session = login_session(&server, &request.cpf, &request.senha).await;

    // An access token is not a two-factor temp token
    let response = server
        .post(
            "/api/auth/verify-2fa",
            &Verify2fa {
                temp_token: session.token,
                token: BYPASS_CODE.to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(err.code, "INVALID_TEMP_TOKEN");
}

// ============================================================================
// Password recovery
// ============================================================================

#[tokio::test]
async fn test_forgot_password_no_enumeration() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;

    let known = server
        .post("/api/auth/forgot-password", &ForgotPassword { cpf: request.cpf })
        .await
        .unwrap();
    let known_body: serde_json::Value = assert_json(known, StatusCode::OK).await.unwrap();

    let unknown = server
        .post("/api/auth/forgot-password", &ForgotPassword { cpf: unique_cpf() })
        .await
        .unwrap();
    let unknown_body: serde_json::Value = assert_json(unknown, StatusCode::OK).await.unwrap();

    // Byte-for-byte identical bodies, registered or not
    assert_eq!(known_body, unknown_body);
}

#[tokio::test]
async fn test_reset_password_revokes_sessions() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;
    let session = login_session(&server, &request.cpf, &request.senha).await;

    let response = server
        .post(
            "/api/auth/forgot-password",
            &ForgotPassword {
                cpf: request.cpf.clone(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // The recovery code goes out-of-band; pull it from storage
    let code = server.latest_code("recovery").await.unwrap();

    let response = server
        .post(
            "/api/auth/reset-password",
            &ResetPassword {
                cpf: request.cpf.clone(),
                token: code,
                new_password: "FreshPass456".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // The old refresh token died with the reset
    let response = server
        .post(
            "/api/auth/refresh",
            &Refresh {
                refresh_token: session.refresh_token,
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(err.code, "INVALID_REFRESH_TOKEN");

    // Old password no longer works, new one does
    let response = server
        .post("/api/auth/login", &Login::from_register(&request))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    login_session(&server, &request.cpf, "FreshPass456").await;
}

#[tokio::test]
async fn test_reset_password_wrong_code() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;

    let response = server
        .post(
            "/api/auth/reset-password",
            &ResetPassword {
                cpf: request.cpf,
                token: "999999".to_string(),
                new_password: "FreshPass456".to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(err.code, "INVALID_RESET_TOKEN");
}

#[tokio::test]
async fn test_reset_password_expired_code() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    let patient = register(&server, &request).await;

    // A recovery code past its expiry always fails, even when otherwise valid
    server
        .seed_code(
            patient.id,
            Role::Patient,
            TokenPurpose::Recovery,
            "424242",
            Utc::now() - Duration::minutes(1),
        )
        .await
        .unwrap();

    let response = server
        .post(
            "/api/auth/reset-password",
            &ResetPassword {
                cpf: request.cpf.clone(),
                token: "424242".to_string(),
                new_password: "FreshPass456".to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(err.code, "EXPIRED_RESET_TOKEN");

    // The old password still works
    login_session(&server, &request.cpf, &request.senha).await;
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_refresh_rotation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;
    let session = login_session(&server, &request.cpf, &request.senha).await;

    let response = server
        .post(
            "/api/auth/refresh",
            &Refresh {
                refresh_token: session.refresh_token.clone(),
            },
        )
        .await
        .unwrap();
    let envelope: Envelope<SessionData> = assert_json(response, StatusCode::OK).await.unwrap();
    let renewed = envelope.into_data();
    assert!(!renewed.refresh_token.is_empty());
    assert_ne!(renewed.refresh_token, session.refresh_token);

    // The rotated-out token is dead
    let response = server
        .post(
            "/api/auth/refresh",
            &Refresh {
                refresh_token: session.refresh_token,
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(err.code, "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn test_logout_revokes_presented_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;
    let session = login_session(&server, &request.cpf, &request.senha).await;

    let response = server
        .post_auth(
            "/api/auth/logout",
            &session.token,
            &Logout {
                refresh_token: session.refresh_token.clone(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post(
            "/api/auth/refresh",
            &Refresh {
                refresh_token: session.refresh_token,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_without_body_revokes_all() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;
    let first = login_session(&server, &request.cpf, &request.senha).await;
    let second = login_session(&server, &request.cpf, &request.senha).await;

    let response = server
        .post_auth_empty("/api/auth/logout", &second.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    for refresh_token in [first.refresh_token, second.refresh_token] {
        let response = server
            .post("/api/auth/refresh", &Refresh { refresh_token })
            .await
            .unwrap();
        assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
    }
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/auth/me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/api/auth/me", "not.a.jwt").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Admin and records
// ============================================================================

#[tokio::test]
async fn test_admin_routes_reject_patients() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterPatient::unique();
    register(&server, &request).await;
    let session = login_session(&server, &request.cpf, &request.senha).await;

    let response = server.get_auth("/api/patients", &session.token).await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.code, "ACCESS_DENIED");
}

#[tokio::test]
async fn test_admin_manages_doctors_and_exams() {
    let server = TestServer::start().await.expect("Failed to start server");
    let admin = admin_session(&server).await;
    assert_eq!(admin.user.role, "admin");

    let patient_req = RegisterPatient::unique();
    let patient = register(&server, &patient_req).await;

    // Doctor
    let response = server
        .post_auth("/api/doctors", &admin.token, &CreateDoctor::unique())
        .await
        .unwrap();
    let envelope: Envelope<DoctorData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let doctor = envelope.into_data();

    // Exam linked to both
    let mut exam_req = CreateExam::for_patient(patient.id);
    exam_req.doctor_id = Some(doctor.id);
    let response = server
        .post_auth("/api/exams", &admin.token, &exam_req)
        .await
        .unwrap();
    let envelope: Envelope<ExamData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let exam = envelope.into_data();
    assert_eq!(exam.status, "pending");

    // Admin listing sees it
    let response = server.get_auth("/api/exams", &admin.token).await.unwrap();
    let envelope: Envelope<Paginated<ExamData>> =
        assert_json(response, StatusCode::OK).await.unwrap();
    let page = envelope.into_data();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].id, exam.id);

    // Exam for a nonexistent patient is a typed 404
    let response = server
        .post_auth("/api/exams", &admin.token, &CreateExam::for_patient(9999))
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(err.code, "PATIENT_NOT_FOUND");
}

#[tokio::test]
async fn test_patients_see_only_their_own_exams() {
    let server = TestServer::start().await.expect("Failed to start server");
    let admin = admin_session(&server).await;

    let first_req = RegisterPatient::unique();
    let first = register(&server, &first_req).await;
    let second_req = RegisterPatient::unique();
    let second = register(&server, &second_req).await;

    for patient_id in [first.id, second.id] {
        let response = server
            .post_auth("/api/exams", &admin.token, &CreateExam::for_patient(patient_id))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let session = login_session(&server, &first_req.cpf, &first_req.senha).await;
    let response = server.get_auth("/api/exams", &session.token).await.unwrap();
    let envelope: Envelope<Paginated<ExamData>> =
        assert_json(response, StatusCode::OK).await.unwrap();
    let page = envelope.into_data();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].patient_id, first.id);

    // Direct reads of the other patient's exam are denied
    let foreign_exam_id = page.data[0].id + 1;
    let response = server
        .get_auth(&format!("/api/exams/{foreign_exam_id}"), &session.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Share links
// ============================================================================

#[tokio::test]
async fn test_share_link_lifecycle() {
    let server = TestServer::start().await.expect("Failed to start server");
    let admin = admin_session(&server).await;

    let patient_req = RegisterPatient::unique();
    let patient = register(&server, &patient_req).await;
    let response = server
        .post_auth("/api/exams", &admin.token, &CreateExam::for_patient(patient.id))
        .await
        .unwrap();
    let envelope: Envelope<ExamData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let exam = envelope.into_data();

    // Patient shares their own exam
    let session = login_session(&server, &patient_req.cpf, &patient_req.senha).await;
    let response = server
        .post_auth(
            &format!("/api/exams/{}/share", exam.id),
            &session.token,
            &ShareExam { expires_in_hours: 48 },
        )
        .await
        .unwrap();
    let envelope: Envelope<ShareData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let share = envelope.into_data();
    assert_eq!(share.token.len(), 32);

    // Anonymous read through the link
    let response = server.get(&format!("/api/share/{}", share.token)).await.unwrap();
    let envelope: Envelope<SharedExamData> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(envelope.into_data().exam.id, exam.id);

    // Unknown token
    let response = server.get("/api/share/doesnotexist").await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(err.code, "SHARE_NOT_FOUND");
}

#[tokio::test]
async fn test_share_link_expiry() {
    let server = TestServer::start().await.expect("Failed to start server");
    let admin = admin_session(&server).await;

    let patient = register(&server, &RegisterPatient::unique()).await;
    let response = server
        .post_auth("/api/exams", &admin.token, &CreateExam::for_patient(patient.id))
        .await
        .unwrap();
    let envelope: Envelope<ExamData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let exam = envelope.into_data();

    // Seed a link that expired an hour ago
    server
        .seed_share(exam.id, "expiredexpiredexpiredexpired0000", Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    let response = server
        .get("/api/share/expiredexpiredexpiredexpired0000")
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::GONE).await.unwrap();
    assert_eq!(err.code, "SHARE_EXPIRED");
}

#[tokio::test]
async fn test_share_denied_for_foreign_exam() {
    let server = TestServer::start().await.expect("Failed to start server");
    let admin = admin_session(&server).await;

    let owner = register(&server, &RegisterPatient::unique()).await;
    let response = server
        .post_auth("/api/exams", &admin.token, &CreateExam::for_patient(owner.id))
        .await
        .unwrap();
    let envelope: Envelope<ExamData> = assert_json(response, StatusCode::CREATED).await.unwrap();
    let exam = envelope.into_data();

    let other_req = RegisterPatient::unique();
    register(&server, &other_req).await;
    let other_session = login_session(&server, &other_req.cpf, &other_req.senha).await;

    let response = server
        .post_auth(
            &format!("/api/exams/{}/share", exam.id),
            &other_session.token,
            &ShareExam { expires_in_hours: 24 },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.code, "ACCESS_DENIED");
}
