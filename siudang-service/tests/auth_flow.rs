mod common;

use axum::http::StatusCode;
use common::{body_text, location, RecordingEmail, TestApp};
use siudang_service::services::InMemoryStore;
use std::sync::Arc;

#[tokio::test]
async fn root_redirects_to_login() {
    let app = TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn protected_pages_redirect_without_session() {
    let app = TestApp::new();

    for uri in [
        "/dashboard",
        "/coa",
        "/input_jurnal",
        "/jurnal_umum",
        "/buku_besar",
        "/neraca_saldo",
        "/jurnal_penyesuaian",
        "/nssp",
        "/hitung_hpp",
        "/buku_pembantu_penyusutan",
        "/laporan_keuangan",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/login", "{}", uri);
    }
}

#[tokio::test]
async fn registration_with_otp_signs_the_user_in() {
    let app = TestApp::new();

    app.register("petambak@example.com", "rahasia123").await;

    let body = body_text(app.get("/dashboard").await).await;
    assert!(body.contains("Selamat datang, petambak@example.com"));
}

#[tokio::test]
async fn wrong_otp_keeps_the_attempt_open() {
    let app = TestApp::new();
    app.post_form(
        "/send_otp",
        &[("email", "petambak@example.com"), ("password", "rahasia123")],
    )
    .await;
    let code = app.email.last_code_for("petambak@example.com").unwrap();
    let wrong = if code == "123456" { "654321" } else { "123456" };

    let body = body_text(app.post_form("/verify_otp", &[("otp", wrong)]).await).await;
    assert!(body.contains("OTP salah. Coba lagi!"));

    let response = app.post_form("/verify_otp", &[("otp", &code)]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn verify_without_registration_asks_to_start_over() {
    let app = TestApp::new();

    let body = body_text(app.post_form("/verify_otp", &[("otp", "123456")]).await).await;

    assert!(body.contains("Silakan daftar ulang"));
}

#[tokio::test]
async fn invalid_registration_input_is_rejected_before_sending() {
    let app = TestApp::new();

    let body = body_text(
        app.post_form("/send_otp", &[("email", "bukan-email"), ("password", "rahasia123")])
            .await,
    )
    .await;
    assert!(body.contains("Format email tidak valid"));

    let body = body_text(
        app.post_form("/send_otp", &[("email", "petambak@example.com"), ("password", "123")])
            .await,
    )
    .await;
    assert!(body.contains("Password minimal 6 karakter"));
    assert!(app.email.last_code_for("petambak@example.com").is_none());
}

#[tokio::test]
async fn email_failure_is_reported() {
    let app = TestApp::with_parts(Arc::new(InMemoryStore::new()), RecordingEmail::failing());

    let body = body_text(
        app.post_form(
            "/send_otp",
            &[("email", "petambak@example.com"), ("password", "rahasia123")],
        )
        .await,
    )
    .await;

    assert!(body.contains("Gagal mengirim OTP"));
}

#[tokio::test]
async fn registered_email_cannot_register_again() {
    let app = TestApp::new();
    app.register("petambak@example.com", "rahasia123").await;

    let body = body_text(
        app.post_form(
            "/send_otp",
            &[("email", "petambak@example.com"), ("password", "lainlagi")],
        )
        .await,
    )
    .await;

    assert!(body.contains("Email sudah terdaftar"));
}

#[tokio::test]
async fn login_logout_round() {
    let app = TestApp::new();
    app.register("petambak@example.com", "rahasia123").await;

    let response = app.get("/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(location(&app.get("/dashboard").await), "/login");

    let body = body_text(
        app.post_form(
            "/login_success",
            &[("email", "petambak@example.com"), ("password", "salah123")],
        )
        .await,
    )
    .await;
    assert!(body.contains("Email atau password salah"));

    let response = app
        .post_form(
            "/login_success",
            &[("email", "Petambak@Example.com"), ("password", "rahasia123")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    assert_eq!(app.get("/dashboard").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_user_gets_the_same_login_message() {
    let app = TestApp::new();

    let body = body_text(
        app.post_form(
            "/login_success",
            &[("email", "siapa@example.com"), ("password", "rahasia123")],
        )
        .await,
    )
    .await;

    assert!(body.contains("Email atau password salah"));
}
