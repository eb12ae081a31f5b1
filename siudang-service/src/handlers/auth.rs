use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use service_core::error::AppError;
use tower_sessions::Session;
use uuid::Uuid;
use validator::Validate;

use super::session_error;
use crate::models::user::{SESSION_EMAIL_KEY, SESSION_REGISTRATION_KEY};
use crate::models::{AuthUser, CreateUser};
use crate::services::metrics::{LOGINS, REGISTRATIONS};
use crate::services::OtpRejection;
use crate::utils::otp::generate_otp;
use crate::utils::{hash_password, verify_password, Password};

pub const SEND_OTP_FAILED: &str = "❌ Gagal mengirim OTP";
pub const LOGIN_FAILED: &str = "❌ Email atau password salah";
pub const SAVE_USER_FAILED: &str = "❌ Gagal menyimpan user ke database.";
pub const EMAIL_TAKEN: &str = "❌ Email sudah terdaftar. Silakan login.";
pub const OTP_SENT: &str = "✅ Kode OTP telah dikirim ke email Anda.";

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub email: String,
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "verify_otp.html")]
pub struct VerifyOtpTemplate {
    pub email: String,
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub message: Option<String>,
    pub current_page: &'static str,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "❌ Format email tidak valid"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "❌ Password minimal 6 karakter"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// First message out of a validator report, for re-rendering the form.
pub(crate) fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "❌ Data tidak valid".to_string())
}

pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        email: String::new(),
        message: None,
    }
}

/// Start a registration: hash the password, email a code and park the attempt
/// under a token held in the session.
pub async fn send_otp(
    State(state): State<crate::AppState>,
    session: Session,
    Form(payload): Form<RegisterRequest>,
) -> Result<Response, AppError> {
    let email = payload.email.trim().to_lowercase();
    let rerender = |message: String| RegisterTemplate {
        email: email.clone(),
        message: Some(message),
    };

    if let Err(errors) = payload.validate() {
        REGISTRATIONS.with_label_values(&["send_otp", "invalid"]).inc();
        return Ok(rerender(first_validation_message(&errors)).into_response());
    }

    match state.store.find_user_by_email(&email).await {
        Ok(Some(_)) => {
            REGISTRATIONS.with_label_values(&["send_otp", "duplicate"]).inc();
            return Ok(rerender(EMAIL_TAKEN.to_string()).into_response());
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to check existing user");
            REGISTRATIONS.with_label_values(&["send_otp", "store_error"]).inc();
            return Ok(rerender(SEND_OTP_FAILED.to_string()).into_response());
        }
    }

    let password_hash = hash_password(&Password::new(payload.password))?;
    let code = generate_otp();

    if let Err(e) = state.email.send_otp_email(&email, &code).await {
        tracing::error!(email = %email, error = %e, "Failed to send OTP email");
        REGISTRATIONS.with_label_values(&["send_otp", "email_error"]).inc();
        return Ok(rerender(SEND_OTP_FAILED.to_string()).into_response());
    }

    if let Some(previous) = session
        .get::<Uuid>(SESSION_REGISTRATION_KEY)
        .await
        .map_err(session_error)?
    {
        state.registrations.complete(previous);
    }

    let token = state.registrations.begin(&email, password_hash, &code);
    session
        .insert(SESSION_REGISTRATION_KEY, token)
        .await
        .map_err(session_error)?;

    tracing::info!(email = %email, "OTP sent");
    REGISTRATIONS.with_label_values(&["send_otp", "sent"]).inc();

    Ok(VerifyOtpTemplate {
        email,
        message: Some(OTP_SENT.to_string()),
    }
    .into_response())
}

/// Finish a registration: check the code, write the user and sign them in.
pub async fn verify_otp(
    State(state): State<crate::AppState>,
    session: Session,
    Form(payload): Form<VerifyOtpRequest>,
) -> Result<Response, AppError> {
    let Some(token) = session
        .get::<Uuid>(SESSION_REGISTRATION_KEY)
        .await
        .map_err(session_error)?
    else {
        REGISTRATIONS.with_label_values(&["verify_otp", "missing"]).inc();
        return Ok(RegisterTemplate {
            email: String::new(),
            message: Some(format!("❌ {}", OtpRejection::Missing)),
        }
        .into_response());
    };

    let pending = match state.registrations.verify(token, &payload.otp) {
        Ok(pending) => pending,
        Err(rejection) => {
            REGISTRATIONS
                .with_label_values(&["verify_otp", rejection.as_str()])
                .inc();
            tracing::info!(reason = rejection.as_str(), "OTP rejected");

            if rejection.is_terminal() {
                session
                    .remove::<Uuid>(SESSION_REGISTRATION_KEY)
                    .await
                    .map_err(session_error)?;
                return Ok(RegisterTemplate {
                    email: String::new(),
                    message: Some(format!("❌ {}", rejection)),
                }
                .into_response());
            }
            return Ok(VerifyOtpTemplate {
                email: String::new(),
                message: Some(format!("❌ {}", rejection)),
            }
            .into_response());
        }
    };

    let user = CreateUser {
        email: pending.email.clone(),
        password_hash: pending.password_hash.into_string(),
        created_at: Utc::now(),
    };

    if let Err(e) = state.store.insert_user(&user).await {
        tracing::error!(email = %user.email, error = %e, "Failed to insert user");
        REGISTRATIONS.with_label_values(&["verify_otp", "store_error"]).inc();
        return Ok(VerifyOtpTemplate {
            email: user.email,
            message: Some(SAVE_USER_FAILED.to_string()),
        }
        .into_response());
    }

    state.registrations.complete(token);
    session
        .remove::<Uuid>(SESSION_REGISTRATION_KEY)
        .await
        .map_err(session_error)?;
    session.cycle_id().await.map_err(session_error)?;
    session
        .insert(SESSION_EMAIL_KEY, &user.email)
        .await
        .map_err(session_error)?;

    tracing::info!(email = %user.email, "User registered");
    REGISTRATIONS.with_label_values(&["verify_otp", "registered"]).inc();

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        email: String::new(),
        message: None,
    }
}

pub async fn login_success(
    State(state): State<crate::AppState>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<Response, AppError> {
    let email = payload.email.trim().to_lowercase();
    let failed = |email: String, message: &str| {
        LoginTemplate {
            email,
            message: Some(message.to_string()),
        }
        .into_response()
    };

    let user = match state.store.find_user_by_email(&email).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up user");
            LOGINS.with_label_values(&["store_error"]).inc();
            return Ok(failed(email, super::STORE_FAILURE_MESSAGE));
        }
    };

    let verified = user
        .as_ref()
        .map(|u| verify_password(&Password::new(payload.password), &u.password_hash))
        .unwrap_or(false);

    if !verified {
        tracing::info!(email = %email, "Login rejected");
        LOGINS.with_label_values(&["rejected"]).inc();
        return Ok(failed(email, LOGIN_FAILED));
    }

    session.cycle_id().await.map_err(session_error)?;
    session
        .insert(SESSION_EMAIL_KEY, &email)
        .await
        .map_err(session_error)?;

    tracing::info!(email = %email, "User logged in");
    LOGINS.with_label_values(&["success"]).inc();

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session.flush().await.map_err(session_error)?;
    Ok(Redirect::to("/login"))
}

pub async fn dashboard(auth_user: AuthUser) -> impl IntoResponse {
    DashboardTemplate {
        email: auth_user.email,
        message: None,
        current_page: "dashboard",
    }
}
