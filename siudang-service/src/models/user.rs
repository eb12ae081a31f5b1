//! Registered users and the signed-in session user.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tower_sessions::Session;

/// Stored user; `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone, FromRow, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    #[serde(rename = "password")]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    #[serde(default, deserialize_with = "super::timestamp::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for inserting a verified user.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub const SESSION_EMAIL_KEY: &str = "email";
pub const SESSION_REGISTRATION_KEY: &str = "registration_token";

/// Signed-in user, read from the session. Unauthenticated requests are
/// redirected to the login page.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        let email: Option<String> = session.get(SESSION_EMAIL_KEY).await.unwrap_or(None);

        match email {
            Some(email) => Ok(AuthUser { email }),
            None => Err(Redirect::to("/login").into_response()),
        }
    }
}
