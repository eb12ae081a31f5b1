use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use service_core::error::AppError;

use crate::AppState;

pub async fn index() -> impl IntoResponse {
    Redirect::to("/login")
}

pub async fn health_check(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::warn!(backend = state.store.backend(), error = %e, "Store health check failed");
        AppError::ServiceUnavailable
    })?;
    Ok("OK")
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}
