use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use clinic_api::ApiError;
use clinic_core::EntityKind;
use serde_json::json;

use crate::server::AppState;

pub async fn root() -> impl IntoResponse {
    let collections: Vec<&str> = EntityKind::ALL.iter().map(|k| k.collection()).collect();
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "collections": collections,
    }))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Ready once every collection answers; reports entry counts and the backend.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.counts().await {
        Ok(counts) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "backend": state.store.backend(),
                "collections": counts,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "backend": state.store.backend(),
                })),
            )
        }
    }
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Method not allowed for this route")
}
