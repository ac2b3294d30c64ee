//! REST endpoints for onboarding status and profile.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use super::manager::ProfileManager;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<ProfileManager>,
}

/// GET /api/onboarding/status
///
/// Flow states, summaries, progress steps and modals for both tracks.
/// Before the first load every field reports the loading state.
async fn get_status(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.manager.status().await)
}

/// GET /api/onboarding/profile
///
/// Returns the cached user profile, or 404 if none has been loaded.
async fn get_profile(State(state): State<OnboardingRouteState>) -> Response {
    match state.manager.profile().await {
        Some(profile) => Json(profile).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No profile loaded yet"})),
        )
            .into_response(),
    }
}

/// POST /api/onboarding/refresh
///
/// Reload the profile from its source and return the new status.
async fn refresh(State(state): State<OnboardingRouteState>) -> Response {
    match state.manager.load().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => {
            let code = if e.is_auth_failure() {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::BAD_GATEWAY
            };
            (code, Json(serde_json::json!({"error": e.to_string()}))).into_response()
        }
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/status", get(get_status))
        .route("/api/onboarding/profile", get(get_profile))
        .route("/api/onboarding/refresh", post(refresh))
        .with_state(state)
}
