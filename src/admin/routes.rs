//! Admin area: dashboard stats, user management, config editor, and the
//! data export page. Every handler runs the same gate as the user-facing
//! pages; non-admins are bounced to the dashboard.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::MaybeSession;
use crate::error::ApiError;
use crate::onboarding::gate::Route as Page;
use crate::onboarding::model::OnboardingConfig;
use crate::onboarding::routes::{check, stay_or_redirect};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ConfigPayload {
    #[serde(default)]
    step2_components: Vec<String>,
    #[serde(default)]
    step3_components: Vec<String>,
}

/// GET /api/admin
///
/// Onboarding funnel counts for the admin dashboard.
async fn stats(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::Admin).await?);
    let counts = state.db.profile_counts().await?;
    Ok(Json(json!({
        "total_users": counts.total,
        "completed_onboarding": counts.onboarding_completed,
        "admin_users": counts.admins,
        "in_progress": counts.total - counts.onboarding_completed,
    }))
    .into_response())
}

/// GET /api/admin/users
async fn list_users(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::AdminUsers).await?);
    let users = state.db.list_profiles().await?;
    Ok(Json(users).into_response())
}

/// POST /api/admin/users/{id}/role
///
/// Flip a user between the two roles. Returns the new role.
async fn toggle_role(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Path(user_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::AdminUsers).await?);
    let role = state.manager.toggle_role(user_id).await?;
    Ok(Json(json!({ "role": role })).into_response())
}

/// POST /api/admin/users/{id}/reset-onboarding
///
/// Send a user back through the wizard. Idempotent.
async fn reset_onboarding(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Path(user_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::AdminUsers).await?);
    state.manager.reset_onboarding(user_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /api/admin/onboarding-config
async fn get_config(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::AdminConfig).await?);
    let config = state.db.get_config().await?.unwrap_or_default();
    Ok(Json(config).into_response())
}

/// PUT /api/admin/onboarding-config
///
/// Overwrite the single global config record. Unknown component ids are
/// rejected before anything is written.
async fn put_config(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Json(payload): Json<ConfigPayload>,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::AdminConfig).await?);
    let config: OnboardingConfig = state
        .manager
        .update_config(&payload.step2_components, &payload.step3_components)
        .await?;
    Ok(Json(config).into_response())
}

/// GET /api/data
///
/// Full profile table, newest first.
async fn export_data(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::Data).await?);
    let users = state.db.list_profiles().await?;
    Ok(Json(users).into_response())
}

/// Build the admin routes.
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/admin", get(stats))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}/role", post(toggle_role))
        .route(
            "/api/admin/users/{id}/reset-onboarding",
            post(reset_onboarding),
        )
        .route("/api/admin/onboarding-config", get(get_config).put(put_config))
        .route("/api/data", get(export_data))
        .with_state(state)
}
