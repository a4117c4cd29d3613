//! HTTP surface for the wizard: auth, gated step pages, and the
//! dashboard.
//!
//! Page handlers run the step gate before doing anything else and answer
//! `303 See Other` whenever the gate sends the caller somewhere else,
//! mirroring server-side page redirects.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{MaybeSession, Session};
use crate::error::{ApiError, DatabaseError, ValidationError};
use crate::onboarding::components::components_for_step;
use crate::onboarding::gate::{Route as Page, resolve_destination};
use crate::onboarding::model::{Profile, ProfileFieldUpdate, Step};
use crate::state::AppState;

/// Outcome of running the gate for a request.
pub(crate) enum Gate {
    /// The caller may view the requested page.
    Stay {
        session: Session,
        profile: Option<Profile>,
    },
    /// The caller belongs somewhere else.
    Redirect(Page),
}

/// Load the caller's records and run the step gate for `requested`.
pub(crate) async fn check(
    state: &AppState,
    session: Option<Session>,
    requested: Page,
) -> Result<Gate, ApiError> {
    let Some(session) = session else {
        return Ok(Gate::Redirect(resolve_destination(
            false, None, None, requested,
        )));
    };

    let progress = state.db.get_progress(session.user_id).await?;
    let profile = state.db.get_profile(session.user_id).await?;

    let destination = resolve_destination(true, progress.as_ref(), profile.as_ref(), requested);
    if destination == requested {
        Ok(Gate::Stay { session, profile })
    } else {
        Ok(Gate::Redirect(destination))
    }
}

/// Unpack a gate outcome, or short-circuit with the redirect response.
macro_rules! stay_or_redirect {
    ($gate:expr) => {
        match $gate {
            $crate::onboarding::routes::Gate::Stay { session, profile } => (session, profile),
            $crate::onboarding::routes::Gate::Redirect(to) => {
                return Ok(axum::response::Redirect::to(to.path()).into_response());
            }
        }
    };
}

pub(crate) use stay_or_redirect;

#[derive(Debug, Deserialize)]
struct AuthRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    path: String,
}

/// POST /api/auth/signup
///
/// Issues a session for a brand-new user. Profile and progress rows are
/// created by the first step-1 submission, not here.
async fn signup(
    State(state): State<AppState>,
    Json(body): Json<AuthRequest>,
) -> Result<Response, ApiError> {
    let email = body.email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail.into());
    }
    if state.db.find_profile_by_email(email).await?.is_some() {
        return Err(ValidationError::EmailTaken(email.to_string()).into());
    }

    let user_id = Uuid::new_v4();
    let token = Uuid::new_v4().to_string();
    state.db.insert_session(&token, user_id, email).await?;
    tracing::info!(%user_id, "New signup");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "token": token, "user_id": user_id })),
    )
        .into_response())
}

/// POST /api/auth/login
///
/// Issues a session for an existing account. Credential verification is
/// the auth provider's concern and happens upstream of this service.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<AuthRequest>,
) -> Result<Response, ApiError> {
    let email = body.email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail.into());
    }

    let profile = state
        .db
        .find_profile_by_email(email)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "account".to_string(),
            id: email.to_string(),
        })?;

    let token = Uuid::new_v4().to_string();
    state.db.insert_session(&token, profile.id, email).await?;

    Ok(Json(json!({ "token": token, "user_id": profile.id })).into_response())
}

/// POST /api/auth/signout
///
/// Invalidates the presented session. Idempotent.
async fn signout(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    if let Some(session) = session {
        state.db.delete_session(&session.token).await?;
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /api/route?path=...
///
/// The raw gate decision for the caller: where a request for `path`
/// would land.
async fn route_decision(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<RouteQuery>,
) -> Result<Response, ApiError> {
    let requested = parse_route_path(&query.path)?;

    let destination = match &session {
        Some(session) => {
            let progress = state.db.get_progress(session.user_id).await?;
            let profile = state.db.get_profile(session.user_id).await?;
            resolve_destination(true, progress.as_ref(), profile.as_ref(), requested)
        }
        None => resolve_destination(false, None, None, requested),
    };

    Ok(Json(json!({ "destination": destination.path() })).into_response())
}

fn parse_route_path(path: &str) -> Result<Page, ValidationError> {
    Page::from_path(path).ok_or_else(|| ValidationError::UnknownRoute(path.to_string()))
}

/// GET /api/onboarding/step1
async fn step1_page(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let (session, _) = stay_or_redirect!(check(&state, session, Page::Step1).await?);
    Ok(Json(json!({ "email": session.email })).into_response())
}

/// POST /api/onboarding/step1
async fn step1_submit(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let (session, _) = stay_or_redirect!(check(&state, session, Page::Step1).await?);
    state.manager.complete_step1(&session).await?;
    Ok(Redirect::to(Page::Step2.path()).into_response())
}

/// GET /api/onboarding/step2
async fn step2_page(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::Step2).await?);
    let config = state.db.get_config().await?;
    let components = components_for_step(config.as_ref(), Step::Two);
    Ok(Json(json!({ "components": components })).into_response())
}

/// POST /api/onboarding/step2
async fn step2_submit(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Json(fields): Json<ProfileFieldUpdate>,
) -> Result<Response, ApiError> {
    let (session, _) = stay_or_redirect!(check(&state, session, Page::Step2).await?);
    state.manager.complete_step2(session.user_id, &fields).await?;
    Ok(Redirect::to(Page::Step3.path()).into_response())
}

/// GET /api/onboarding/step3
async fn step3_page(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let _ = stay_or_redirect!(check(&state, session, Page::Step3).await?);
    let config = state.db.get_config().await?;
    let components = components_for_step(config.as_ref(), Step::Three);
    Ok(Json(json!({ "components": components })).into_response())
}

/// POST /api/onboarding/step3
async fn step3_submit(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Json(fields): Json<ProfileFieldUpdate>,
) -> Result<Response, ApiError> {
    let (session, _) = stay_or_redirect!(check(&state, session, Page::Step3).await?);
    state.manager.complete_step3(session.user_id, &fields).await?;
    Ok(Redirect::to(Page::Dashboard.path()).into_response())
}

/// GET /api/dashboard
async fn dashboard_page(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Response, ApiError> {
    let (session, profile) = stay_or_redirect!(check(&state, session, Page::Dashboard).await?);
    let profile = profile.ok_or_else(|| DatabaseError::NotFound {
        entity: "profile".to_string(),
        id: session.user_id.to_string(),
    })?;
    Ok(Json(profile).into_response())
}

/// Build the auth + onboarding + dashboard routes.
pub fn onboarding_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/signout", post(signout))
        .route("/api/route", get(route_decision))
        .route("/api/onboarding/step1", get(step1_page).post(step1_submit))
        .route("/api/onboarding/step2", get(step2_page).post(step2_submit))
        .route("/api/onboarding/step3", get(step3_page).post(step3_submit))
        .route("/api/dashboard", get(dashboard_page))
        .with_state(state)
}
