//! Session tokens and the request extractor.
//!
//! Sessions are opaque bearer tokens validated against the `sessions`
//! table on every request. Issuing credentials is the auth provider's
//! concern; this module only answers "who is calling?".

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated request context.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Extractor that resolves the `Authorization: Bearer` header to a
/// session, if any.
///
/// Never rejects on a missing or unknown token; the step gate decides
/// what an anonymous caller gets to see. Only a store failure during
/// lookup surfaces as an error.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return Ok(Self(None));
        };

        let session = state.db.get_session(token).await?;
        Ok(Self(session))
    }
}
