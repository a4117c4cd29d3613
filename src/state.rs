//! Shared application state and router assembly.

use std::sync::Arc;

use axum::Router;

use crate::onboarding::OnboardingManager;
use crate::store::Database;

/// State handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub manager: Arc<OnboardingManager>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>) -> Self {
        let manager = Arc::new(OnboardingManager::new(Arc::clone(&db)));
        Self { db, manager }
    }
}

/// The full API router: onboarding/auth surface plus the admin area.
pub fn api_router(state: AppState) -> Router {
    crate::onboarding::routes::onboarding_routes(state.clone())
        .merge(crate::admin::routes::admin_routes(state))
}
