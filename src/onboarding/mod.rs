//! The onboarding wizard: step gate, data models, component resolver,
//! and the HTTP surface.
//!
//! Users move through three linear steps. Steps 2 and 3 collect whatever
//! optional profile components the admin config selects; finishing step 3
//! marks the profile complete and unlocks the dashboard.

pub mod components;
pub mod gate;
pub mod manager;
pub mod model;
pub mod routes;

pub use components::{components_for_step, parse_component_set};
pub use gate::{Route, resolve_destination};
pub use manager::OnboardingManager;
pub use model::{
    Address, ComponentId, OnboardingConfig, Profile, ProfileFieldUpdate, Progress, Step,
};
pub use routes::onboarding_routes;
