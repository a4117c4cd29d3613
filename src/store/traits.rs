//! Backend-agnostic `Database` trait: single async interface for all
//! persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::{Role, Session};
use crate::error::DatabaseError;
use crate::onboarding::model::{OnboardingConfig, Profile, ProfileFieldUpdate, Progress, Step};

/// Aggregate counts over the `profiles` table, for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileCounts {
    pub total: u64,
    pub onboarding_completed: u64,
    pub admins: u64,
}

/// Backend-agnostic database trait covering sessions, profiles,
/// onboarding progress, and the global onboarding config.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Sessions ────────────────────────────────────────────────────

    /// Record a freshly issued session token.
    async fn insert_session(
        &self,
        token: &str,
        user_id: Uuid,
        email: &str,
    ) -> Result<(), DatabaseError>;

    /// Resolve a bearer token to a session, if it exists.
    async fn get_session(&self, token: &str) -> Result<Option<Session>, DatabaseError>;

    /// Invalidate a session token. A no-op for unknown tokens.
    async fn delete_session(&self, token: &str) -> Result<(), DatabaseError>;

    // ── Profiles ────────────────────────────────────────────────────

    /// Create the profile row if missing, refreshing the email if it
    /// already exists. Submitted onboarding fields are left untouched.
    async fn upsert_profile_identity(&self, id: Uuid, email: &str) -> Result<(), DatabaseError>;

    /// Get a profile by user id.
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, DatabaseError>;

    /// Look up a profile by email (login).
    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, DatabaseError>;

    /// All profiles, newest first.
    async fn list_profiles(&self) -> Result<Vec<Profile>, DatabaseError>;

    /// Write the optional profile fields present in `update`. Fields
    /// that are `None` are not touched. Errors if the profile is missing.
    async fn update_profile_fields(
        &self,
        id: Uuid,
        update: &ProfileFieldUpdate,
    ) -> Result<(), DatabaseError>;

    /// Set a profile's role. Errors if the profile is missing.
    async fn set_role(&self, id: Uuid, role: Role) -> Result<(), DatabaseError>;

    /// Set the overall onboarding completion flag. Errors if the
    /// profile is missing.
    async fn set_onboarding_completed(
        &self,
        id: Uuid,
        completed: bool,
    ) -> Result<(), DatabaseError>;

    /// Aggregate counts for the admin dashboard.
    async fn profile_counts(&self) -> Result<ProfileCounts, DatabaseError>;

    // ── Onboarding progress ─────────────────────────────────────────

    /// Get a user's progress record, if any.
    async fn get_progress(&self, user_id: Uuid) -> Result<Option<Progress>, DatabaseError>;

    /// Create the progress row with all steps incomplete, if missing.
    async fn ensure_progress(&self, user_id: Uuid) -> Result<(), DatabaseError>;

    /// Mark a single step complete or incomplete.
    async fn mark_step(&self, user_id: Uuid, step: Step, done: bool) -> Result<(), DatabaseError>;

    /// Set all three step flags back to false. A no-op when the row is
    /// already reset or absent.
    async fn reset_progress(&self, user_id: Uuid) -> Result<(), DatabaseError>;

    // ── Onboarding config ───────────────────────────────────────────

    /// The single global config record, if one has been created.
    async fn get_config(&self) -> Result<Option<OnboardingConfig>, DatabaseError>;

    /// Overwrite the single global config record.
    async fn put_config(&self, config: &OnboardingConfig) -> Result<(), DatabaseError>;
}
