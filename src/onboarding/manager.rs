//! OnboardingManager: coordinates step submissions, admin mutations, and
//! the config record over the store.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{Role, Session};
use crate::error::{DatabaseError, Error, Result};
use crate::onboarding::components::{components_for_step, parse_component_set};
use crate::onboarding::model::{OnboardingConfig, ProfileFieldUpdate, Step};
use crate::store::Database;

/// Coordinates the onboarding flow against the store. Holds no state of
/// its own; every operation is a single-record read or write.
pub struct OnboardingManager {
    db: Arc<dyn Database>,
}

impl OnboardingManager {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Step 1 submission: create the profile and progress rows if this
    /// is the user's first pass, then mark step 1 complete.
    pub async fn complete_step1(&self, session: &Session) -> Result<()> {
        self.db
            .upsert_profile_identity(session.user_id, &session.email)
            .await?;
        self.db.ensure_progress(session.user_id).await?;
        self.db.mark_step(session.user_id, Step::One, true).await?;
        tracing::info!(user_id = %session.user_id, "Step 1 completed");
        Ok(())
    }

    /// Step 2 submission: persist the configured subset of the payload,
    /// then mark step 2 complete.
    pub async fn complete_step2(&self, user_id: Uuid, fields: &ProfileFieldUpdate) -> Result<()> {
        self.submit_step(user_id, Step::Two, fields).await?;
        tracing::info!(user_id = %user_id, "Step 2 completed");
        Ok(())
    }

    /// Step 3 submission: persist the configured subset of the payload,
    /// mark step 3 complete, and flip the overall completion flag. All
    /// three step flags are true once this returns.
    pub async fn complete_step3(&self, user_id: Uuid, fields: &ProfileFieldUpdate) -> Result<()> {
        self.submit_step(user_id, Step::Three, fields).await?;
        self.db.set_onboarding_completed(user_id, true).await?;
        tracing::info!(user_id = %user_id, "Onboarding completed");
        Ok(())
    }

    async fn submit_step(
        &self,
        user_id: Uuid,
        step: Step,
        fields: &ProfileFieldUpdate,
    ) -> Result<()> {
        let config = self.db.get_config().await?;
        let components = components_for_step(config.as_ref(), step);

        let allowed = fields.restricted_to(&components);
        if !allowed.is_empty() {
            self.db.update_profile_fields(user_id, &allowed).await?;
        }
        self.db.mark_step(user_id, step, true).await?;
        Ok(())
    }

    /// Admin action: flip a user's role between user and admin. Returns
    /// the new role.
    pub async fn toggle_role(&self, user_id: Uuid) -> Result<Role> {
        let profile = self.db.get_profile(user_id).await?.ok_or_else(|| {
            Error::Database(DatabaseError::NotFound {
                entity: "profile".to_string(),
                id: user_id.to_string(),
            })
        })?;

        let new_role = profile.role.toggled();
        self.db.set_role(user_id, new_role).await?;
        tracing::info!(user_id = %user_id, role = %new_role, "Role toggled");
        Ok(new_role)
    }

    /// Admin action: send a user back through the wizard. Clears all
    /// three step flags and the overall completion flag; idempotent.
    pub async fn reset_onboarding(&self, user_id: Uuid) -> Result<()> {
        self.db.set_onboarding_completed(user_id, false).await?;
        self.db.reset_progress(user_id).await?;
        tracing::info!(user_id = %user_id, "Onboarding reset");
        Ok(())
    }

    /// Admin action: overwrite the global config. Every submitted id is
    /// validated against the component vocabulary before anything is
    /// written. Returns the stored config.
    pub async fn update_config(
        &self,
        step2_ids: &[String],
        step3_ids: &[String],
    ) -> Result<OnboardingConfig> {
        let config = OnboardingConfig {
            step2_components: parse_component_set(step2_ids)?,
            step3_components: parse_component_set(step3_ids)?,
            ..Default::default()
        };
        self.db.put_config(&config).await?;
        tracing::info!(
            step2 = ?config.step2_components,
            step3 = ?config.step3_components,
            "Onboarding config updated"
        );
        Ok(config)
    }
}
