//! Profile, progress, and onboarding configuration models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

/// Id of the single global `onboarding_config` record.
pub const CONFIG_ID: &str = "1";

/// Durable per-user record holding identity, role, and submitted
/// onboarding data. One row in `profiles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub onboarding_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh profile, as created by the first step-1 submission.
    pub fn new(id: Uuid, email: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            role: Role::User,
            onboarding_completed: false,
            about_me: None,
            address: None,
            birthdate: None,
            created_at: Utc::now(),
        }
    }
}

/// Postal address collected by the `address` component.
///
/// Stored as a JSON object in the `profiles.address` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Per-user onboarding progress, 1:1 with a profile. One row in
/// `user_onboarding`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub user_id: Uuid,
    pub step1_completed: bool,
    pub step2_completed: bool,
    pub step3_completed: bool,
}

impl Progress {
    /// Fresh progress: nothing completed.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            step1_completed: false,
            step2_completed: false,
            step3_completed: false,
        }
    }
}

/// The three onboarding steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    One,
    Two,
    Three,
}

impl Step {
    /// The `user_onboarding` column tracking this step.
    pub fn column(&self) -> &'static str {
        match self {
            Self::One => "step1_completed",
            Self::Two => "step2_completed",
            Self::Three => "step3_completed",
        }
    }
}

/// The closed vocabulary of optional profile components an admin can
/// place on steps 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentId {
    AboutMe,
    Address,
    Birthdate,
}

impl ComponentId {
    /// Every known component, in canonical order.
    pub const ALL: [ComponentId; 3] = [Self::AboutMe, Self::Address, Self::Birthdate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AboutMe => "about_me",
            Self::Address => "address",
            Self::Birthdate => "birthdate",
        }
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComponentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "about_me" => Ok(Self::AboutMe),
            "address" => Ok(Self::Address),
            "birthdate" => Ok(Self::Birthdate),
            other => Err(format!("unknown component '{other}'")),
        }
    }
}

/// The single global record listing which optional components are
/// collected at steps 2 and 3. Admin-owned; users read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingConfig {
    pub id: String,
    pub step2_components: Vec<ComponentId>,
    pub step3_components: Vec<ComponentId>,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            id: CONFIG_ID.to_string(),
            step2_components: Vec::new(),
            step3_components: Vec::new(),
        }
    }
}

/// Optional profile fields carried by a step-2/step-3 submission.
///
/// Only fields present in the step's configured component list are ever
/// written; see [`ProfileFieldUpdate::restricted_to`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFieldUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
}

impl ProfileFieldUpdate {
    /// Whether no field would be written.
    pub fn is_empty(&self) -> bool {
        self.about_me.is_none() && self.address.is_none() && self.birthdate.is_none()
    }

    /// Drop every field not in the configured component list.
    ///
    /// The same list drives rendering, so a well-behaved client never
    /// loses data here; anything else submitted is silently ignored
    /// rather than written outside the allowed set.
    pub fn restricted_to(&self, components: &[ComponentId]) -> Self {
        Self {
            about_me: self
                .about_me
                .clone()
                .filter(|_| components.contains(&ComponentId::AboutMe)),
            address: self
                .address
                .clone()
                .filter(|_| components.contains(&ComponentId::Address)),
            birthdate: self
                .birthdate
                .filter(|_| components.contains(&ComponentId::Birthdate)),
        }
    }
}
