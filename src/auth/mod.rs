//! Roles and role-based authorization.

pub mod session;

pub use session::{MaybeSession, Session};

use serde::{Deserialize, Serialize};

use crate::onboarding::model::Profile;

/// The two account roles.
///
/// Stored as plain text in the `profiles` table; modeled as a closed enum
/// so authorization checks are exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl Role {
    /// The DB string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// The other role. Admin "role toggle" flips between the two.
    pub fn toggled(&self) -> Role {
        match self {
            Self::User => Self::Admin,
            Self::Admin => Self::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// True iff the profile is present and holds the required role.
///
/// Guards the admin dashboard, user list, config editor, the data export
/// page, and the admin-only mutations (role toggle, onboarding reset).
pub fn require_role(profile: Option<&Profile>, role: Role) -> bool {
    profile.is_some_and(|p| p.role == role)
}
