//! The step gate: decides which view a caller is shown next.
//!
//! Every page handler funnels through [`resolve_destination`], a pure
//! function of the session, the caller's progress and profile, and the
//! requested route. Checks run in a fixed order: session first, then
//! completion flags in step order, then role.

use crate::auth::{Role, require_role};
use crate::onboarding::model::{Profile, Progress};

/// The known routes, used both as requested paths and as destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Signup,
    Step1,
    Step2,
    Step3,
    Dashboard,
    Admin,
    AdminConfig,
    AdminUsers,
    Data,
}

impl Route {
    /// The URL path for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Step1 => "/onboarding/step1",
            Self::Step2 => "/onboarding/step2",
            Self::Step3 => "/onboarding/step3",
            Self::Dashboard => "/dashboard",
            Self::Admin => "/admin",
            Self::AdminConfig => "/admin/onboarding-config",
            Self::AdminUsers => "/admin/users",
            Self::Data => "/data",
        }
    }

    /// Parse a URL path back into a route.
    pub fn from_path(path: &str) -> Option<Route> {
        let route = match path {
            "/" => Self::Root,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/onboarding/step1" => Self::Step1,
            "/onboarding/step2" => Self::Step2,
            "/onboarding/step3" => Self::Step3,
            "/dashboard" => Self::Dashboard,
            "/admin" => Self::Admin,
            "/admin/onboarding-config" => Self::AdminConfig,
            "/admin/users" => Self::AdminUsers,
            "/data" => Self::Data,
            _ => return None,
        };
        Some(route)
    }

    /// Whether this route is part of the admin area.
    fn is_admin_area(&self) -> bool {
        matches!(
            self,
            Self::Admin | Self::AdminConfig | Self::AdminUsers | Self::Data
        )
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Resolve the view a caller should actually be shown.
///
/// Returns `requested` itself when the caller may stay. Absent records
/// mean "nothing completed"; the gate never errors.
pub fn resolve_destination(
    session: bool,
    progress: Option<&Progress>,
    profile: Option<&Profile>,
    requested: Route,
) -> Route {
    if !session {
        return Route::Login;
    }

    let (step1, step2, step3) = progress.map_or((false, false, false), |p| {
        (p.step1_completed, p.step2_completed, p.step3_completed)
    });
    let completed = profile.is_some_and(|p| p.onboarding_completed);
    let admin = require_role(profile, Role::Admin);

    match requested {
        // Authenticated callers get bounced off the auth pages to the
        // root, which then routes them by onboarding state and role.
        Route::Login | Route::Signup => resolve_destination(session, progress, profile, Route::Root),

        Route::Step1 | Route::Step2 | Route::Step3 if completed => Route::Dashboard,
        Route::Step1 => {
            if step1 {
                Route::Step2
            } else {
                Route::Step1
            }
        }
        Route::Step2 => {
            if !step1 {
                Route::Step1
            } else if step2 {
                Route::Step3
            } else {
                Route::Step2
            }
        }
        Route::Step3 => {
            if !(step1 && step2) {
                Route::Step2
            } else if step3 {
                Route::Dashboard
            } else {
                Route::Step3
            }
        }

        Route::Root | Route::Dashboard => {
            if !completed {
                Route::Step1
            } else if admin {
                Route::Admin
            } else {
                Route::Dashboard
            }
        }

        route if route.is_admin_area() => {
            if admin {
                route
            } else {
                Route::Dashboard
            }
        }
        route => route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const ALL_ROUTES: [Route; 11] = [
        Route::Root,
        Route::Login,
        Route::Signup,
        Route::Step1,
        Route::Step2,
        Route::Step3,
        Route::Dashboard,
        Route::Admin,
        Route::AdminConfig,
        Route::AdminUsers,
        Route::Data,
    ];

    fn progress(step1: bool, step2: bool, step3: bool) -> Progress {
        Progress {
            user_id: Uuid::new_v4(),
            step1_completed: step1,
            step2_completed: step2,
            step3_completed: step3,
        }
    }

    fn profile(completed: bool, role: Role) -> Profile {
        let mut p = Profile::new(Uuid::new_v4(), "user@example.com");
        p.onboarding_completed = completed;
        p.role = role;
        p
    }

    #[test]
    fn path_roundtrip() {
        for route in ALL_ROUTES {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/nope"), None);
        assert_eq!(Route::from_path(""), None);
    }

    #[test]
    fn no_session_always_resolves_to_login() {
        let progress = progress(true, true, true);
        let profile = profile(true, Role::Admin);
        for route in ALL_ROUTES {
            assert_eq!(
                resolve_destination(false, Some(&progress), Some(&profile), route),
                Route::Login,
                "{route} should resolve to login without a session"
            );
        }
    }

    #[test]
    fn absent_records_mean_nothing_completed() {
        assert_eq!(
            resolve_destination(true, None, None, Route::Step1),
            Route::Step1
        );
        assert_eq!(
            resolve_destination(true, None, None, Route::Step2),
            Route::Step1
        );
        assert_eq!(
            resolve_destination(true, None, None, Route::Step3),
            Route::Step2
        );
        assert_eq!(
            resolve_destination(true, None, None, Route::Dashboard),
            Route::Step1
        );
    }

    #[test]
    fn cannot_skip_ahead() {
        let p = progress(false, false, false);
        assert_eq!(
            resolve_destination(true, Some(&p), None, Route::Step2),
            Route::Step1
        );
        assert_eq!(
            resolve_destination(true, Some(&p), None, Route::Step3),
            Route::Step2
        );

        // Step 1 done, step 2 not: step 3 still bounces back to step 2.
        let p = progress(true, false, false);
        assert_eq!(
            resolve_destination(true, Some(&p), None, Route::Step3),
            Route::Step2
        );
    }

    #[test]
    fn completed_steps_advance() {
        let p = progress(true, false, false);
        assert_eq!(
            resolve_destination(true, Some(&p), None, Route::Step1),
            Route::Step2
        );
        assert_eq!(
            resolve_destination(true, Some(&p), None, Route::Step2),
            Route::Step2
        );

        let p = progress(true, true, false);
        assert_eq!(
            resolve_destination(true, Some(&p), None, Route::Step2),
            Route::Step3
        );
        assert_eq!(
            resolve_destination(true, Some(&p), None, Route::Step3),
            Route::Step3
        );

        let p = progress(true, true, true);
        assert_eq!(
            resolve_destination(true, Some(&p), None, Route::Step3),
            Route::Dashboard
        );
    }

    #[test]
    fn mid_onboarding_dashboard_bounces_to_step1() {
        // Progress {true, true, false} but the profile is not complete:
        // step 2 advances to step 3, the dashboard restarts the wizard.
        let p = progress(true, true, false);
        let prof = profile(false, Role::User);
        assert_eq!(
            resolve_destination(true, Some(&p), Some(&prof), Route::Step2),
            Route::Step3
        );
        assert_eq!(
            resolve_destination(true, Some(&p), Some(&prof), Route::Dashboard),
            Route::Step1
        );
    }

    #[test]
    fn completed_user_routing() {
        let p = progress(true, true, true);
        let prof = profile(true, Role::User);
        assert_eq!(
            resolve_destination(true, Some(&p), Some(&prof), Route::Dashboard),
            Route::Dashboard
        );
        assert_eq!(
            resolve_destination(true, Some(&p), Some(&prof), Route::Root),
            Route::Dashboard
        );
        // Finished users have no business back in the wizard.
        for step in [Route::Step1, Route::Step2, Route::Step3] {
            assert_eq!(
                resolve_destination(true, Some(&p), Some(&prof), step),
                Route::Dashboard
            );
        }
    }

    #[test]
    fn completed_admin_goes_to_admin() {
        let p = progress(true, true, true);
        let prof = profile(true, Role::Admin);
        assert_eq!(
            resolve_destination(true, Some(&p), Some(&prof), Route::Dashboard),
            Route::Admin
        );
        assert_eq!(
            resolve_destination(true, Some(&p), Some(&prof), Route::Root),
            Route::Admin
        );
    }

    #[test]
    fn admin_area_requires_admin_role() {
        let p = progress(true, true, true);
        let user = profile(true, Role::User);
        let admin = profile(true, Role::Admin);
        for route in [Route::Admin, Route::AdminConfig, Route::AdminUsers, Route::Data] {
            assert_eq!(
                resolve_destination(true, Some(&p), Some(&user), route),
                Route::Dashboard,
                "{route} should bounce a non-admin to the dashboard"
            );
            assert_eq!(
                resolve_destination(true, Some(&p), None, route),
                Route::Dashboard
            );
            assert_eq!(
                resolve_destination(true, Some(&p), Some(&admin), route),
                route,
                "{route} should let an admin stay"
            );
        }
    }

    #[test]
    fn auth_pages_bounce_authenticated_callers() {
        // Fresh signup, nothing completed: auth pages lead to step 1.
        assert_eq!(
            resolve_destination(true, None, None, Route::Login),
            Route::Step1
        );
        assert_eq!(
            resolve_destination(true, None, None, Route::Signup),
            Route::Step1
        );

        // Completed admin: auth pages lead to the admin dashboard.
        let p = progress(true, true, true);
        let prof = profile(true, Role::Admin);
        assert_eq!(
            resolve_destination(true, Some(&p), Some(&prof), Route::Signup),
            Route::Admin
        );
    }
}
