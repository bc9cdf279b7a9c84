//! Routing
//!
//! The route table, the guard that decides whether a route may render for
//! the current session, and the navigation bar model.
//!
//! The guard is a pure function over already-resolved session state; it
//! never retries or waits.

use std::fmt;

/// Every view the client exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Upload,
    Results,
    HealthMetrics,
    Profile,
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Everyone, regardless of session
    Open,
    /// Only visitors without a session (login, register)
    PublicOnly,
    /// Only signed-in users
    Protected,
}

/// The part of the session the guard looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthStatus {
    pub is_authenticated: bool,
    /// Initial session resolution still running
    pub loading: bool,
}

impl AuthStatus {
    pub fn signed_in() -> Self {
        Self {
            is_authenticated: true,
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            is_authenticated: false,
            loading: false,
        }
    }

    pub fn resolving() -> Self {
        Self {
            is_authenticated: false,
            loading: true,
        }
    }
}

/// Outcome of guarding one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Show the spinner until the session resolves
    Loading,
    Redirect(Route),
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Landing,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Upload,
        Route::Results,
        Route::HealthMetrics,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Upload => "/upload",
            Route::Results => "/results",
            Route::HealthMetrics => "/health-metrics",
            Route::Profile => "/profile",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Landing => Access::Open,
            Route::Login | Route::Register => Access::PublicOnly,
            Route::Dashboard
            | Route::Upload
            | Route::Results
            | Route::HealthMetrics
            | Route::Profile => Access::Protected,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Home",
            Route::Login => "Sign In",
            Route::Register => "Sign Up",
            Route::Dashboard => "Dashboard",
            Route::Upload => "Upload Data",
            Route::Results => "Results",
            Route::HealthMetrics => "Health Metrics",
            Route::Profile => "Profile",
        }
    }

    /// Match a path exactly (a trailing slash is ignored)
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decide whether `route` renders for `status`.
///
/// While the session is resolving, gated routes show the loading indicator
/// so neither branch flashes before the answer is known.
pub fn guard(route: Route, status: AuthStatus) -> GuardDecision {
    match route.access() {
        Access::Open => GuardDecision::Render,
        _ if status.loading => GuardDecision::Loading,
        Access::Protected if !status.is_authenticated => GuardDecision::Redirect(Route::Login),
        Access::PublicOnly if status.is_authenticated => GuardDecision::Redirect(Route::Dashboard),
        _ => GuardDecision::Render,
    }
}

/// Where a navigation to a raw path ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The route finally rendered (or waited on)
    pub route: Route,
    pub loading: bool,
    /// Redirect hops taken on the way, in order
    pub redirects: Vec<Route>,
}

/// Resolve a path through the route table and the guard, following redirects.
///
/// Unknown paths redirect to `/`.
pub fn navigate(path: &str, status: AuthStatus) -> Navigation {
    let mut redirects = Vec::new();
    let mut route = match Route::parse(path) {
        Some(route) => route,
        None => {
            tracing::debug!(path, "Unmatched path, redirecting to /");
            redirects.push(Route::Landing);
            Route::Landing
        }
    };

    // Login and dashboard are never both redirect targets for the same status
    for _ in 0..Route::ALL.len() {
        match guard(route, status) {
            GuardDecision::Render => break,
            GuardDecision::Loading => {
                return Navigation {
                    route,
                    loading: true,
                    redirects,
                }
            }
            GuardDecision::Redirect(next) => {
                redirects.push(next);
                route = next;
            }
        }
    }

    Navigation {
        route,
        loading: false,
        redirects,
    }
}

// ============================================
// Navigation bar
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub active: bool,
}

/// What the navigation bar shows for a session and current path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    /// Where the brand logo links to
    pub brand_target: Route,
    pub items: Vec<NavItem>,
    pub show_logout: bool,
    /// Login / Sign Up buttons
    pub show_auth_links: bool,
}

const MEMBER_LINKS: [(Route, &str); 4] = [
    (Route::Dashboard, "Dashboard"),
    (Route::Upload, "Upload Data"),
    (Route::HealthMetrics, "Health Metrics"),
    (Route::Profile, "Profile"),
];

impl NavBar {
    pub fn for_status(status: AuthStatus, current_path: &str) -> Self {
        let current = Route::parse(current_path);

        if status.is_authenticated {
            NavBar {
                brand_target: Route::Dashboard,
                items: MEMBER_LINKS
                    .iter()
                    .map(|(route, label)| NavItem {
                        route: *route,
                        label,
                        active: current == Some(*route),
                    })
                    .collect(),
                show_logout: true,
                show_auth_links: false,
            }
        } else {
            NavBar {
                brand_target: Route::Landing,
                items: Vec::new(),
                show_logout: false,
                show_auth_links: current != Some(Route::Landing),
            }
        }
    }
}
