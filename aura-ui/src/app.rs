//! App Root Component
//!
//! Routing, the route guard and global providers.

use leptos::*;
use leptos_router::*;

use aura::routing::{self, guard, GuardDecision};

use crate::components::{Loading, Nav, Toast};
use crate::pages::{Dashboard, HealthMetrics, Landing, Login, Profile, Register, Results, Upload};
use crate::state::{provide_app_state, use_app_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_app_state();

    view! {
        <Router>
            <div class="min-h-screen bg-[#0a0e1a] text-white flex flex-col">
                <Nav />

                <main class="flex-1">
                    <Routes>
                        <Route path="/" view=Landing />
                        <Route
                            path="/login"
                            view=|| view! { <Guarded page=routing::Route::Login><Login /></Guarded> }
                        />
                        <Route
                            path="/register"
                            view=|| view! { <Guarded page=routing::Route::Register><Register /></Guarded> }
                        />
                        <Route
                            path="/dashboard"
                            view=|| view! { <Guarded page=routing::Route::Dashboard><Dashboard /></Guarded> }
                        />
                        <Route
                            path="/upload"
                            view=|| view! { <Guarded page=routing::Route::Upload><Upload /></Guarded> }
                        />
                        <Route
                            path="/results"
                            view=|| view! { <Guarded page=routing::Route::Results><Results /></Guarded> }
                        />
                        <Route
                            path="/health-metrics"
                            view=|| view! { <Guarded page=routing::Route::HealthMetrics><HealthMetrics /></Guarded> }
                        />
                        <Route
                            path="/profile"
                            view=|| view! { <Guarded page=routing::Route::Profile><Profile /></Guarded> }
                        />
                        <Route path="/*any" view=|| view! { <Redirect path="/" /> } />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// Renders `children` only when the guard allows `page` for the current
/// session; otherwise a loading indicator or a redirect
#[component]
fn Guarded(page: routing::Route, children: ChildrenFn) -> impl IntoView {
    let state = use_app_state();
    let decision = create_memo(move |_| guard(page, state.status()));

    move || match decision.get() {
        GuardDecision::Render => children().into_view(),
        GuardDecision::Loading => view! { <Loading /> }.into_view(),
        GuardDecision::Redirect(target) => view! { <Redirect path=target.path() /> }.into_view(),
    }
}
