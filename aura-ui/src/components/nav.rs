//! Navigation Component
//!
//! Header bar. Signed-in users get the app links and a logout button;
//! visitors get Login / Sign Up except on the landing page.

use leptos::*;
use leptos_router::*;

use aura::routing::{NavBar, Route as Page};

use crate::state::use_app_state;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_app_state();
    let location = use_location();
    let navigate = use_navigate();

    let bar = create_memo(move |_| NavBar::for_status(state.status(), &location.pathname.get()));

    let on_logout = move |_| {
        state.logout();
        navigate(Page::Landing.path(), Default::default());
    };

    view! {
        <nav class="bg-[#0f1629] border-b border-[#1a2744]">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href=move || bar.get().brand_target.path().to_string() class="flex items-center space-x-3">
                        <span class="text-2xl">"🧬"</span>
                        <span class="text-xl font-bold text-white tracking-wider">"AURA"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        {move || {
                            bar.get()
                                .items
                                .into_iter()
                                .map(|item| view! { <NavLink href=item.route.path() label=item.label active=item.active /> })
                                .collect_view()
                        }}

                        <Show when=move || bar.get().show_logout>
                            <button
                                on:click=on_logout.clone()
                                class="ml-2 px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-red-600/30 transition-colors"
                            >
                                "Logout"
                            </button>
                        </Show>

                        <Show when=move || bar.get().show_auth_links>
                            <A href=Page::Login.path() class="px-4 py-2 rounded-lg text-gray-300 hover:text-white">
                                "Login"
                            </A>
                            <A
                                href=Page::Register.path()
                                class="px-4 py-2 rounded-lg bg-[#0077cc] hover:bg-[#1a9bff] text-white font-medium"
                            >
                                "Sign Up"
                            </A>
                        </Show>
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(href: &'static str, label: &'static str, active: bool) -> impl IntoView {
    let class = if active {
        "px-4 py-2 rounded-lg bg-[#1a2744] text-white"
    } else {
        "px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-[#1a2744] transition-colors"
    };

    view! {
        <A href=href class=class>
            {label}
        </A>
    }
}
