//! Loading Component
//!
//! Spinners shown while the session resolves or data loads.

use leptos::*;

/// Full-page loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] space-y-4">
            <div class="loading-spinner w-10 h-10" />
            <p class="text-gray-400 text-sm tracking-wider">"Loading..."</p>
        </div>
    }
}

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}
