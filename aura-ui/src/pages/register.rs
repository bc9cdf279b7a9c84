//! Registration Page
//!
//! Password strength is scored while typing. Mismatched or weak passwords
//! are rejected before any request.

use leptos::*;
use leptos_router::*;

use aura::routing::Route as Page;
use aura::validation::{password_strength, RegistrationForm};

use super::login::Field;
use crate::components::InlineLoading;
use crate::state::use_app_state;

const STRENGTH_LABELS: [&str; 6] = ["Very weak", "Very weak", "Weak", "Fair", "Good", "Strong"];

#[component]
pub fn Register() -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();

    let (username, set_username) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (submitting, set_submitting) = create_signal(false);

    let strength = create_memo(move |_| password_strength(&password.get()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let form = RegistrationForm {
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
        };
        set_error.set(None);
        set_submitting.set(true);

        let navigate = navigate.clone();
        spawn_local(async move {
            match state.register(form).await {
                Ok(()) => navigate(Page::Dashboard.path(), Default::default()),
                Err(message) => set_error.set(Some(message)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-[80vh] px-4">
            <form on:submit=on_submit class="w-full max-w-md bg-[#0f1629] rounded-xl p-8 border border-[#1a2744] space-y-5">
                <div class="text-center">
                    <h1 class="text-3xl font-bold">"Create Account"</h1>
                    <p class="text-gray-400 mt-1">"Start your genomic health journey"</p>
                </div>

                {move || error.get().map(|message| view! {
                    <div class="bg-[#ff3d3d]/10 border border-[#ff3d3d] text-[#ff3d3d] rounded-lg px-4 py-3 text-sm">
                        {message}
                    </div>
                })}

                <Field label="Username" value=username set_value=set_username />
                <Field label="Email" kind="email" value=email set_value=set_email />
                <Field label="Password" kind="password" value=password set_value=set_password />

                <Show when=move || !password.get().is_empty()>
                    <div class="space-y-1">
                        <div class="flex space-x-1">
                            {(1..=5u8)
                                .map(|segment| view! {
                                    <div
                                        class="h-1.5 flex-1 rounded-full"
                                        style=move || {
                                            let s = strength.get();
                                            let color = if segment <= s.score() { s.meter_color() } else { "#1a2744" };
                                            format!("background-color: {}", color)
                                        }
                                    />
                                })
                                .collect_view()}
                        </div>
                        <p class="text-xs" style=move || format!("color: {}", strength.get().meter_color())>
                            {move || STRENGTH_LABELS[strength.get().score() as usize]}
                        </p>
                    </div>
                </Show>

                <Field label="Confirm Password" kind="password" value=confirm set_value=set_confirm />

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full py-3 bg-[#0077cc] hover:bg-[#1a9bff] disabled:opacity-50 rounded-lg font-medium flex items-center justify-center space-x-2"
                >
                    {move || submitting.get().then(|| view! { <InlineLoading /> })}
                    <span>{move || if submitting.get() { "Creating account..." } else { "Sign Up" }}</span>
                </button>

                <p class="text-center text-sm text-gray-400">
                    "Already have an account? "
                    <A href=Page::Login.path() class="text-[#1a9bff] hover:underline">"Sign in"</A>
                </p>
            </form>
        </div>
    }
}
