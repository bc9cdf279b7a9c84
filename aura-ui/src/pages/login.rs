//! Login Page

use leptos::*;
use leptos_router::*;

use aura::routing::Route as Page;
use aura::validation::LoginForm;

use crate::components::InlineLoading;
use crate::state::use_app_state;

#[component]
pub fn Login() -> impl IntoView {
    let state = use_app_state();
    let navigate = use_navigate();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        set_error.set(None);
        set_submitting.set(true);

        let navigate = navigate.clone();
        spawn_local(async move {
            match state.login(form).await {
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
                    <h1 class="text-3xl font-bold">"Welcome Back"</h1>
                    <p class="text-gray-400 mt-1">"Sign in to your AURA account"</p>
                </div>

                {move || error.get().map(|message| view! {
                    <div class="bg-[#ff3d3d]/10 border border-[#ff3d3d] text-[#ff3d3d] rounded-lg px-4 py-3 text-sm">
                        {message}
                    </div>
                })}

                <Field label="Email" kind="email" value=email set_value=set_email />
                <Field label="Password" kind="password" value=password set_value=set_password />

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full py-3 bg-[#0077cc] hover:bg-[#1a9bff] disabled:opacity-50 rounded-lg font-medium flex items-center justify-center space-x-2"
                >
                    {move || submitting.get().then(|| view! { <InlineLoading /> })}
                    <span>{move || if submitting.get() { "Signing in..." } else { "Sign In" }}</span>
                </button>

                <p class="text-center text-sm text-gray-400">
                    "Don't have an account? "
                    <A href=Page::Register.path() class="text-[#1a9bff] hover:underline">"Sign up"</A>
                </p>
            </form>
        </div>
    }
}

/// Labelled text input bound to a signal
#[component]
pub(crate) fn Field(
    label: &'static str,
    #[prop(default = "text")]
    kind: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-400 mb-2">{label}</label>
            <input
                type=kind
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
                class="w-full bg-[#0a0e1a] rounded-lg px-4 py-3 border border-[#1a2744] focus:border-[#0077cc] focus:outline-none"
            />
        </div>
    }
}
