//! Profile Page
//!
//! Personal details edited through the auth API, plus the API endpoints
//! this browser talks to.

use leptos::*;

use aura::session::{ProfileFields, BLOOD_GROUP_OPTIONS, GENDER_OPTIONS, PROFILE_UPDATE_SUCCESS};

use crate::api;
use crate::state::use_app_state;

#[component]
pub fn Profile() -> impl IntoView {
    view! {
        <div class="container mx-auto px-4 py-8 max-w-3xl space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Profile"</h1>
                <p class="text-gray-400 mt-1">"Manage your personal information"</p>
            </div>
            <PersonalDetails />
            <ApiSettings />
        </div>
    }
}

#[component]
fn PersonalDetails() -> impl IntoView {
    let state = use_app_state();

    let current = state
        .session
        .with_untracked(|s| s.user().cloned())
        .map(|u| (u.username, u.email, u.profile))
        .unwrap_or_default();
    let (username, email, profile) = current;

    // One signal per editable field, seeded from the session
    let fields: Vec<(&'static str, RwSignal<String>)> = ProfileFields::KEYS
        .iter()
        .map(|key| (*key, create_rw_signal(profile.get(key))))
        .collect();
    let fields = store_value(fields);
    let field = move |key: &str| {
        fields.with_value(|f| {
            f.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, signal)| *signal)
        })
    };

    let (saving, set_saving) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let mut updated = profile_snapshot(state);
        let edits = fields.with_value(|f| {
            f.iter()
                .map(|(key, signal)| (*key, signal.get_untracked()))
                .collect::<Vec<_>>()
        });
        for (key, value) in edits {
            if let Err(e) = updated.set(key, &value) {
                state.show_error(&e.to_string());
                return;
            }
        }

        set_saving.set(true);
        spawn_local(async move {
            match state.update_profile(updated).await {
                Ok(()) => state.show_success(PROFILE_UPDATE_SUCCESS),
                Err(message) => state.show_error(&message),
            }
            set_saving.set(false);
        });
    };

    view! {
        <form on:submit=on_submit class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744] space-y-5">
            <div class="grid md:grid-cols-2 gap-4 text-sm">
                <div>
                    <p class="text-gray-500">"Username"</p>
                    <p class="font-medium">{username}</p>
                </div>
                <div>
                    <p class="text-gray-500">"Email"</p>
                    <p class="font-medium">{email}</p>
                </div>
            </div>

            <div class="grid md:grid-cols-2 gap-4">
                {field("fullname").map(|s| view! { <TextInput label="Full Name" value=s /> })}
                {field("dob").map(|s| view! { <TextInput label="Date of Birth" kind="date" value=s /> })}
                {field("gender").map(|s| view! { <SelectInput label="Gender" options=&GENDER_OPTIONS value=s /> })}
                {field("bloodgroup").map(|s| view! { <SelectInput label="Blood Group" options=&BLOOD_GROUP_OPTIONS value=s /> })}
                {field("height").map(|s| view! { <TextInput label="Height (cm)" kind="number" value=s /> })}
                {field("weight").map(|s| view! { <TextInput label="Weight (kg)" kind="number" value=s /> })}
            </div>

            <button
                type="submit"
                disabled=move || saving.get()
                class="px-6 py-3 bg-[#0077cc] hover:bg-[#1a9bff] disabled:opacity-50 rounded-lg font-medium"
            >
                {move || if saving.get() { "Saving..." } else { "Save Changes" }}
            </button>
        </form>
    }
}

/// Profile of the signed-in user, or an empty one
fn profile_snapshot(state: crate::state::AppState) -> ProfileFields {
    state
        .session
        .with_untracked(|s| s.user().map(|u| u.profile.clone()))
        .unwrap_or_default()
}

#[component]
fn TextInput(
    label: &'static str,
    #[prop(default = "text")]
    kind: &'static str,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-400 mb-2">{label}</label>
            <input
                type=kind
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                class="w-full bg-[#0a0e1a] rounded-lg px-4 py-3 border border-[#1a2744] focus:border-[#0077cc] focus:outline-none"
            />
        </div>
    }
}

#[component]
fn SelectInput(
    label: &'static str,
    options: &'static [&'static str],
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-400 mb-2">{label}</label>
            <select
                prop:value=move || value.get()
                on:change=move |ev| value.set(event_target_value(&ev))
                class="w-full bg-[#0a0e1a] rounded-lg px-4 py-3 border border-[#1a2744] focus:border-[#0077cc] focus:outline-none"
            >
                <option value="">"Select"</option>
                {options
                    .iter()
                    .map(|o| view! { <option value=*o selected=move || value.get() == *o>{*o}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}

/// Analysis and auth API base URLs, kept in local storage
#[component]
fn ApiSettings() -> impl IntoView {
    let state = use_app_state();

    let (analysis_url, set_analysis_url) = create_signal(api::get_analysis_base());
    let (auth_url, set_auth_url) = create_signal(api::get_auth_base());

    let save = move |_| {
        api::set_analysis_base(&analysis_url.get_untracked());
        api::set_auth_base(&auth_url.get_untracked());
        state.show_success("API URLs saved");
    };

    view! {
        <section class="bg-[#0f1629] rounded-xl p-6 border border-[#1a2744] space-y-4">
            <h2 class="text-xl font-semibold">"API Connection"</h2>
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Analysis API URL"</label>
                <input
                    type="text"
                    prop:value=move || analysis_url.get()
                    on:input=move |ev| set_analysis_url.set(event_target_value(&ev))
                    class="w-full bg-[#0a0e1a] rounded-lg px-4 py-3 border border-[#1a2744] focus:border-[#0077cc] focus:outline-none"
                />
            </div>
            <div>
                <label class="block text-sm text-gray-400 mb-2">"Auth API URL"</label>
                <input
                    type="text"
                    prop:value=move || auth_url.get()
                    on:input=move |ev| set_auth_url.set(event_target_value(&ev))
                    class="w-full bg-[#0a0e1a] rounded-lg px-4 py-3 border border-[#1a2744] focus:border-[#0077cc] focus:outline-none"
                />
            </div>
            <button
                on:click=save
                class="px-4 py-3 bg-[#0077cc] hover:bg-[#1a9bff] rounded-lg font-medium"
            >
                "Save"
            </button>
        </section>
    }
}
