//! Session State
//!
//! The signed-in user as a reactive signal, plus toast messages. Every
//! session change goes through [`AppState`].

use leptos::*;

use aura::routing::AuthStatus;
use aura::session::{
    rejects_credential, ProfileFields, SessionState, LOGIN_FALLBACK_ERROR, PROFILE_UPDATE_ERROR,
    REGISTER_FALLBACK_ERROR,
};
use aura::validation::{LoginForm, RegistrationForm};

use crate::api;

/// Application state provided to all components
#[derive(Clone, Copy)]
pub struct AppState {
    pub session: RwSignal<SessionState>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide app state to the component tree and start resolving the
/// saved session
pub fn provide_app_state() -> AppState {
    let state = AppState {
        session: create_rw_signal(SessionState::Initializing),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };
    provide_context(state);
    state.restore();
    state
}

pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

impl AppState {
    /// What the route guard sees
    pub fn status(&self) -> AuthStatus {
        self.session.with(|s| s.status())
    }

    /// Resolve the startup session from the saved token.
    ///
    /// A token the auth API rejects is removed; when the API cannot be
    /// reached the token is kept for the next load.
    fn restore(self) {
        let Some(token) = api::load_token() else {
            self.session.update(|s| s.resolve(None));
            return;
        };

        spawn_local(async move {
            match api::current_user(&token).await {
                Ok(user) => self.session.update(|s| s.resolve(Some(user))),
                Err(e) if e.status.map(rejects_credential).unwrap_or(false) => {
                    web_sys::console::log_1(&format!("Saved session rejected: {}", e.message).into());
                    api::clear_token();
                    self.session.update(|s| s.resolve(None));
                }
                Err(e) => {
                    web_sys::console::warn_1(
                        &format!("Could not verify saved session: {}", e.message).into(),
                    );
                    self.session.update(|s| s.resolve(None));
                }
            }
        });
    }

    /// Sign in. Errors are the message to show on the form.
    pub async fn login(self, form: LoginForm) -> Result<(), String> {
        let request = form.validate().map_err(|e| e.to_string())?;
        let response = api::login(&request, LOGIN_FALLBACK_ERROR).await?;

        api::save_token(&response.token);
        self.session.update(|s| s.sign_in(response.user));
        Ok(())
    }

    /// Register; form checks run before any request
    pub async fn register(self, form: RegistrationForm) -> Result<(), String> {
        let request = form.validate().map_err(|e| e.to_string())?;
        let response = api::register(&request, REGISTER_FALLBACK_ERROR).await?;

        api::save_token(&response.token);
        self.session.update(|s| s.sign_in(response.user));
        Ok(())
    }

    pub async fn update_profile(self, fields: ProfileFields) -> Result<(), String> {
        let token = api::load_token().ok_or_else(|| PROFILE_UPDATE_ERROR.to_string())?;
        let user = api::update_profile(&token, &fields, PROFILE_UPDATE_ERROR)
            .await
            .map_err(|_| PROFILE_UPDATE_ERROR.to_string())?;

        let mut outcome = Ok(());
        self.session.update(|s| outcome = s.update(user).map_err(|e| e.to_string()));
        outcome
    }

    pub fn logout(self) {
        self.session.update(|s| s.clear());
        api::clear_token();
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
