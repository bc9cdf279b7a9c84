//! Owner of the native session.

use std::sync::Arc;

use super::{
    ProfileFields, Session, SessionError, SessionState, LOGIN_FALLBACK_ERROR, PROFILE_UPDATE_ERROR,
    REGISTER_FALLBACK_ERROR,
};
use crate::client::{AuthApi, ClientError};
use crate::persist::CredentialStore;
use crate::validation::{LoginForm, RegistrationForm};

/// Holds the session and performs every change to it
pub struct SessionManager {
    auth: Arc<dyn AuthApi>,
    credentials: Arc<dyn CredentialStore>,
    state: SessionState,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            auth,
            credentials,
            state: SessionState::Initializing,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&Session> {
        self.state.user()
    }

    /// Resolve the startup session from the persisted credential.
    ///
    /// A credential the auth service rejects is removed. Any other failure
    /// leaves this run signed out but keeps the credential for next time.
    pub async fn restore(&mut self) -> &SessionState {
        let token = match self.credentials.load_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read saved credential: {}", e);
                None
            }
        };

        let Some(token) = token else {
            tracing::debug!("No saved credential");
            self.state.resolve(None);
            return &self.state;
        };

        match self.auth.current_user(&token).await {
            Ok(user) => {
                tracing::info!(user = %user.username, "Session restored");
                self.state.resolve(Some(user));
            }
            Err(e) if e.is_auth_rejection() => {
                tracing::info!("Saved credential rejected, signing out: {}", e);
                if let Err(e) = self.credentials.clear_token() {
                    tracing::warn!("Could not remove expired credential: {}", e);
                }
                self.state.resolve(None);
            }
            Err(e) => {
                tracing::warn!("Could not verify saved credential, keeping it: {}", e);
                self.state.resolve(None);
            }
        }

        &self.state
    }

    pub async fn login(&mut self, form: &LoginForm) -> Result<&Session, SessionError> {
        let request = form.validate()?;

        let response = self
            .auth
            .login(&request)
            .await
            .map_err(|e| auth_failure(e, LOGIN_FALLBACK_ERROR))?;

        self.credentials.save_token(&response.token)?;
        tracing::info!(user = %response.user.username, "Signed in");
        self.state.sign_in(response.user);
        self.signed_in_user()
    }

    /// Register a new account. Form checks run before any request.
    pub async fn register(&mut self, form: &RegistrationForm) -> Result<&Session, SessionError> {
        let request = form.validate()?;

        let response = self
            .auth
            .register(&request)
            .await
            .map_err(|e| auth_failure(e, REGISTER_FALLBACK_ERROR))?;

        self.credentials.save_token(&response.token)?;
        tracing::info!(user = %response.user.username, "Registered and signed in");
        self.state.sign_in(response.user);
        self.signed_in_user()
    }

    pub async fn update_profile(&mut self, fields: &ProfileFields) -> Result<&Session, SessionError> {
        if !self.state.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        let token = self
            .credentials
            .load_token()?
            .ok_or(SessionError::NotAuthenticated)?;

        let user = self.auth.update_profile(&token, fields).await.map_err(|e| {
            tracing::warn!("Profile update failed: {}", e);
            SessionError::Auth(PROFILE_UPDATE_ERROR.to_string())
        })?;

        self.state.update(user)?;
        tracing::info!("Profile updated");
        self.signed_in_user()
    }

    /// Sign out locally. The session is cleared even if the credential
    /// file cannot be removed.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.state.clear();
        tracing::info!("Signed out");
        self.credentials.clear_token()?;
        Ok(())
    }

    fn signed_in_user(&self) -> Result<&Session, SessionError> {
        self.state.user().ok_or(SessionError::NotAuthenticated)
    }
}

fn auth_failure(error: ClientError, fallback: &str) -> SessionError {
    tracing::warn!("Auth request failed: {}", error);
    SessionError::Auth(error.server_message().unwrap_or_else(|| fallback.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::session::{AuthResponse, LoginRequest, RegisterRequest};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockAuth {
        calls: AtomicUsize,
    }

    fn user(name: &str) -> Session {
        Session {
            id: "u1".to_string(),
            username: name.to_string(),
            email: format!("{}@example.com", name),
            profile: ProfileFields::default(),
        }
    }

    #[async_trait]
    impl AuthApi for MockAuth {
        async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match request.password.as_str() {
                "Secret123" => Ok(AuthResponse {
                    token: "tok-1".to_string(),
                    user: user("jane"),
                }),
                "server-down" => Err(ClientError::Unavailable),
                _ => Err(ClientError::Api {
                    status: 401,
                    message: Some("Wrong password".to_string()),
                }),
            }
        }

        async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if request.username == "taken" {
                return Err(ClientError::Api {
                    status: 409,
                    message: None,
                });
            }
            Ok(AuthResponse {
                token: "tok-new".to_string(),
                user: user(&request.username),
            })
        }

        async fn current_user(&self, token: &str) -> Result<Session, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match token {
                "tok-1" => Ok(user("jane")),
                "tok-offline" => Err(ClientError::Unavailable),
                "tok-500" => Err(ClientError::Api {
                    status: 500,
                    message: None,
                }),
                _ => Err(ClientError::Api {
                    status: 401,
                    message: Some("Token expired".to_string()),
                }),
            }
        }

        async fn update_profile(&self, token: &str, fields: &ProfileFields) -> Result<Session, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if token != "tok-1" {
                return Err(ClientError::Api {
                    status: 401,
                    message: None,
                });
            }
            let mut updated = user("jane");
            updated.profile = fields.clone();
            Ok(updated)
        }
    }

    fn manager() -> (SessionManager, Arc<MockAuth>, Arc<MemoryStore>) {
        let auth = Arc::new(MockAuth::default());
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(auth.clone(), store.clone());
        (manager, auth, store)
    }

    fn login_form(password: &str) -> LoginForm {
        LoginForm {
            email: "jane@example.com".to_string(),
            password: password.to_string(),
        }
    }

    fn registration(username: &str, password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.to_string(),
            email: "new@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_restore_without_credential() {
        let (mut manager, auth, _) = manager();
        assert!(manager.state().is_loading());

        manager.restore().await;
        assert_eq!(manager.state(), &SessionState::Anonymous);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_restore_with_valid_credential() {
        let (mut manager, _, store) = manager();
        store.save_token("tok-1").unwrap();

        manager.restore().await;
        assert_eq!(manager.user().unwrap().username, "jane");
    }

    #[tokio::test]
    async fn test_restore_expired_credential_is_removed() {
        let (mut manager, _, store) = manager();
        store.save_token("stale").unwrap();

        manager.restore().await;
        assert_eq!(manager.state(), &SessionState::Anonymous);
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_keeps_credential_when_service_unreachable() {
        for token in ["tok-offline", "tok-500"] {
            let (mut manager, _, store) = manager();
            store.save_token(token).unwrap();

            manager.restore().await;
            assert_eq!(manager.state(), &SessionState::Anonymous);
            assert_eq!(store.load_token().unwrap().as_deref(), Some(token));
        }
    }

    #[tokio::test]
    async fn test_login_persists_credential() {
        let (mut manager, _, store) = manager();
        manager.restore().await;

        let user = manager.login(&login_form("Secret123")).await.unwrap();
        assert_eq!(user.username, "jane");
        assert_eq!(store.load_token().unwrap().as_deref(), Some("tok-1"));
        assert!(manager.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_messages() {
        let (mut manager, _, store) = manager();
        manager.restore().await;

        let err = manager.login(&login_form("nope")).await.unwrap_err();
        assert_eq!(err.to_string(), "Wrong password");

        let err = manager.login(&login_form("server-down")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");

        assert_eq!(manager.state(), &SessionState::Anonymous);
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_checks_before_request() {
        let (mut manager, auth, _) = manager();
        manager.restore().await;

        let err = manager
            .register(&registration("newbie", "Abcdefg1", "Abcdefg2"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");

        let err = manager
            .register(&registration("newbie", "abcdefgh", "abcdefgh"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Password is too weak"));

        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_register_success_and_failure() {
        let (mut manager, _, store) = manager();
        manager.restore().await;

        let err = manager
            .register(&registration("taken", "Abcdefg1", "Abcdefg1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Registration failed. Please try again.");

        let user = manager
            .register(&registration("newbie", "Abcdefg1", "Abcdefg1"))
            .await
            .unwrap();
        assert_eq!(user.username, "newbie");
        assert_eq!(store.load_token().unwrap().as_deref(), Some("tok-new"));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let (mut manager, _, _) = manager();

        let mut fields = ProfileFields::default();
        fields.set("fullname", "Jane Doe").unwrap();

        assert!(matches!(
            manager.update_profile(&fields).await,
            Err(SessionError::NotAuthenticated)
        ));

        manager.login(&login_form("Secret123")).await.unwrap();
        let user = manager.update_profile(&fields).await.unwrap();
        assert_eq!(user.profile.fullname.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_update_profile_failure_keeps_session() {
        let (mut manager, _, store) = manager();
        manager.login(&login_form("Secret123")).await.unwrap();
        store.save_token("revoked").unwrap();

        let err = manager
            .update_profile(&ProfileFields::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to update profile");
        assert_eq!(manager.user().unwrap().username, "jane");
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (mut manager, _, store) = manager();
        manager.login(&login_form("Secret123")).await.unwrap();

        manager.logout().unwrap();
        assert_eq!(manager.state(), &SessionState::Anonymous);
        assert_eq!(store.load_token().unwrap(), None);
    }
}
