//! Session State
//!
//! The authenticated identity and its lifecycle:
//!
//! ```text
//! Initializing -> Anonymous | Active(session) -> Active(updated)* -> Anonymous
//! ```
//!
//! Views read the session through [`SessionState`]; only the session owner
//! ([`SessionManager`] natively, the UI's session context in the browser)
//! changes it.

#[cfg(feature = "native")]
mod manager;

#[cfg(feature = "native")]
pub use manager::SessionManager;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::routing::AuthStatus;
use crate::validation::ValidationError;

/// Storage key of the bearer credential (browser `localStorage`)
pub const TOKEN_KEY: &str = "authToken";

pub const LOGIN_FALLBACK_ERROR: &str = "Invalid email or password";
pub const REGISTER_FALLBACK_ERROR: &str = "Registration failed. Please try again.";
pub const PROFILE_UPDATE_ERROR: &str = "Failed to update profile";
pub const PROFILE_UPDATE_SUCCESS: &str = "Profile updated successfully!";

/// Whether an auth response status means the saved credential is no
/// longer valid. Other failures leave the credential in place.
pub fn rejects_credential(status: u16) -> bool {
    matches!(status, 401 | 403)
}

pub const GENDER_OPTIONS: [&str; 3] = ["Male", "Female", "Other"];
pub const BLOOD_GROUP_OPTIONS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(alias = "_id", deserialize_with = "deserialize_id", default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

impl Session {
    /// Name for the dashboard greeting
    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            "User"
        } else {
            &self.username
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

/// Editable profile fields. Empty means unset; unset fields serialize as
/// `null` so a cleared value reaches the auth service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub fullname: Option<String>,
    /// ISO date (`YYYY-MM-DD`); the backend may send a full timestamp
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub bloodgroup: Option<String>,
    /// Centimetres
    #[serde(default)]
    pub height: Option<f64>,
    /// Kilograms
    #[serde(default)]
    pub weight: Option<f64>,
}

impl ProfileFields {
    pub const KEYS: [&'static str; 6] = ["fullname", "dob", "gender", "bloodgroup", "height", "weight"];

    /// Set one field from its text form. An empty value clears the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        let cleared = value.is_empty();

        match key {
            "fullname" => self.fullname = (!cleared).then(|| value.to_string()),
            "dob" => {
                if cleared {
                    self.dob = None;
                } else {
                    let date = parse_date(value).ok_or_else(|| ValidationError::InvalidValue {
                        field: "dob",
                        value: value.to_string(),
                    })?;
                    self.dob = Some(date.format("%Y-%m-%d").to_string());
                }
            }
            "gender" => self.gender = choice("gender", value, &GENDER_OPTIONS)?,
            "bloodgroup" => self.bloodgroup = choice("bloodgroup", value, &BLOOD_GROUP_OPTIONS)?,
            "height" => self.height = measurement("height", value)?,
            "weight" => self.weight = measurement("weight", value)?,
            other => return Err(ValidationError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Date of birth as a date, for the date input
    pub fn dob_date(&self) -> Option<NaiveDate> {
        self.dob.as_deref().and_then(parse_date)
    }

    /// Text form of a field, empty when unset
    pub fn get(&self, key: &str) -> String {
        match key {
            "fullname" => self.fullname.clone().unwrap_or_default(),
            "dob" => self
                .dob_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            "gender" => self.gender.clone().unwrap_or_default(),
            "bloodgroup" => self.bloodgroup.clone().unwrap_or_default(),
            "height" => self.height.map(|h| h.to_string()).unwrap_or_default(),
            "weight" => self.weight.map(|w| w.to_string()).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

/// Accepts `YYYY-MM-DD` or a timestamp starting with one
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn choice(
    field: &'static str,
    value: &str,
    options: &[&str],
) -> Result<Option<String>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(value))
        .map(|o| Some(o.to_string()))
        .ok_or_else(|| ValidationError::InvalidValue {
            field,
            value: value.to_string(),
        })
}

fn measurement(field: &'static str, value: &str) -> Result<Option<f64>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(Some(v)),
        _ => Err(ValidationError::InvalidValue {
            field,
            value: value.to_string(),
        }),
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Startup: the persisted credential has not been checked yet
    #[default]
    Initializing,
    Anonymous,
    Active(Session),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }

    pub fn user(&self) -> Option<&Session> {
        match self {
            SessionState::Active(session) => Some(session),
            _ => None,
        }
    }

    /// What the route guard sees
    pub fn status(&self) -> AuthStatus {
        AuthStatus {
            is_authenticated: self.is_authenticated(),
            loading: self.is_loading(),
        }
    }

    /// Finish startup resolution
    pub fn resolve(&mut self, session: Option<Session>) {
        *self = match session {
            Some(s) => SessionState::Active(s),
            None => SessionState::Anonymous,
        };
    }

    pub fn sign_in(&mut self, session: Session) {
        *self = SessionState::Active(session);
    }

    /// Replace the signed-in user after a profile update.
    pub fn update(&mut self, session: Session) -> Result<(), SessionError> {
        match self {
            SessionState::Active(current) => {
                *current = session;
                Ok(())
            }
            _ => Err(SessionError::NotAuthenticated),
        }
    }

    pub fn clear(&mut self) {
        *self = SessionState::Anonymous;
    }
}

// ============================================
// Auth API wire types
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful login or registration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Session,
}

/// Error body of the auth API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthErrorBody {
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<AuthErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Session operation errors. `Display` is the message shown on the form.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Auth(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not signed in")]
    NotAuthenticated,

    #[cfg(feature = "native")]
    #[error("Storage error: {0}")]
    Storage(#[from] crate::persist::StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(name: &str) -> Session {
        Session {
            id: "1".to_string(),
            username: name.to_string(),
            email: format!("{}@example.com", name),
            profile: ProfileFields::default(),
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut state = SessionState::default();
        assert!(state.is_loading());
        assert_eq!(state.status(), AuthStatus::resolving());

        state.resolve(None);
        assert_eq!(state.status(), AuthStatus::signed_out());

        state.sign_in(session("john"));
        assert_eq!(state.status(), AuthStatus::signed_in());
        assert_eq!(state.user().unwrap().username, "john");

        state.update(session("johnny")).unwrap();
        assert_eq!(state.user().unwrap().username, "johnny");

        state.clear();
        assert!(state.user().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_update_requires_session() {
        let mut state = SessionState::Anonymous;
        assert!(matches!(
            state.update(session("x")),
            Err(SessionError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_decode_user_with_profile() {
        let text = r#"{
            "_id": "65f0c2",
            "username": "jane",
            "email": "jane@example.com",
            "fullname": "Jane Doe",
            "dob": "1990-05-17T00:00:00.000Z",
            "bloodgroup": "O+",
            "height": 168
        }"#;
        let user: Session = serde_json::from_str(text).unwrap();
        assert_eq!(user.id, "65f0c2");
        assert_eq!(user.profile.fullname.as_deref(), Some("Jane Doe"));
        assert_eq!(user.profile.get("dob"), "1990-05-17");
        assert_eq!(user.profile.height, Some(168.0));
        assert_eq!(user.profile.weight, None);
    }

    #[test]
    fn test_numeric_id() {
        let user: Session = serde_json::from_str(r#"{"id": 42, "username": "a", "email": "b"}"#).unwrap();
        assert_eq!(user.id, "42");
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(session("").display_name(), "User");
        assert_eq!(session("john").display_name(), "john");
    }

    #[test]
    fn test_profile_set() {
        let mut fields = ProfileFields::default();
        fields.set("gender", "female").unwrap();
        fields.set("bloodgroup", "AB-").unwrap();
        fields.set("height", "172.5").unwrap();
        fields.set("dob", "1985-11-02").unwrap();

        assert_eq!(fields.gender.as_deref(), Some("Female"));
        assert_eq!(fields.bloodgroup.as_deref(), Some("AB-"));
        assert_eq!(fields.height, Some(172.5));
        assert_eq!(fields.dob_date(), NaiveDate::from_ymd_opt(1985, 11, 2));

        fields.set("height", "").unwrap();
        assert_eq!(fields.height, None);
    }

    #[test]
    fn test_profile_set_rejects_bad_values() {
        let mut fields = ProfileFields::default();
        assert!(matches!(
            fields.set("bloodgroup", "C+"),
            Err(ValidationError::InvalidValue { field: "bloodgroup", .. })
        ));
        assert!(fields.set("weight", "-3").is_err());
        assert!(fields.set("dob", "last year").is_err());
        assert_eq!(
            fields.set("shoe_size", "42"),
            Err(ValidationError::UnknownField("shoe_size".to_string()))
        );
    }

    #[test]
    fn test_profile_body_carries_cleared_fields() {
        let user: Session = serde_json::from_str(
            r#"{"id": 1, "username": "jane", "email": "j@x.io", "fullname": "Jane Doe", "weight": 61}"#,
        )
        .unwrap();
        let mut fields = user.profile.clone();
        fields.set("fullname", "").unwrap();

        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "fullname": null,
                "dob": null,
                "gender": null,
                "bloodgroup": null,
                "height": null,
                "weight": 61.0
            })
        );
    }

    #[test]
    fn test_only_auth_statuses_reject_credential() {
        assert!(rejects_credential(401));
        assert!(rejects_credential(403));
        assert!(!rejects_credential(500));
        assert!(!rejects_credential(503));
        assert!(!rejects_credential(404));
    }

    #[test]
    fn test_auth_error_message() {
        assert_eq!(
            AuthErrorBody::message_from(r#"{"message": "User already exists"}"#).as_deref(),
            Some("User already exists")
        );
        assert_eq!(AuthErrorBody::message_from("Bad Gateway"), None);
    }
}
