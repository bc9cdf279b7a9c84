//! Form checks run before any request is sent.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::session::{LoginRequest, RegisterRequest};

/// Minimum strength score a new password needs
pub const MIN_PASSWORD_SCORE: u8 = 3;

/// Validation errors. `Display` is the inline form message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password is too weak. Use at least 8 characters with mixed case and numbers.")]
    WeakPassword,

    #[error("Unknown profile field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Password strength, 0..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PasswordStrength(u8);

impl PasswordStrength {
    pub fn score(&self) -> u8 {
        self.0
    }

    pub fn is_acceptable(&self) -> bool {
        self.0 >= MIN_PASSWORD_SCORE
    }

    /// Meter segment color
    pub fn meter_color(&self) -> &'static str {
        match self.0 {
            0..=2 => "#ff3d3d",
            3 => "#ffb800",
            _ => "#00d68f",
        }
    }
}

struct StrengthRules {
    lower: Regex,
    upper: Regex,
    digit: Regex,
    symbol: Regex,
}

fn rules() -> &'static StrengthRules {
    static RULES: OnceLock<StrengthRules> = OnceLock::new();
    RULES.get_or_init(|| StrengthRules {
        lower: Regex::new(r"[a-z]").expect("static pattern"),
        upper: Regex::new(r"[A-Z]").expect("static pattern"),
        digit: Regex::new(r"[0-9]").expect("static pattern"),
        symbol: Regex::new(r"[$@#&!]").expect("static pattern"),
    })
}

/// One point each for: length >= 8, a lowercase letter, an uppercase
/// letter, a digit, a symbol from `$@#&!`.
pub fn password_strength(password: &str) -> PasswordStrength {
    let rules = rules();
    let checks = [
        password.chars().count() >= 8,
        rules.lower.is_match(password),
        rules.upper.is_match(password),
        rules.digit.is_match(password),
        rules.symbol.is_match(password),
    ];

    PasswordStrength(checks.iter().filter(|&&passed| passed).count() as u8)
}

/// Sign-up form as typed
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn strength(&self) -> PasswordStrength {
        password_strength(&self.password)
    }

    /// Check the form and build the request body.
    ///
    /// Mismatch is reported before weakness.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        require("Username", &self.username)?;
        require("Email", &self.email)?;
        require("Password", &self.password)?;

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        if !self.strength().is_acceptable() {
            return Err(ValidationError::WeakPassword);
        }

        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        require("Email", &self.email)?;
        require("Password", &self.password)?;

        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            username: "johndoe".to_string(),
            email: "john@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_strength_points() {
        assert_eq!(password_strength("").score(), 0);
        assert_eq!(password_strength("abc").score(), 1);
        assert_eq!(password_strength("abcdefgh").score(), 2);
        assert_eq!(password_strength("Abcdefgh").score(), 3);
        assert_eq!(password_strength("Abcdefg1").score(), 4);
        assert_eq!(password_strength("Abcdef1!").score(), 5);
        // Symbols outside the set don't count
        assert_eq!(password_strength("%%%%%%%%").score(), 1);
    }

    #[test]
    fn test_meter_colors() {
        assert_eq!(password_strength("abcdefgh").meter_color(), "#ff3d3d");
        assert_eq!(password_strength("Abcdefgh").meter_color(), "#ffb800");
        assert_eq!(password_strength("Abcdefg1").meter_color(), "#00d68f");
    }

    #[test]
    fn test_mismatch_checked_first() {
        // Weak and mismatched: mismatch wins
        assert_eq!(form("abc", "abd").validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn test_weak_password_blocked() {
        let err = form("abcdefgh", "abcdefgh").validate().unwrap_err();
        assert_eq!(err, ValidationError::WeakPassword);
        assert_eq!(
            err.to_string(),
            "Password is too weak. Use at least 8 characters with mixed case and numbers."
        );
    }

    #[test]
    fn test_score_three_is_enough() {
        let request = form("Abcdefgh", "Abcdefgh").validate().unwrap();
        assert_eq!(request.username, "johndoe");
        assert_eq!(request.password, "Abcdefgh");
    }

    #[test]
    fn test_required_fields() {
        let mut f = form("Abcdefg1", "Abcdefg1");
        f.username = "  ".to_string();
        assert_eq!(f.validate(), Err(ValidationError::Required("Username")));

        let login = LoginForm {
            email: "a@b.c".to_string(),
            password: String::new(),
        };
        assert_eq!(login.validate(), Err(ValidationError::Required("Password")));
    }

    #[test]
    fn test_login_form_trims_email() {
        let login = LoginForm {
            email: " a@b.c ".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(login.validate().unwrap().email, "a@b.c");
    }
}
