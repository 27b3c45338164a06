//! Shape validators for usernames and emails.
//!
//! Each validator answers a single yes/no question. The registration guard
//! decides which rejection message a caller sees.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classifier::classify;
use crate::sanitizer::{trim_low, SanitizationError, SanitizationErrorKind, Sanitizer};
use crate::{Tainted, Verified};

static USERNAME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,50}$").expect("valid username pattern"));

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Returns `true` if `username` is present, clean, and 3-50 characters of
/// letters, digits, underscore or hyphen.
///
/// # Examples
///
/// ```
/// use task_guard::is_valid_username;
///
/// assert!(is_valid_username(Some("john_doe123")));
/// assert!(!is_valid_username(Some("admin'--")));
/// assert!(!is_valid_username(None));
/// ```
pub fn is_valid_username(username: Option<&str>) -> bool {
    is_valid_field(username, &USERNAME_SHAPE)
}

/// Returns `true` if `email` is present, clean, and shaped `local@domain.tld`.
pub fn is_valid_email(email: Option<&str>) -> bool {
    is_valid_field(email, &EMAIL_SHAPE)
}

fn is_valid_field(value: Option<&str>, shape: &Regex) -> bool {
    let Some(value) = value else {
        return false;
    };
    if trim_low(value).is_empty() {
        return false;
    }
    if !classify(Some(value)).is_clean() {
        return false;
    }
    shape.is_match(trim_low(value))
}

/// An identity field checked at registration.
///
/// As a [`Sanitizer`], promotes an already sanitized value to
/// `Verified<String>` if it passes the field's validator.
///
/// # Examples
///
/// ```
/// use task_guard::{IdentityField, Sanitizer, Tainted};
///
/// let verified = IdentityField::Username.sanitize(Tainted::new("john_doe".to_string())).unwrap();
/// assert_eq!(verified.as_ref(), "john_doe");
///
/// let err = IdentityField::Email.sanitize(Tainted::new("user@".to_string())).unwrap_err();
/// assert_eq!(err.message(), "Email format is invalid");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    /// Account username.
    Username,
    /// Contact email.
    Email,
}

impl IdentityField {
    /// Message used when the raw value looks like an injection attempt.
    pub fn malicious_message(&self) -> &'static str {
        match self {
            Self::Username => "Username contains invalid characters or potential security threats",
            Self::Email => "Email contains invalid characters or potential security threats",
        }
    }

    /// Message used when the sanitized value has the wrong shape.
    pub fn invalid_message(&self) -> &'static str {
        match self {
            Self::Username => {
                "Username must be 3-50 characters and contain only letters, numbers, underscores, and hyphens"
            }
            Self::Email => "Email format is invalid",
        }
    }

    fn is_valid(&self, value: &str) -> bool {
        match self {
            Self::Username => is_valid_username(Some(value)),
            Self::Email => is_valid_email(Some(value)),
        }
    }
}

impl Sanitizer<String> for IdentityField {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let value = input.into_inner();
        if !self.is_valid(&value) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::InvalidFormat,
                self.invalid_message(),
            ));
        }
        Ok(Verified::new_unchecked(trim_low(&value).to_string()))
    }
}
