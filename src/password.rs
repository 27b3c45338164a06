//! Password policy applied while binding a registration request.
//!
//! Passwords are hashed before storage and are never interpolated into a
//! query or rendered as markup, so the policy only rejects script markers.
//! SQL-looking content is accepted.

use std::fmt;

use crate::classifier::contains_script_injection;
use crate::config::GuardConfig;

/// The password rule that rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    /// Absent or whitespace only.
    Empty,
    /// Contains a script-injection marker.
    InvalidCharacters,
    /// Shorter than the minimum or longer than the maximum.
    Length,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::InvalidCharacters => write!(f, "invalid characters"),
            Self::Length => write!(f, "length"),
        }
    }
}

/// A password policy rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyViolation {
    rule: PasswordRule,
    message: String,
}

impl PolicyViolation {
    fn new(rule: PasswordRule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }

    /// Returns the rule that failed.
    pub fn rule(&self) -> PasswordRule {
        self.rule
    }

    /// Returns the caller-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PolicyViolation {}

/// Length bounds and content rules for passwords.
///
/// Rules are checked in order and the first failure wins: empty, script
/// markers, then length.
///
/// # Examples
///
/// ```
/// use task_guard::{PasswordPolicy, PasswordRule};
///
/// let policy = PasswordPolicy::default();
/// assert!(policy.check(Some("ValidP@ss123")).is_ok());
/// assert!(policy.check(Some("pass'; DROP TABLE users;--")).is_ok());
///
/// let violation = policy.check(Some("<script>alert(1)</script>")).unwrap_err();
/// assert_eq!(violation.rule(), PasswordRule::InvalidCharacters);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_len: usize,
    max_len: usize,
}

impl PasswordPolicy {
    /// Default minimum length in characters.
    pub const DEFAULT_MIN_LEN: usize = 3;
    /// Default maximum length in characters.
    pub const DEFAULT_MAX_LEN: usize = 128;

    /// Creates a policy with explicit bounds.
    ///
    /// # Panics
    ///
    /// Panics if `min_len` is 0 or greater than `max_len`.
    pub fn new(min_len: usize, max_len: usize) -> Self {
        assert!(min_len > 0, "min_len must be greater than 0");
        assert!(min_len <= max_len, "min_len must not exceed max_len");
        Self { min_len, max_len }
    }

    /// Builds the policy from validated configuration.
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            min_len: config.password_min_len,
            max_len: config.password_max_len,
        }
    }

    /// Checks a possibly-absent password against the policy.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn check(&self, password: Option<&str>) -> Result<(), PolicyViolation> {
        let password = match password {
            Some(p) if !p.trim().is_empty() => p,
            _ => {
                return Err(PolicyViolation::new(
                    PasswordRule::Empty,
                    "Password cannot be empty",
                ))
            }
        };

        if contains_script_injection(Some(password)) {
            return Err(PolicyViolation::new(
                PasswordRule::InvalidCharacters,
                "Password contains invalid characters",
            ));
        }

        let len = password.chars().count();
        if len < self.min_len || len > self.max_len {
            return Err(PolicyViolation::new(
                PasswordRule::Length,
                format!(
                    "Password must be between {} and {} characters",
                    self.min_len, self.max_len
                ),
            ));
        }

        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LEN, Self::DEFAULT_MAX_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_of(password: Option<&str>) -> Option<PasswordRule> {
        PasswordPolicy::default()
            .check(password)
            .err()
            .map(|v| v.rule())
    }

    #[test]
    fn accepts_ordinary_passwords() {
        assert_eq!(rule_of(Some("ValidP@ss123")), None);
        assert_eq!(rule_of(Some("abc")), None);
        assert_eq!(rule_of(Some(&"x".repeat(128))), None);
    }

    #[test]
    fn accepts_sql_looking_passwords() {
        assert_eq!(rule_of(Some("select*from")), None);
        assert_eq!(rule_of(Some("pa'ss\"word--;")), None);
        assert_eq!(rule_of(Some("DROP TABLE users")), None);
    }

    #[test]
    fn rejects_empty_passwords() {
        assert_eq!(rule_of(None), Some(PasswordRule::Empty));
        assert_eq!(rule_of(Some("")), Some(PasswordRule::Empty));
        assert_eq!(rule_of(Some("    ")), Some(PasswordRule::Empty));
    }

    #[test]
    fn rejects_script_markers() {
        for password in [
            "<script>alert(1)</script>",
            "javascript:alert(1)",
            "xonerror=1",
            "ONLOAD",
            "<iframe>",
        ] {
            assert_eq!(
                rule_of(Some(password)),
                Some(PasswordRule::InvalidCharacters),
                "expected rejection: {password}"
            );
        }
    }

    #[test]
    fn rejects_bad_lengths() {
        assert_eq!(rule_of(Some("ab")), Some(PasswordRule::Length));
        assert_eq!(rule_of(Some(&"x".repeat(129))), Some(PasswordRule::Length));
    }

    #[test]
    fn script_check_runs_before_length() {
        let long_script = format!("<script>{}", "a".repeat(200));
        assert_eq!(
            rule_of(Some(&long_script)),
            Some(PasswordRule::InvalidCharacters)
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(rule_of(Some("äöü")), None);
        assert_eq!(rule_of(Some(&"ü".repeat(128))), None);
    }

    #[test]
    fn messages_name_the_rule() {
        let policy = PasswordPolicy::default();
        assert_eq!(
            policy.check(Some("ab")).unwrap_err().message(),
            "Password must be between 3 and 128 characters"
        );
        assert_eq!(
            policy.check(None).unwrap_err().message(),
            "Password cannot be empty"
        );
    }

    #[test]
    fn custom_bounds_apply() {
        let policy = PasswordPolicy::new(8, 16);
        assert!(policy.check(Some("short")).is_err());
        assert!(policy.check(Some("long-enough")).is_ok());
    }

    #[test]
    #[should_panic(expected = "min_len must be greater than 0")]
    fn zero_min_len_panics() {
        let _ = PasswordPolicy::new(0, 10);
    }
}
