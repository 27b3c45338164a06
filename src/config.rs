//! Runtime configuration for the admission layer.

use serde::Deserialize;

use crate::audit::AuditTrail;
use crate::password::PasswordPolicy;

/// Error returned when configuration cannot be loaded or is inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML source could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for guards, responder and logging.
///
/// Every field has a default, so an empty TOML document is valid.
///
/// # Examples
///
/// ```
/// use task_guard::GuardConfig;
///
/// let config = GuardConfig::from_toml_str(r#"
///     password_min_len = 8
///     login_path = "/signin"
/// "#).unwrap();
///
/// assert_eq!(config.password_min_len, 8);
/// assert_eq!(config.password_max_len, 128);
/// assert_eq!(config.login_path, "/signin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Minimum password length in characters.
    pub password_min_len: usize,
    /// Maximum password length in characters.
    pub password_max_len: usize,
    /// Where unauthenticated page requests are redirected.
    pub login_path: String,
    /// `tracing-subscriber` env-filter directive used by [`crate::logging::init`].
    pub log_filter: String,
    /// Most recent audit events kept in memory by the app.
    pub audit_capacity: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            password_min_len: PasswordPolicy::DEFAULT_MIN_LEN,
            password_max_len: PasswordPolicy::DEFAULT_MAX_LEN,
            login_path: "/login".to_string(),
            log_filter: "info".to_string(),
            audit_capacity: AuditTrail::DEFAULT_CAPACITY,
        }
    }
}

impl GuardConfig {
    /// Parses and validates configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or a value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values are mutually consistent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.password_min_len == 0 {
            return Err(ConfigError::Invalid(
                "password_min_len must be greater than 0".to_string(),
            ));
        }
        if self.password_min_len > self.password_max_len {
            return Err(ConfigError::Invalid(format!(
                "password_min_len ({}) exceeds password_max_len ({})",
                self.password_min_len, self.password_max_len
            )));
        }
        if !self.login_path.starts_with('/') {
            return Err(ConfigError::Invalid(
                "login_path must be an absolute path".to_string(),
            ));
        }
        Ok(())
    }
}
