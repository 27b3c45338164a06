//! Request-scoped logging and subscriber setup.

use std::fmt;

use tracing_subscriber::EnvFilter;

use crate::config::GuardConfig;

/// Error returned by [`init`].
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The configured filter directive could not be parsed.
    #[error("invalid log filter {directive:?}: {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("global tracing subscriber already installed")]
    AlreadyInitialized,
}

/// Installs a global `fmt` subscriber filtered by `config.log_filter`.
///
/// `RUST_LOG` takes precedence over the configured directive when set.
///
/// # Errors
///
/// Returns `LoggingError` if the directive is invalid or a subscriber is
/// already installed.
pub fn init(config: &GuardConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter).map_err(|err| {
            LoggingError::InvalidFilter {
                directive: config.log_filter.clone(),
                reason: err.to_string(),
            }
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

/// A logger bound to one request.
///
/// Obtained from [`crate::Ctx::log`]. Every line carries the request id
/// and path. Values wrapped in [`crate::Secret`] print as `[REDACTED]`.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
    path: &'a str,
}

impl<'a> RequestLog<'a> {
    pub(crate) fn new(request_id: &'a str, path: &'a str) -> Self {
        Self { request_id, path }
    }

    /// Request id stamped on every line.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs at info level.
    ///
    /// ```
    /// # use task_guard::{PrincipalGate, RequestMeta, Secret, Surface};
    /// let ctx = PrincipalGate::new(RequestMeta::new("req-1", "/signup", Surface::Page)).anonymous();
    /// let password = Secret::new("hunter2".to_string());
    /// ctx.log().info(format_args!("signup attempt, password {:?}", password));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, path = %self.path, "{}", args);
    }

    /// Logs at warn level.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, path = %self.path, "{}", args);
    }

    /// Logs at error level.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, path = %self.path, "{}", args);
    }

    /// Logs at debug level.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, path = %self.path, "{}", args);
    }
}
