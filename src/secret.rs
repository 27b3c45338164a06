use std::fmt;

/// A wrapper that keeps raw passwords out of logs and error output.
///
/// `Debug` and `Display` always print `[REDACTED]`. The value is only
/// reachable through [`expose_secret`](Self::expose_secret), which the
/// registration guard calls once, to hand the password to the hasher.
///
/// # Examples
///
/// ```
/// use task_guard::Secret;
///
/// let password = Secret::new("ValidP@ss123".to_string());
/// assert_eq!(format!("{:?}", password), "[REDACTED]");
/// assert_eq!(password.expose_secret(), "ValidP@ss123");
/// ```
// No Clone: a secret is moved, never duplicated.
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Explicitly exposes the secret value.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
