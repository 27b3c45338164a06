use std::fmt;

/// A wrapper for untrusted request data that has not been admitted yet.
///
/// Every field that arrives from a request body or path is wrapped in
/// `Tainted<T>` at the web boundary. The value can only be read back inside
/// this crate, by the guards that classify, sanitize and validate it.
///
/// # Examples
///
/// ```
/// use task_guard::Tainted;
///
/// let username = Tainted::new("admin'--".to_string());
///
/// // Debug output shows it is tainted
/// assert!(format!("{:?}", username).starts_with("Tainted"));
/// ```
#[derive(Clone)]
pub struct Tainted<T> {
    // Must stay private: reading it is the guards' job.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Extracts the inner value for admission checks.
    ///
    /// Only guard code that classifies or validates the value may call this.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tainted")
            .field("inner", &self.inner)
            .finish()
    }
}
