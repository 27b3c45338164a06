/// A value that has passed every admission check and is safe to persist.
///
/// `Verified<T>` has no public constructor. Only the sanitizers and guards in
/// this crate create one, after validation succeeds.
///
/// ```compile_fail
/// use task_guard::Verified;
///
/// let verified = Verified::new("data".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Wraps a value without validating it.
    ///
    /// Callers must have validated the value already.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper and returns the verified value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
