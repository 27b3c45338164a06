use std::fmt;

use crate::{Tainted, Verified};

/// Error returned when an untrusted value cannot be admitted.
///
/// The message describes the rule that failed. It never contains the
/// rejected input.
///
/// # Examples
///
/// ```
/// use task_guard::{SanitizationError, SanitizationErrorKind};
///
/// let error = SanitizationError::new(SanitizationErrorKind::InvalidFormat, "Email format is invalid");
/// assert_eq!(error.kind(), SanitizationErrorKind::InvalidFormat);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationError {
    kind: SanitizationErrorKind,
    message: String,
}

impl SanitizationError {
    /// Creates a new sanitization error.
    pub fn new(kind: SanitizationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SanitizationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SanitizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sanitization failed ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for SanitizationError {}

/// Why a value was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizationErrorKind {
    /// Input is absent, empty, or whitespace only.
    Empty,
    /// Input matched the SQL or script rule set.
    MaliciousContent,
    /// Input does not have the required shape.
    InvalidFormat,
}

impl fmt::Display for SanitizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty input"),
            Self::MaliciousContent => write!(f, "malicious content"),
            Self::InvalidFormat => write!(f, "invalid format"),
        }
    }
}

/// Strips dangerous characters from a possibly-absent string.
///
/// Removes null bytes and every ASCII control character except carriage
/// return, line feed and tab, then trims surrounding ASCII spaces and controls
/// (anything at or below U+0020). Unicode spaces such as U+00A0 are kept. Absent input
/// stays absent. This never rejects; rejection belongs to the validators.
///
/// # Examples
///
/// ```
/// use task_guard::sanitize;
///
/// assert_eq!(sanitize(Some("test\0data")).as_deref(), Some("testdata"));
/// assert_eq!(sanitize(Some("  test  ")).as_deref(), Some("test"));
/// assert_eq!(sanitize(None), None);
/// ```
pub fn sanitize(input: Option<&str>) -> Option<String> {
    input.map(|raw| {
        let stripped: String = raw.chars().filter(|c| !is_stripped(*c)).collect();
        trim_low(&stripped).to_string()
    })
}

/// Trims characters at or below U+0020 from both ends.
pub(crate) fn trim_low(value: &str) -> &str {
    value.trim_matches(|c: char| c <= ' ')
}

fn is_stripped(c: char) -> bool {
    c.is_ascii_control() && !matches!(c, '\r' | '\n' | '\t')
}

/// Promotes tainted values to verified values.
///
/// Implementations validate and normalize their input, and only call
/// `Verified::new_unchecked` once every rule has passed.
pub trait Sanitizer<T> {
    /// Sanitizes a tainted value, returning a verified value on success.
    ///
    /// # Errors
    ///
    /// Returns `SanitizationError` if the input fails validation.
    fn sanitize(&self, input: Tainted<T>) -> Result<Verified<T>, SanitizationError>;
}

/// Sanitizer for free-text task fields.
///
/// Runs [`sanitize`] and, when the field is required, rejects values that are
/// absent or blank afterwards. Optional fields that end up blank become `None`.
///
/// # Examples
///
/// ```
/// use task_guard::{Sanitizer, Tainted, TextSanitizer};
///
/// let title = TextSanitizer::required("Short description");
/// let verified = title.sanitize(Tainted::new(Some("  Buy milk\0 ".to_string()))).unwrap();
/// assert_eq!(verified.as_ref().as_deref(), Some("Buy milk"));
///
/// assert!(title.sanitize(Tainted::new(Some("   ".to_string()))).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TextSanitizer {
    field: &'static str,
    required: bool,
}

impl TextSanitizer {
    /// A sanitizer that rejects absent or blank values.
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            required: true,
        }
    }

    /// A sanitizer that maps blank values to `None`.
    pub fn optional(field: &'static str) -> Self {
        Self {
            field,
            required: false,
        }
    }
}

impl Sanitizer<Option<String>> for TextSanitizer {
    fn sanitize(
        &self,
        input: Tainted<Option<String>>,
    ) -> Result<Verified<Option<String>>, SanitizationError> {
        let raw = input.into_inner();
        let cleaned = sanitize(raw.as_deref()).filter(|s| !s.is_empty());

        if self.required && cleaned.is_none() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                format!("{} is required", self.field),
            ));
        }

        Ok(Verified::new_unchecked(cleaned))
    }
}
