use std::fmt;

use crate::password::PolicyViolation;
use crate::sanitizer::SanitizationError;
use crate::store::StoreError;

/// A typed failure raised by a guard at the point of detection.
///
/// Guards never format responses. [`crate::Responder`] is the single place
/// that turns a `GuardError` into its external shape.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// A classifier or field validator rejected the input.
    #[error("{0}")]
    MalformedInput(String),
    /// The password policy rejected the input.
    #[error("{0}")]
    PolicyViolation(String),
    /// The resource already exists.
    #[error("{0}")]
    DuplicateResource(String),
    /// The target resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The principal does not own the target resource.
    #[error("{0}")]
    Forbidden(String),
    /// No valid principal is attached to the request.
    #[error("{0}")]
    Unauthenticated(String),
    /// Anything else. The detail is for server logs only.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl GuardError {
    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::PolicyViolation(_) => ErrorKind::PolicyViolation,
            Self::DuplicateResource(_) => ErrorKind::DuplicateResource,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Returns the message carried by this error.
    ///
    /// For `Unexpected` this is the internal detail and must not be shown to
    /// callers.
    pub fn message(&self) -> &str {
        match self {
            Self::MalformedInput(m)
            | Self::PolicyViolation(m)
            | Self::DuplicateResource(m)
            | Self::NotFound(m)
            | Self::Forbidden(m)
            | Self::Unauthenticated(m)
            | Self::Unexpected(m) => m,
        }
    }
}

impl From<SanitizationError> for GuardError {
    fn from(err: SanitizationError) -> Self {
        Self::MalformedInput(err.message().to_string())
    }
}

impl From<PolicyViolation> for GuardError {
    fn from(err: PolicyViolation) -> Self {
        Self::PolicyViolation(err.message().to_string())
    }
}

impl From<StoreError> for GuardError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) => {
                Self::DuplicateResource(DUPLICATE_ACCOUNT_MESSAGE.to_string())
            }
            StoreError::Backend(detail) => Self::Unexpected(detail),
        }
    }
}

pub(crate) const DUPLICATE_ACCOUNT_MESSAGE: &str = "Registration failed, user already exists";

/// Error taxonomy with the externally visible status of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400
    MalformedInput,
    /// 400
    PolicyViolation,
    /// 409, plain text body
    DuplicateResource,
    /// 404
    NotFound,
    /// 403
    Forbidden,
    /// 401 on the API surface, redirect on the page surface
    Unauthenticated,
    /// 500
    Unexpected,
}

impl ErrorKind {
    /// HTTP-equivalent status code.
    pub fn status(&self) -> u16 {
        match self {
            Self::MalformedInput | Self::PolicyViolation => 400,
            Self::DuplicateResource => 409,
            Self::NotFound => 404,
            Self::Forbidden => 403,
            Self::Unauthenticated => 401,
            Self::Unexpected => 500,
        }
    }

    /// Short category label used in error bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MalformedInput | Self::PolicyViolation => "Bad Request",
            Self::DuplicateResource => "Conflict",
            Self::NotFound => "Not Found",
            Self::Forbidden => "Forbidden",
            Self::Unauthenticated => "Unauthorized",
            Self::Unexpected => "Internal Server Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput => write!(f, "malformed input"),
            Self::PolicyViolation => write!(f, "policy violation"),
            Self::DuplicateResource => write!(f, "duplicate resource"),
            Self::NotFound => write!(f, "not found"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::PasswordPolicy;
    use crate::sanitizer::SanitizationErrorKind;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ErrorKind::MalformedInput.status(), 400);
        assert_eq!(ErrorKind::PolicyViolation.status(), 400);
        assert_eq!(ErrorKind::DuplicateResource.status(), 409);
        assert_eq!(ErrorKind::NotFound.status(), 404);
        assert_eq!(ErrorKind::Forbidden.status(), 403);
        assert_eq!(ErrorKind::Unauthenticated.status(), 401);
        assert_eq!(ErrorKind::Unexpected.status(), 500);
    }

    #[test]
    fn sanitization_errors_are_malformed_input() {
        let err: GuardError = SanitizationError::new(
            SanitizationErrorKind::InvalidFormat,
            "Email format is invalid",
        )
        .into();

        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.message(), "Email format is invalid");
    }

    #[test]
    fn password_violations_are_policy_violations() {
        let violation = PasswordPolicy::default().check(Some("ab")).unwrap_err();
        let err: GuardError = violation.into();

        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    }

    #[test]
    fn unique_violation_becomes_duplicate() {
        let err: GuardError = StoreError::UniqueViolation("username".to_string()).into();

        assert_eq!(err.kind(), ErrorKind::DuplicateResource);
        assert_eq!(err.message(), DUPLICATE_ACCOUNT_MESSAGE);
    }

    #[test]
    fn backend_failure_becomes_unexpected() {
        let err: GuardError = StoreError::Backend("disk full".to_string()).into();

        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.to_string().contains("disk full"));
    }
}
