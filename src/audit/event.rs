//! Audit event schema.

use std::fmt;

use crate::error::ErrorKind;

/// What was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// Account registration.
    Registration,
    /// Single-task read.
    TaskRead,
    /// Task creation.
    TaskCreate,
    /// Task update.
    TaskUpdate,
    /// Task deletion.
    TaskDelete,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registration => write!(f, "registration"),
            Self::TaskRead => write!(f, "task_read"),
            Self::TaskCreate => write!(f, "task_create"),
            Self::TaskUpdate => write!(f, "task_update"),
            Self::TaskDelete => write!(f, "task_delete"),
        }
    }
}

/// How it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Permitted and completed.
    Success,
    /// Input was rejected by a guard.
    Rejected,
    /// The principal was not allowed to act on the resource.
    Denied,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Rejected => write!(f, "rejected"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A structured audit record.
///
/// # Example
///
/// ```
/// use task_guard::audit::{AuditEvent, AuditEventKind, AuditOutcome};
///
/// let event = AuditEvent::new("req-1", Some("alice"), AuditEventKind::TaskDelete, AuditOutcome::Denied)
///     .with_resource_id("3f2c");
///
/// assert_eq!(event.principal(), Some("alice"));
/// assert!(event.to_string().contains("outcome=denied"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    request_id: String,
    principal: Option<String>,
    kind: AuditEventKind,
    outcome: AuditOutcome,
    reason: Option<ErrorKind>,
    resource_id: Option<String>,
}

impl AuditEvent {
    /// Creates an event with the required fields.
    pub fn new(
        request_id: impl Into<String>,
        principal: Option<impl Into<String>>,
        kind: AuditEventKind,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            principal: principal.map(Into::into),
            kind,
            outcome,
            reason: None,
            resource_id: None,
        }
    }

    /// Records which error kind caused a rejection or denial.
    pub fn with_reason(mut self, reason: ErrorKind) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Records the affected resource id. Must not carry content.
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Request correlation id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Acting username, if any.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Event kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Error kind behind a rejection or denial.
    pub fn reason(&self) -> Option<ErrorKind> {
        self.reason
    }

    /// Affected resource id.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[kind={}, outcome={}, request_id={}, principal={}",
            self.kind,
            self.outcome,
            self.request_id,
            self.principal.as_deref().unwrap_or("<none>")
        )?;
        if let Some(reason) = &self.reason {
            write!(f, ", reason={}", reason)?;
        }
        if let Some(resource_id) = &self.resource_id {
            write!(f, ", resource_id={}", resource_id)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_optional_fields() {
        let event = AuditEvent::new(
            "req-9",
            None::<String>,
            AuditEventKind::Registration,
            AuditOutcome::Rejected,
        )
        .with_reason(ErrorKind::MalformedInput);

        let text = event.to_string();
        assert!(text.contains("kind=registration"));
        assert!(text.contains("principal=<none>"));
        assert!(text.contains("reason=malformed input"));
        assert!(!text.contains("resource_id"));
    }

    #[test]
    fn accessors_return_fields() {
        let event = AuditEvent::new(
            "req-1",
            Some("bob"),
            AuditEventKind::TaskUpdate,
            AuditOutcome::Success,
        )
        .with_resource_id("t-1");

        assert_eq!(event.request_id(), "req-1");
        assert_eq!(event.kind(), AuditEventKind::TaskUpdate);
        assert_eq!(event.outcome(), AuditOutcome::Success);
        assert_eq!(event.resource_id(), Some("t-1"));
        assert_eq!(event.reason(), None);
    }
}
