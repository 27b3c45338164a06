//! Security audit events for registration and task access.
//!
//! Events carry only identifiers and outcomes: never raw input, never
//! passwords, never task content.

mod event;
mod trail;

pub use event::{AuditEvent, AuditEventKind, AuditOutcome};
pub use trail::AuditTrail;
