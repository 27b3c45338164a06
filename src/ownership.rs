//! Per-task ownership checks.

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::context::Ctx;
use crate::error::{ErrorKind, GuardError};
use crate::model::{Task, TaskId};
use crate::store::TaskStore;

/// An operation on a single existing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Read one task.
    Read,
    /// Replace a task's fields.
    Update,
    /// Remove a task.
    Delete,
}

impl TaskAction {
    fn forbidden_message(&self) -> &'static str {
        match self {
            Self::Read => "You are not authorized to access this task",
            Self::Update => "You are not authorized to update this task",
            Self::Delete => "You are not authorized to delete this task",
        }
    }

    fn audit_kind(&self) -> AuditEventKind {
        match self {
            Self::Read => AuditEventKind::TaskRead,
            Self::Update => AuditEventKind::TaskUpdate,
            Self::Delete => AuditEventKind::TaskDelete,
        }
    }
}

fn not_found(id: impl std::fmt::Display) -> GuardError {
    GuardError::NotFound(format!("Task not found with id: {id}"))
}

/// Loads tasks on behalf of a principal and refuses foreign ones.
///
/// A missing task is `NotFound` whoever asks. An existing task owned by
/// someone else is `Forbidden`.
pub struct OwnershipGuard<'s, S: ?Sized> {
    tasks: &'s S,
    audit: Option<&'s AuditTrail>,
}

impl<'s, S> OwnershipGuard<'s, S>
where
    S: TaskStore + ?Sized,
{
    /// Creates a guard over the given store.
    pub fn new(tasks: &'s S) -> Self {
        Self { tasks, audit: None }
    }

    /// Records denied access to `trail`.
    pub fn with_audit(mut self, trail: &'s AuditTrail) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Loads `id` if the context's principal owns it.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such task exists, `Forbidden` if another account
    /// owns it, `Unexpected` if the store fails.
    pub fn load_owned(&self, ctx: &Ctx, id: TaskId, action: TaskAction) -> Result<Task, GuardError> {
        let task = self.tasks.find_by_id(id)?.ok_or_else(|| not_found(id))?;

        let principal = ctx.principal();
        if task.owner_id() != principal.id {
            ctx.log().warn(format_args!(
                "account {} denied {:?} on task {}",
                principal.id, action, id
            ));
            if let Some(trail) = self.audit {
                trail.record(
                    AuditEvent::new(
                        ctx.request_id(),
                        Some(principal.username.as_str()),
                        action.audit_kind(),
                        AuditOutcome::Denied,
                    )
                    .with_reason(ErrorKind::Forbidden)
                    .with_resource_id(id.to_string()),
                );
            }
            return Err(GuardError::Forbidden(action.forbidden_message().to_string()));
        }

        Ok(task)
    }
}
