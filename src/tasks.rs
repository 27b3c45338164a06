//! Task operations scoped to the requesting principal.
//!
//! Lists are filtered by owner at query level. Single-task operations go
//! through [`OwnershipGuard`] first.

use chrono::Utc;

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::context::Ctx;
use crate::error::GuardError;
use crate::model::{Task, TaskDraft, TaskId, TaskStatus, TaskView};
use crate::ownership::{OwnershipGuard, TaskAction};
use crate::sanitizer::{Sanitizer, TextSanitizer};
use crate::store::TaskStore;
use crate::Tainted;

const SHORT_DESCRIPTION: &str = "Short description";
const LONG_DESCRIPTION: &str = "Long description";

/// Per-principal task CRUD.
///
/// # Examples
///
/// ```
/// use task_guard::{MemoryTaskStore, Tainted, TaskDraft, TaskService, TaskStatus};
/// # use task_guard::{MemoryAccountStore, PrincipalGate, RequestMeta, Surface};
/// # use task_guard::{PasswordPolicy, RegistrationForm, RegistrationGuard, SaltedSha256Hasher};
/// # let accounts = MemoryAccountStore::new();
/// # let form = RegistrationForm {
/// #     username: Some("alice".into()),
/// #     email: Some("alice@example.com".into()),
/// #     password: Some("ValidP@ss123".into()),
/// # };
/// # let anon = PrincipalGate::new(RequestMeta::new("req-0", "/signup", Surface::Page)).anonymous();
/// # RegistrationGuard::new(&accounts, &SaltedSha256Hasher)
/// #     .register(&anon, form.bind(&PasswordPolicy::default()).unwrap())
/// #     .unwrap();
/// # let ctx = PrincipalGate::new(RequestMeta::new("req-1", "/api/tasks", Surface::Api).with_username("alice"))
/// #     .authenticate(&accounts)
/// #     .unwrap();
/// let store = MemoryTaskStore::new();
/// let service = TaskService::new(&store);
///
/// let draft = TaskDraft {
///     short_description: Some("Buy milk".into()),
///     ..TaskDraft::default()
/// };
/// let created = service.create(&ctx, Tainted::new(draft)).unwrap();
///
/// assert_eq!(created.status, TaskStatus::Todo);
/// assert_eq!(service.list(&ctx).unwrap().len(), 1);
/// ```
pub struct TaskService<'s, S: ?Sized> {
    tasks: &'s S,
    audit: Option<&'s AuditTrail>,
}

impl<'s, S> TaskService<'s, S>
where
    S: TaskStore + ?Sized,
{
    /// Creates a service over the given store.
    pub fn new(tasks: &'s S) -> Self {
        Self { tasks, audit: None }
    }

    /// Records mutations and denied access to `trail`.
    pub fn with_audit(mut self, trail: &'s AuditTrail) -> Self {
        self.audit = Some(trail);
        self
    }

    fn guard(&self) -> OwnershipGuard<'s, S> {
        let guard = OwnershipGuard::new(self.tasks);
        match self.audit {
            Some(trail) => guard.with_audit(trail),
            None => guard,
        }
    }

    /// The principal's tasks, newest first.
    pub fn list(&self, ctx: &Ctx) -> Result<Vec<TaskView>, GuardError> {
        let tasks = self.tasks.list_by_owner(ctx.principal().id)?;
        Ok(tasks.iter().map(Task::view).collect())
    }

    /// The principal's tasks with the given status, newest first.
    pub fn list_by_status(
        &self,
        ctx: &Ctx,
        status: TaskStatus,
    ) -> Result<Vec<TaskView>, GuardError> {
        let tasks = self.tasks.list_by_owner(ctx.principal().id)?;
        Ok(tasks
            .iter()
            .filter(|task| task.status() == status)
            .map(Task::view)
            .collect())
    }

    /// One of the principal's tasks.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown or unparseable, `Forbidden` if the task
    /// belongs to another account.
    pub fn get(&self, ctx: &Ctx, id: &str) -> Result<TaskView, GuardError> {
        let id = parse_id(id)?;
        let task = self.guard().load_owned(ctx, id, TaskAction::Read)?;
        Ok(task.view())
    }

    /// Creates a task owned by the principal.
    ///
    /// Status defaults to `Todo`.
    ///
    /// # Errors
    ///
    /// `MalformedInput` if the short description is absent or blank.
    pub fn create(&self, ctx: &Ctx, draft: Tainted<TaskDraft>) -> Result<TaskView, GuardError> {
        let draft = draft.into_inner();
        let (short, long) = admit_text(draft.short_description, draft.long_description)?;
        let status = draft.status.unwrap_or_default();

        let task = Task::new(ctx.principal().id, short, long, status, Utc::now());
        let task = self.tasks.save(task)?;
        ctx.log().info(format_args!("created task {}", task.id()));
        self.record(ctx, AuditEventKind::TaskCreate, task.id());
        Ok(task.view())
    }

    /// Replaces the fields of one of the principal's tasks.
    ///
    /// An absent status keeps the current one. An absent long description
    /// clears it.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Forbidden`, or `MalformedInput` for a blank short
    /// description.
    pub fn update(
        &self,
        ctx: &Ctx,
        id: &str,
        draft: Tainted<TaskDraft>,
    ) -> Result<TaskView, GuardError> {
        let id = parse_id(id)?;
        let mut task = self.guard().load_owned(ctx, id, TaskAction::Update)?;

        let draft = draft.into_inner();
        let (short, long) = admit_text(draft.short_description, draft.long_description)?;
        let status = draft.status.unwrap_or(task.status());

        task.apply(short, long, status, Utc::now());
        let task = self.tasks.save(task)?;
        ctx.log().info(format_args!("updated task {}", task.id()));
        self.record(ctx, AuditEventKind::TaskUpdate, task.id());
        Ok(task.view())
    }

    /// Deletes one of the principal's tasks.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Forbidden`.
    pub fn delete(&self, ctx: &Ctx, id: &str) -> Result<(), GuardError> {
        let id = parse_id(id)?;
        self.guard().load_owned(ctx, id, TaskAction::Delete)?;
        self.tasks.delete_by_id(id)?;
        ctx.log().info(format_args!("deleted task {id}"));
        self.record(ctx, AuditEventKind::TaskDelete, id);
        Ok(())
    }

    fn record(&self, ctx: &Ctx, kind: AuditEventKind, id: TaskId) {
        if let Some(trail) = self.audit {
            trail.record(
                AuditEvent::new(
                    ctx.request_id(),
                    Some(ctx.principal().username.as_str()),
                    kind,
                    AuditOutcome::Success,
                )
                .with_resource_id(id.to_string()),
            );
        }
    }
}

fn parse_id(raw: &str) -> Result<TaskId, GuardError> {
    raw.trim()
        .parse()
        .map_err(|_| GuardError::NotFound("Task not found".to_string()))
}

fn admit_text(
    short: Option<String>,
    long: Option<String>,
) -> Result<(String, Option<String>), GuardError> {
    let short = TextSanitizer::required(SHORT_DESCRIPTION)
        .sanitize(Tainted::new(short))?
        .into_inner()
        .unwrap_or_default();
    let long = TextSanitizer::optional(LONG_DESCRIPTION)
        .sanitize(Tainted::new(long))?
        .into_inner();
    Ok((short, long))
}
