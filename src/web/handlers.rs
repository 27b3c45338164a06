//! Endpoint handlers.
//!
//! Each handler takes a [`RequestAdapter`] and always returns a
//! [`Response`]. Failures are routed through the [`Responder`].

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::audit::AuditTrail;
use crate::config::{ConfigError, GuardConfig};
use crate::error::GuardError;
use crate::hash::{PasswordHasher, SaltedSha256Hasher};
use crate::model::{TaskDraft, TaskStatus};
use crate::password::PasswordPolicy;
use crate::registration::{RegistrationForm, RegistrationGuard};
use crate::responder::{Responder, Response};
use crate::store::{AccountStore, MemoryAccountStore, MemoryTaskStore, TaskStore};
use crate::tasks::TaskService;
use crate::Tainted;

use super::{extract_anonymous, extract_authenticated, ExtractMetadata, RequestAdapter, TaintedInputs};

/// Body of a successful registration.
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful! You can now log in.";

/// Body message of a successful delete.
pub const TASK_DELETED_MESSAGE: &str = "Task deleted successfully";

struct Failure {
    error: GuardError,
    details: Vec<String>,
}

impl From<GuardError> for Failure {
    fn from(error: GuardError) -> Self {
        Self {
            error,
            details: Vec::new(),
        }
    }
}

type HandlerResult = Result<Response, Failure>;

/// The request-admission layer wired to its stores.
///
/// # Examples
///
/// ```
/// use task_guard::web::{App, RequestAdapter};
/// use task_guard::{Body, GuardConfig};
///
/// let app = App::in_memory(GuardConfig::default()).unwrap();
///
/// let mut signup = RequestAdapter::new("req-1", "/signup");
/// signup.set_body(r#"{"username":"newuser123","email":"new@example.com","password":"ValidP@ss123"}"#);
/// let response = app.signup(&signup);
/// assert_eq!(response.status, 200);
///
/// let mut create = RequestAdapter::new("req-2", "/api/tasks");
/// create.set_username(Some("newuser123".to_string()));
/// create.set_body(r#"{"shortDescription":"Buy milk"}"#);
/// assert_eq!(app.create_task(&create).status, 201);
/// ```
pub struct App<A, T, H = SaltedSha256Hasher> {
    policy: PasswordPolicy,
    responder: Responder,
    accounts: A,
    tasks: T,
    hasher: H,
    audit: AuditTrail,
}

impl App<MemoryAccountStore, MemoryTaskStore> {
    /// An app over fresh in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is inconsistent.
    pub fn in_memory(config: GuardConfig) -> Result<Self, ConfigError> {
        Self::new(
            config,
            MemoryAccountStore::new(),
            MemoryTaskStore::new(),
            SaltedSha256Hasher,
        )
    }
}

impl<A, T, H> App<A, T, H>
where
    A: AccountStore,
    T: TaskStore,
    H: PasswordHasher,
{
    /// Wires an app from its parts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is inconsistent.
    pub fn new(config: GuardConfig, accounts: A, tasks: T, hasher: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            policy: PasswordPolicy::from_config(&config),
            responder: Responder::new(&config),
            accounts,
            tasks,
            hasher,
            audit: AuditTrail::with_capacity(config.audit_capacity),
        })
    }

    /// The account store.
    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    /// The task store.
    pub fn tasks(&self) -> &T {
        &self.tasks
    }

    /// Security events recorded so far.
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// `POST /signup`
    ///
    /// 200 with a plain text message on success.
    pub fn signup(&self, req: &RequestAdapter) -> Response {
        self.finish(req, self.try_signup(req))
    }

    /// `GET /api/tasks`, optionally filtered by the `status` query parameter.
    pub fn list_tasks(&self, req: &RequestAdapter) -> Response {
        self.finish(req, self.try_list_tasks(req))
    }

    /// `GET /api/tasks/{id}`
    pub fn get_task(&self, req: &RequestAdapter) -> Response {
        self.finish(req, self.try_get_task(req))
    }

    /// `POST /api/tasks`
    ///
    /// 201 with the created task.
    pub fn create_task(&self, req: &RequestAdapter) -> Response {
        self.finish(req, self.try_create_task(req))
    }

    /// `PUT /api/tasks/{id}`
    pub fn update_task(&self, req: &RequestAdapter) -> Response {
        self.finish(req, self.try_update_task(req))
    }

    /// `DELETE /api/tasks/{id}`
    pub fn delete_task(&self, req: &RequestAdapter) -> Response {
        self.finish(req, self.try_delete_task(req))
    }

    fn finish(&self, req: &RequestAdapter, result: HandlerResult) -> Response {
        match result {
            Ok(response) => response,
            Err(failure) => self.responder.respond_with_details(
                &req.extract_metadata(),
                &failure.error,
                failure.details,
            ),
        }
    }

    fn service(&self) -> TaskService<'_, T> {
        TaskService::new(&self.tasks).with_audit(&self.audit)
    }

    fn try_signup(&self, req: &RequestAdapter) -> HandlerResult {
        let mut extraction = extract_anonymous(req);
        let form: RegistrationForm = parse_body(extraction.inputs.take_body())?.into_inner();
        let candidate = form.bind(&self.policy)?;

        RegistrationGuard::new(&self.accounts, &self.hasher)
            .with_audit(&self.audit)
            .register(&extraction.context, candidate)?;

        Ok(Response::text(200, REGISTRATION_SUCCESS_MESSAGE))
    }

    fn try_list_tasks(&self, req: &RequestAdapter) -> HandlerResult {
        let extraction = extract_authenticated(req, &self.accounts)?;
        let views = match extraction.inputs.get_query("status") {
            Some(raw) => {
                let status = parse_status(raw)?;
                self.service().list_by_status(&extraction.context, status)?
            }
            None => self.service().list(&extraction.context)?,
        };
        Ok(Response::json(200, &views)?)
    }

    fn try_get_task(&self, req: &RequestAdapter) -> HandlerResult {
        let extraction = extract_authenticated(req, &self.accounts)?;
        let id = task_id(&extraction.inputs)?;
        let view = self.service().get(&extraction.context, &id)?;
        Ok(Response::json(200, &view)?)
    }

    fn try_create_task(&self, req: &RequestAdapter) -> HandlerResult {
        let mut extraction = extract_authenticated(req, &self.accounts)?;
        let draft: Tainted<TaskDraft> = parse_body(extraction.inputs.take_body())?;
        let view = self.service().create(&extraction.context, draft)?;
        Ok(Response::json(201, &view)?)
    }

    fn try_update_task(&self, req: &RequestAdapter) -> HandlerResult {
        let mut extraction = extract_authenticated(req, &self.accounts)?;
        let id = task_id(&extraction.inputs)?;
        let draft: Tainted<TaskDraft> = parse_body(extraction.inputs.take_body())?;
        let view = self.service().update(&extraction.context, &id, draft)?;
        Ok(Response::json(200, &view)?)
    }

    fn try_delete_task(&self, req: &RequestAdapter) -> HandlerResult {
        let extraction = extract_authenticated(req, &self.accounts)?;
        let id = task_id(&extraction.inputs)?;
        self.service().delete(&extraction.context, &id)?;
        Ok(Response::json(200, &json!({ "message": TASK_DELETED_MESSAGE }))?)
    }
}

fn parse_body<B: DeserializeOwned>(body: Option<Tainted<String>>) -> Result<Tainted<B>, Failure> {
    let Some(body) = body else {
        return Err(GuardError::MalformedInput("Request body is required".to_string()).into());
    };
    serde_json::from_str(&body.into_inner())
        .map(Tainted::new)
        .map_err(|err| Failure {
            error: GuardError::MalformedInput("Malformed request body".to_string()),
            details: vec![format!("line {}, column {}", err.line(), err.column())],
        })
}

fn parse_status(raw: Tainted<String>) -> Result<TaskStatus, GuardError> {
    raw.into_inner()
        .trim()
        .parse()
        .map_err(|_| GuardError::MalformedInput("Invalid value for parameter 'status'".to_string()))
}

fn task_id(inputs: &TaintedInputs) -> Result<String, GuardError> {
    inputs
        .get_path("id")
        .map(Tainted::into_inner)
        .ok_or_else(|| GuardError::NotFound("Task not found".to_string()))
}
