//! Request-admission layer for a per-user task tracker.
//!
//! Nothing reaches storage unless it has been classified, sanitized,
//! validated, and checked against the requesting principal:
//! - **Registration**: the classifier, sanitizer, field validators and
//!   password policy run in a fixed order before an account is created
//! - **Task ownership**: every single-task operation loads the task and
//!   refuses it unless the principal owns it
//! - **One responder**: guards raise a typed [`GuardError`]; [`Responder`]
//!   is the only place that turns it into a response
//!
//! # Core Types
//!
//! - [`Tainted<T>`]: untrusted request data
//! - [`Verified<T>`]: data that passed a [`Sanitizer`]
//! - [`Secret<T>`]: redacted in logs (raw passwords)
//! - [`Ctx`]: request context, anonymous or with a resolved [`Principal`]
//! - [`PrincipalGate`]: the only way to build a `Ctx`
//!
//! # Examples
//!
//! ```
//! use task_guard::{
//!     ErrorKind, MemoryAccountStore, PasswordPolicy, PrincipalGate, RegistrationForm,
//!     RegistrationGuard, RequestMeta, SaltedSha256Hasher, Surface,
//! };
//!
//! let accounts = MemoryAccountStore::new();
//! let guard = RegistrationGuard::new(&accounts, &SaltedSha256Hasher);
//! let ctx = PrincipalGate::new(RequestMeta::new("req-1", "/signup", Surface::Page)).anonymous();
//!
//! let form = RegistrationForm {
//!     username: Some("admin'--".into()),
//!     email: Some("admin@example.com".into()),
//!     password: Some("ValidP@ss123".into()),
//! };
//! let candidate = form.bind(&PasswordPolicy::default()).unwrap();
//!
//! let err = guard.register(&ctx, candidate).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MalformedInput);
//! assert!(accounts.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod classifier;
mod config;
mod context;
mod error;
mod gate;
mod hash;
pub mod logging;
mod model;
mod ownership;
mod password;
mod registration;
mod request;
mod responder;
mod sanitizer;
mod secret;
mod state;
mod store;
mod tainted;
mod tasks;
mod validate;
mod verified;
pub mod web;

pub use classifier::{classify, contains_script_injection, contains_sql_injection, Classification};
pub use config::{ConfigError, GuardConfig};
pub use context::Ctx;
pub use error::{ErrorKind, GuardError};
pub use gate::PrincipalGate;
pub use hash::{PasswordHash, PasswordHasher, SaltedSha256Hasher};
pub use logging::RequestLog;
pub use model::{
    Account, AccountId, NewAccount, Task, TaskDraft, TaskId, TaskStatus, TaskView,
};
pub use ownership::{OwnershipGuard, TaskAction};
pub use password::{PasswordPolicy, PasswordRule, PolicyViolation};
pub use registration::{IdentityCandidate, RegistrationForm, RegistrationGuard};
pub use request::{Principal, RequestMeta, Surface};
pub use responder::{Body, ErrorResponse, Responder, Response};
pub use sanitizer::{sanitize, SanitizationError, SanitizationErrorKind, Sanitizer, TextSanitizer};
pub use secret::Secret;
pub use state::{Anonymous, Authenticated};
pub use store::{
    AccountStore, MemoryAccountStore, MemoryTaskStore, StoreError, StoreResult, TaskStore,
};
pub use tainted::Tainted;
pub use tasks::TaskService;
pub use validate::{is_valid_email, is_valid_username, IdentityField};
pub use verified::Verified;
