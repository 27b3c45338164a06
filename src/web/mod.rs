//! Transport-agnostic web surface.
//!
//! Transport code builds a [`RequestAdapter`] per request and calls one of
//! the [`App`] handlers. Everything that crosses the boundary is wrapped in
//! [`crate::Tainted`] at extraction time, and every failure leaves through
//! [`crate::Responder`].
//!
//! ```text
//! RequestAdapter
//!   -> extract_anonymous / extract_authenticated   (Ctx + TaintedInputs)
//!   -> RegistrationGuard / TaskService             (GuardError on failure)
//!   -> Response
//! ```

mod adapter;
mod extract;
mod handlers;
mod middleware;

pub use adapter::{RequestAdapter, TaintedInputs};
pub use extract::{ExtractMetadata, ExtractTaintedInputs};
pub use handlers::{App, REGISTRATION_SUCCESS_MESSAGE, TASK_DELETED_MESSAGE};
pub use middleware::{
    extract_anonymous, extract_authenticated, AnonymousExtraction, AuthenticatedExtraction,
};
