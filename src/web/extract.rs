//! Extraction boundary traits for web integration.

use crate::request::RequestMeta;

use super::TaintedInputs;

/// Extracts request metadata from a transport-specific request.
///
/// Implementations map transport types to [`RequestMeta`]. They do not
/// resolve the principal; [`crate::PrincipalGate`] does that.
///
/// # Examples
///
/// ```
/// use task_guard::web::ExtractMetadata;
/// use task_guard::{RequestMeta, Surface};
///
/// struct MyFrameworkRequest {
///     request_id: String,
///     session_user: Option<String>,
/// }
///
/// impl ExtractMetadata for MyFrameworkRequest {
///     fn extract_metadata(&self) -> RequestMeta {
///         RequestMeta {
///             request_id: self.request_id.clone(),
///             path: "/api/tasks".to_string(),
///             surface: Surface::Api,
///             username: self.session_user.clone(),
///         }
///     }
/// }
/// ```
pub trait ExtractMetadata {
    /// Extracts request metadata.
    fn extract_metadata(&self) -> RequestMeta;
}

/// Extracts untrusted inputs from a transport-specific request.
///
/// Every path parameter, query parameter and body must come back wrapped
/// in [`crate::Tainted`].
pub trait ExtractTaintedInputs {
    /// Extracts all untrusted inputs from the request.
    fn extract_tainted_inputs(&self) -> TaintedInputs;
}
