//! Request adapter for mapping transport requests to task-guard types.

use std::collections::HashMap;

use crate::request::{RequestMeta, Surface};
use crate::Tainted;

use super::{ExtractMetadata, ExtractTaintedInputs};

/// Framework-agnostic view of an incoming request.
///
/// Transport code fills one of these in and hands it to the handlers in
/// [`crate::web::App`]. It holds plain owned data only.
///
/// # Examples
///
/// ```
/// use task_guard::web::{ExtractMetadata, ExtractTaintedInputs, RequestAdapter};
/// use task_guard::Surface;
///
/// let mut adapter = RequestAdapter::new("req-12345", "/api/tasks");
/// adapter.set_username(Some("alice".to_string()));
/// adapter.add_query_param("status", "Done");
///
/// let meta = adapter.extract_metadata();
/// assert_eq!(meta.request_id, "req-12345");
/// assert_eq!(meta.surface, Surface::Api);
///
/// let inputs = adapter.extract_tainted_inputs();
/// assert!(inputs.has_query_param("status"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    path: String,
    surface: Surface,
    username: Option<String>,
    query_params: HashMap<String, String>,
    path_params: HashMap<String, String>,
    body: Option<String>,
}

impl RequestAdapter {
    /// Creates an adapter for an API request with no session and no inputs.
    pub fn new(request_id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            path: path.into(),
            surface: Surface::Api,
            username: None,
            query_params: HashMap::new(),
            path_params: HashMap::new(),
            body: None,
        }
    }

    /// Sets the client surface.
    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    /// Sets the username the session layer reports as logged in.
    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    /// Adds a query parameter.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_params.insert(key.into(), value.into());
    }

    /// Adds a path parameter from routing.
    pub fn add_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.path_params.insert(key.into(), value.into());
    }

    /// Sets the raw request body.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl ExtractMetadata for RequestAdapter {
    fn extract_metadata(&self) -> RequestMeta {
        RequestMeta {
            request_id: self.request_id.clone(),
            path: self.path.clone(),
            surface: self.surface,
            username: self.username.clone(),
        }
    }
}

impl ExtractTaintedInputs for RequestAdapter {
    fn extract_tainted_inputs(&self) -> TaintedInputs {
        TaintedInputs {
            query_params: self
                .query_params
                .iter()
                .map(|(k, v)| (k.clone(), Tainted::new(v.clone())))
                .collect(),
            path_params: self
                .path_params
                .iter()
                .map(|(k, v)| (k.clone(), Tainted::new(v.clone())))
                .collect(),
            body: self.body.clone().map(Tainted::new),
        }
    }
}

/// Untrusted inputs extracted from a request.
#[derive(Debug, Clone)]
pub struct TaintedInputs {
    query_params: HashMap<String, Tainted<String>>,
    path_params: HashMap<String, Tainted<String>>,
    body: Option<Tainted<String>>,
}

impl TaintedInputs {
    /// Returns the tainted query parameters.
    pub fn query_params(&self) -> &HashMap<String, Tainted<String>> {
        &self.query_params
    }

    /// Returns the tainted path parameters.
    pub fn path_params(&self) -> &HashMap<String, Tainted<String>> {
        &self.path_params
    }

    /// Returns `true` if the query parameter is present.
    pub fn has_query_param(&self, key: &str) -> bool {
        self.query_params.contains_key(key)
    }

    /// Returns a query parameter.
    pub fn get_query(&self, key: &str) -> Option<Tainted<String>> {
        self.query_params.get(key).cloned()
    }

    /// Returns a path parameter.
    pub fn get_path(&self, key: &str) -> Option<Tainted<String>> {
        self.path_params.get(key).cloned()
    }

    /// Takes the raw body, leaving `None` behind.
    pub fn take_body(&mut self) -> Option<Tainted<String>> {
        self.body.take()
    }
}
