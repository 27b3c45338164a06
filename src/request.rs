use crate::model::AccountId;

/// Which client surface a request came through.
///
/// Decides how an unauthenticated request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// JSON API. Errors are JSON bodies.
    #[default]
    Api,
    /// Server-rendered pages. Unauthenticated requests redirect to login.
    Page,
}

/// Metadata about an incoming request.
///
/// `username` is whatever the session layer claims is logged in. It is
/// resolved against the account store by [`crate::PrincipalGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// Request path, echoed in error bodies
    pub path: String,
    /// Client surface
    pub surface: Surface,
    /// Session username, if any
    pub username: Option<String>,
}

impl RequestMeta {
    /// Creates metadata for a request without a session.
    pub fn new(request_id: impl Into<String>, path: impl Into<String>, surface: Surface) -> Self {
        Self {
            request_id: request_id.into(),
            path: path.into(),
            surface,
            username: None,
        }
    }

    /// Attaches the session username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// The resolved, authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Account id
    pub id: AccountId,
    /// Account username
    pub username: String,
}
