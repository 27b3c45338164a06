//! The single place where guard failures become external responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::GuardConfig;
use crate::error::{ErrorKind, GuardError};
use crate::logging::RequestLog;
use crate::request::{RequestMeta, Surface};

const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";
const FAVICON: &str = "/favicon.ico";

/// Response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// JSON document
    Json(serde_json::Value),
    /// Plain text
    Text(String),
    /// No body
    Empty,
}

/// A transport-agnostic response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP-equivalent status code
    pub status: u16,
    /// Redirect target, set only for redirects
    pub location: Option<String>,
    /// Body
    pub body: Body,
}

impl Response {
    /// A JSON response.
    ///
    /// # Errors
    ///
    /// `Unexpected` if `value` cannot be serialized.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Result<Self, GuardError> {
        let value = serde_json::to_value(value)
            .map_err(|err| GuardError::Unexpected(format!("response serialization: {err}")))?;
        Ok(Self {
            status,
            location: None,
            body: Body::Json(value),
        })
    }

    /// A plain text response.
    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            body: Body::Text(text.into()),
        }
    }

    /// A bodiless response.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            location: None,
            body: Body::Empty,
        }
    }

    /// A `302 Found` redirect.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: 302,
            location: Some(location.into()),
            body: Body::Empty,
        }
    }

    /// Deserializes a JSON body. Returns `None` for other bodies.
    pub fn json_body<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        match &self.body {
            Body::Json(value) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

/// JSON error body.
///
/// `details` is omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// When the error was produced
    pub timestamp: DateTime<Utc>,
    /// Numeric status
    pub status: u16,
    /// Category label, such as `Bad Request`
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Request path
    pub path: String,
    /// Extra detail lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorResponse {
    /// Builds a body for `kind` with the current time.
    pub fn new(kind: ErrorKind, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: kind.status(),
            error: kind.label().to_string(),
            message: message.into(),
            path: path.into(),
            details: Vec::new(),
        }
    }

    /// Attaches detail lines.
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Translates [`GuardError`] into a [`Response`].
///
/// | kind | response |
/// |---|---|
/// | `MalformedInput`, `PolicyViolation` | 400 JSON |
/// | `DuplicateResource` | 409 plain text |
/// | `NotFound` | 404 JSON |
/// | `Forbidden` | 403 JSON |
/// | `Unauthenticated` | 302 to the login path on pages, 401 JSON on the API |
/// | `Unexpected` | 500 JSON with a generic message |
///
/// # Examples
///
/// ```
/// use task_guard::{Body, GuardConfig, GuardError, RequestMeta, Responder, Surface};
///
/// let responder = Responder::new(&GuardConfig::default());
/// let meta = RequestMeta::new("req-1", "/tasks", Surface::Page);
///
/// let response = responder.respond(&meta, &GuardError::Unauthenticated("no session".into()));
///
/// assert_eq!(response.status, 302);
/// assert_eq!(response.location.as_deref(), Some("/login"));
/// assert_eq!(response.body, Body::Empty);
/// ```
#[derive(Debug, Clone)]
pub struct Responder {
    login_path: String,
}

impl Responder {
    /// Creates a responder from configuration.
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
        }
    }

    /// Translates `err` for the request described by `meta`.
    pub fn respond(&self, meta: &RequestMeta, err: &GuardError) -> Response {
        self.respond_with_details(meta, err, Vec::new())
    }

    /// Like [`Responder::respond`], attaching `details` to JSON bodies.
    pub fn respond_with_details(
        &self,
        meta: &RequestMeta,
        err: &GuardError,
        details: Vec<String>,
    ) -> Response {
        let log = RequestLog::new(&meta.request_id, &meta.path);
        let kind = err.kind();

        match kind {
            ErrorKind::Unexpected => {
                if meta.path.contains(FAVICON) {
                    return Response::empty(404);
                }
                log.error(format_args!("unexpected failure: {}", err.message()));
                self.error_body(meta, kind, UNEXPECTED_MESSAGE, details)
            }
            ErrorKind::DuplicateResource => {
                log.info(format_args!("rejected: {}", kind));
                Response::text(kind.status(), err.message())
            }
            ErrorKind::Unauthenticated => {
                log.warn(format_args!("rejected: {}", kind));
                match meta.surface {
                    Surface::Page => Response::redirect(self.login_path.as_str()),
                    Surface::Api => self.error_body(meta, kind, err.message(), details),
                }
            }
            ErrorKind::Forbidden => {
                log.warn(format_args!("rejected: {}", kind));
                self.error_body(meta, kind, err.message(), details)
            }
            ErrorKind::MalformedInput | ErrorKind::PolicyViolation | ErrorKind::NotFound => {
                log.info(format_args!("rejected: {}", kind));
                self.error_body(meta, kind, err.message(), details)
            }
        }
    }

    fn error_body(
        &self,
        meta: &RequestMeta,
        kind: ErrorKind,
        message: &str,
        details: Vec<String>,
    ) -> Response {
        let body = ErrorResponse::new(kind, message, meta.path.as_str()).with_details(details);
        match Response::json(kind.status(), &body) {
            Ok(response) => response,
            Err(_) => Response::text(kind.status(), message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(path: &str) -> RequestMeta {
        RequestMeta::new("req-resp", path, Surface::Api)
    }

    fn body_of(response: &Response) -> ErrorResponse {
        response.json_body().expect("JSON error body")
    }

    #[test]
    fn validation_errors_are_400_with_path() {
        let responder = Responder::new(&GuardConfig::default());
        let response = responder.respond(
            &api("/signup"),
            &GuardError::MalformedInput("Email format is invalid".into()),
        );

        assert_eq!(response.status, 400);
        let body = body_of(&response);
        assert_eq!(body.status, 400);
        assert_eq!(body.error, "Bad Request");
        assert_eq!(body.message, "Email format is invalid");
        assert_eq!(body.path, "/signup");
    }

    #[test]
    fn duplicate_is_plain_text_409() {
        let responder = Responder::new(&GuardConfig::default());
        let response = responder.respond(
            &api("/signup"),
            &GuardError::DuplicateResource("Registration failed, user already exists".into()),
        );

        assert_eq!(response.status, 409);
        assert_eq!(
            response.body,
            Body::Text("Registration failed, user already exists".to_string())
        );
    }

    #[test]
    fn unauthenticated_api_is_401_json() {
        let responder = Responder::new(&GuardConfig::default());
        let response =
            responder.respond(&api("/api/tasks"), &GuardError::Unauthenticated("nope".into()));

        assert_eq!(response.status, 401);
        assert_eq!(response.location, None);
        assert_eq!(body_of(&response).error, "Unauthorized");
    }

    #[test]
    fn unauthenticated_page_redirects_to_configured_login() {
        let config = GuardConfig {
            login_path: "/signin".to_string(),
            ..GuardConfig::default()
        };
        let meta = RequestMeta::new("req-page", "/tasks", Surface::Page);

        let response =
            Responder::new(&config).respond(&meta, &GuardError::Unauthenticated("nope".into()));

        assert_eq!(response.status, 302);
        assert_eq!(response.location.as_deref(), Some("/signin"));
    }

    #[test]
    fn unexpected_hides_detail() {
        let responder = Responder::new(&GuardConfig::default());
        let response = responder.respond(
            &api("/api/tasks"),
            &GuardError::Unexpected("db password=hunter2 rejected".into()),
        );

        assert_eq!(response.status, 500);
        let body = body_of(&response);
        assert_eq!(body.message, UNEXPECTED_MESSAGE);
        assert_eq!(body.error, "Internal Server Error");
    }

    #[test]
    fn favicon_request_is_bare_404() {
        let responder = Responder::new(&GuardConfig::default());
        let response = responder.respond(
            &api("/favicon.ico"),
            &GuardError::Unexpected("no static handler".into()),
        );

        assert_eq!(response, Response::empty(404));
    }

    #[test]
    fn forbidden_and_not_found_statuses() {
        let responder = Responder::new(&GuardConfig::default());

        let forbidden = responder.respond(
            &api("/api/tasks/1"),
            &GuardError::Forbidden("You are not authorized to access this task".into()),
        );
        let missing = responder.respond(&api("/api/tasks/1"), &GuardError::NotFound("gone".into()));

        assert_eq!(forbidden.status, 403);
        assert_eq!(body_of(&forbidden).error, "Forbidden");
        assert_eq!(missing.status, 404);
        assert_eq!(body_of(&missing).error, "Not Found");
    }

    #[test]
    fn details_are_omitted_when_empty() {
        let plain = ErrorResponse::new(ErrorKind::NotFound, "gone", "/x");
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("details").is_none());

        let detailed = plain.with_details(vec!["line 1, column 2".to_string()]);
        let json = serde_json::to_value(&detailed).unwrap();
        assert_eq!(json["details"][0], "line 1, column 2");
    }
}
