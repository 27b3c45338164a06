use crate::logging::RequestLog;
use crate::request::{Principal, RequestMeta, Surface};
use crate::state::{Anonymous, Authenticated};

/// Execution context for one request.
///
/// `Ctx<S>` is generic over its authentication state:
/// - `Ctx<Anonymous>`: no principal; used by signup
/// - `Ctx<Authenticated>`: principal resolved to a stored account
///
/// Task operations take `&Ctx<Authenticated>`, so they cannot be reached
/// without a resolved principal.
///
/// # Examples
///
/// ```
/// use task_guard::{AccountStore, MemoryAccountStore, PrincipalGate, RequestMeta, Surface};
/// # use task_guard::{PasswordPolicy, RegistrationForm, RegistrationGuard, SaltedSha256Hasher};
///
/// let accounts = MemoryAccountStore::new();
/// # let form = RegistrationForm {
/// #     username: Some("alice".into()),
/// #     email: Some("alice@example.com".into()),
/// #     password: Some("ValidP@ss123".into()),
/// # };
/// # let anon = PrincipalGate::new(RequestMeta::new("req-0", "/signup", Surface::Page)).anonymous();
/// # let candidate = form.bind(&PasswordPolicy::default()).unwrap();
/// # RegistrationGuard::new(&accounts, &SaltedSha256Hasher).register(&anon, candidate).unwrap();
/// let meta = RequestMeta::new("req-1", "/api/tasks", Surface::Api).with_username("alice");
/// let ctx = PrincipalGate::new(meta).authenticate(&accounts).unwrap();
///
/// assert_eq!(ctx.principal().username, "alice");
/// assert_eq!(ctx.request_id(), "req-1");
/// ```
#[derive(Debug, Clone)]
pub struct Ctx<S = Authenticated> {
    request_id: String,
    path: String,
    surface: Surface,
    state: S,
}

impl<S> Ctx<S> {
    /// Returns the request ID for this context.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the client surface.
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Returns a logger stamped with this request's id and path.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id, &self.path)
    }
}

impl Ctx<Anonymous> {
    pub(crate) fn new_anonymous(meta: RequestMeta) -> Self {
        Self {
            request_id: meta.request_id,
            path: meta.path,
            surface: meta.surface,
            state: Anonymous::new(),
        }
    }

    pub(crate) fn into_authenticated(self, principal: Principal) -> Ctx<Authenticated> {
        Ctx {
            request_id: self.request_id,
            path: self.path,
            surface: self.surface,
            state: Authenticated::new(principal),
        }
    }
}

impl Ctx<Authenticated> {
    /// The resolved principal.
    pub fn principal(&self) -> &Principal {
        self.state.principal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountId;

    #[test]
    fn anonymous_ctx_carries_metadata() {
        let ctx = Ctx::new_anonymous(RequestMeta::new("req-1", "/signup", Surface::Page));

        assert_eq!(ctx.request_id(), "req-1");
        assert_eq!(ctx.path(), "/signup");
        assert_eq!(ctx.surface(), Surface::Page);
        assert_eq!(ctx.log().request_id(), "req-1");
    }

    #[test]
    fn promotion_keeps_metadata() {
        let ctx = Ctx::new_anonymous(RequestMeta::new("req-2", "/api/tasks", Surface::Api))
            .into_authenticated(Principal {
                id: AccountId(9),
                username: "erin".to_string(),
            });

        assert_eq!(ctx.request_id(), "req-2");
        assert_eq!(ctx.principal().id, AccountId(9));
        assert_eq!(ctx.principal().username, "erin");
    }
}
