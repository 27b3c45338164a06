use crate::context::Ctx;
use crate::error::GuardError;
use crate::request::{Principal, RequestMeta};
use crate::state::{Anonymous, Authenticated};
use crate::store::AccountStore;

const AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// The only way to construct a [`Ctx`].
///
/// `anonymous()` is for entry points that need no principal. `authenticate`
/// resolves the session username against the account store and fails with
/// [`GuardError::Unauthenticated`] if there is no session or no such account.
///
/// # Examples
///
/// ```
/// use task_guard::{ErrorKind, MemoryAccountStore, PrincipalGate, RequestMeta, Surface};
///
/// let accounts = MemoryAccountStore::new();
/// let meta = RequestMeta::new("req-1", "/api/tasks", Surface::Api).with_username("ghost");
///
/// let err = PrincipalGate::new(meta).authenticate(&accounts).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Unauthenticated);
/// ```
#[derive(Debug)]
pub struct PrincipalGate {
    meta: RequestMeta,
}

impl PrincipalGate {
    /// Creates a gate for the given request.
    pub fn new(meta: RequestMeta) -> Self {
        Self { meta }
    }

    /// Builds a context without a principal.
    pub fn anonymous(self) -> Ctx<Anonymous> {
        Ctx::new_anonymous(self.meta)
    }

    /// Resolves the session username to a stored account.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` if the request has no session username or the
    /// account does not exist; `Unexpected` if the store fails.
    pub fn authenticate<A>(self, accounts: &A) -> Result<Ctx<Authenticated>, GuardError>
    where
        A: AccountStore + ?Sized,
    {
        let mut meta = self.meta;
        let username = meta.username.take();
        let ctx = Ctx::new_anonymous(meta);

        let Some(username) = username else {
            ctx.log().debug(format_args!("no session principal"));
            return Err(GuardError::Unauthenticated(AUTHENTICATION_REQUIRED.to_string()));
        };

        match accounts.find_by_username(&username)? {
            Some(account) => Ok(ctx.into_authenticated(Principal {
                id: account.id(),
                username: account.username().to_string(),
            })),
            None => {
                ctx.log()
                    .warn(format_args!("session principal has no account"));
                Err(GuardError::Unauthenticated(AUTHENTICATION_REQUIRED.to_string()))
            }
        }
    }
}
