//! Account registration.
//!
//! [`RegistrationForm::bind`] is the binding boundary: it applies the
//! password policy and wraps the identity fields as tainted input.
//! [`RegistrationGuard::register`] then admits the identity fields in a
//! fixed order and persists the account.

use serde::Deserialize;

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::classifier::classify;
use crate::context::Ctx;
use crate::error::{GuardError, DUPLICATE_ACCOUNT_MESSAGE};
use crate::hash::PasswordHasher;
use crate::model::{Account, NewAccount};
use crate::password::PasswordPolicy;
use crate::sanitizer::{sanitize, Sanitizer};
use crate::state::Anonymous;
use crate::store::AccountStore;
use crate::validate::IdentityField;
use crate::{Secret, Tainted, Verified};

/// Registration request body as submitted by the client.
#[derive(Clone, Default, Deserialize)]
pub struct RegistrationForm {
    /// Requested username
    pub username: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Raw password
    pub password: Option<String>,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl RegistrationForm {
    /// Applies the password policy and wraps the remaining fields.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::PolicyViolation` if the password is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use task_guard::{ErrorKind, PasswordPolicy, RegistrationForm};
    ///
    /// let form = RegistrationForm {
    ///     username: Some("newuser".into()),
    ///     email: Some("newuser@example.com".into()),
    ///     password: Some("<script>".into()),
    /// };
    ///
    /// let err = form.bind(&PasswordPolicy::default()).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    /// ```
    pub fn bind(self, policy: &PasswordPolicy) -> Result<IdentityCandidate, GuardError> {
        policy.check(self.password.as_deref())?;
        Ok(IdentityCandidate {
            username: Tainted::new(self.username),
            email: Tainted::new(self.email),
            password: Secret::new(self.password.unwrap_or_default()),
        })
    }
}

/// Registration input that passed the password policy.
///
/// Username and email are still untrusted.
#[derive(Debug)]
pub struct IdentityCandidate {
    username: Tainted<Option<String>>,
    email: Tainted<Option<String>>,
    password: Secret<String>,
}

/// Admits registrations and persists accounts.
///
/// Checks run in this order and stop at the first failure:
/// 1. classify the raw username, then the raw email
/// 2. sanitize both
/// 3. validate the sanitized username, then the sanitized email
/// 4. look up the sanitized username
/// 5. hash the raw password and save
pub struct RegistrationGuard<'s, A: ?Sized, H: ?Sized> {
    accounts: &'s A,
    hasher: &'s H,
    audit: Option<&'s AuditTrail>,
}

impl<'s, A, H> RegistrationGuard<'s, A, H>
where
    A: AccountStore + ?Sized,
    H: PasswordHasher + ?Sized,
{
    /// Creates a guard over the given store and hasher.
    pub fn new(accounts: &'s A, hasher: &'s H) -> Self {
        Self {
            accounts,
            hasher,
            audit: None,
        }
    }

    /// Records every outcome to `trail`.
    pub fn with_audit(mut self, trail: &'s AuditTrail) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// - `MalformedInput` if a field is malicious or malformed
    /// - `DuplicateResource` if the username is taken, including when a
    ///   concurrent registration wins the store's uniqueness check
    /// - `Unexpected` if the store fails
    pub fn register(
        &self,
        ctx: &Ctx<Anonymous>,
        candidate: IdentityCandidate,
    ) -> Result<Account, GuardError> {
        let result = self.admit(ctx, candidate);
        self.record(ctx, &result);
        result
    }

    fn admit(
        &self,
        ctx: &Ctx<Anonymous>,
        candidate: IdentityCandidate,
    ) -> Result<Account, GuardError> {
        let IdentityCandidate {
            username,
            email,
            password,
        } = candidate;
        let raw_username = username.into_inner();
        let raw_email = email.into_inner();

        for (field, raw) in [
            (IdentityField::Username, raw_username.as_deref()),
            (IdentityField::Email, raw_email.as_deref()),
        ] {
            if !classify(raw).is_clean() {
                ctx.log()
                    .warn(format_args!("registration rejected: {:?} flagged as malicious", field));
                return Err(GuardError::MalformedInput(field.malicious_message().to_string()));
            }
        }

        let username = sanitize(raw_username.as_deref()).unwrap_or_default();
        let email = sanitize(raw_email.as_deref()).unwrap_or_default();

        let username: Verified<String> = IdentityField::Username
            .sanitize(Tainted::new(username))
            .inspect_err(|_| {
                ctx.log()
                    .info(format_args!("registration rejected: username shape"))
            })?;
        let email: Verified<String> = IdentityField::Email
            .sanitize(Tainted::new(email))
            .inspect_err(|_| ctx.log().info(format_args!("registration rejected: email shape")))?;

        if self.accounts.find_by_username(username.as_ref())?.is_some() {
            ctx.log()
                .info(format_args!("registration rejected: username taken"));
            return Err(GuardError::DuplicateResource(
                DUPLICATE_ACCOUNT_MESSAGE.to_string(),
            ));
        }

        let hash = self.hasher.hash(&password);
        let account = self.accounts.save(NewAccount::new(username, email, hash))?;
        ctx.log().info(format_args!(
            "registered account {} ({})",
            account.id(),
            account.username()
        ));
        Ok(account)
    }

    fn record(&self, ctx: &Ctx<Anonymous>, result: &Result<Account, GuardError>) {
        let Some(trail) = self.audit else {
            return;
        };
        let event = match result {
            Ok(account) => AuditEvent::new(
                ctx.request_id(),
                Some(account.username()),
                AuditEventKind::Registration,
                AuditOutcome::Success,
            )
            .with_resource_id(account.id().to_string()),
            Err(err) => AuditEvent::new(
                ctx.request_id(),
                None::<String>,
                AuditEventKind::Registration,
                AuditOutcome::Rejected,
            )
            .with_reason(err.kind()),
        };
        trail.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::gate::PrincipalGate;
    use crate::hash::SaltedSha256Hasher;
    use crate::request::{RequestMeta, Surface};
    use crate::store::MemoryAccountStore;

    fn anon() -> Ctx<Anonymous> {
        PrincipalGate::new(RequestMeta::new("req-reg", "/signup", Surface::Page)).anonymous()
    }

    fn form(username: &str, email: &str, password: &str) -> RegistrationForm {
        RegistrationForm {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn register(
        store: &MemoryAccountStore,
        form: RegistrationForm,
    ) -> Result<Account, GuardError> {
        let candidate = form.bind(&PasswordPolicy::default())?;
        RegistrationGuard::new(store, &SaltedSha256Hasher).register(&anon(), candidate)
    }

    #[test]
    fn registers_valid_account() {
        let store = MemoryAccountStore::new();

        let account = register(&store, form("newuser123", "new@example.com", "ValidP@ss123")).unwrap();

        assert_eq!(account.username(), "newuser123");
        assert_eq!(account.email(), "new@example.com");
        assert!(account.is_verified());
        assert!(!account.password_hash().as_str().contains("ValidP@ss123"));
        assert!(SaltedSha256Hasher.verify(
            &Secret::new("ValidP@ss123".to_string()),
            account.password_hash()
        ));
    }

    #[test]
    fn stores_sanitized_fields() {
        let store = MemoryAccountStore::new();

        let account =
            register(&store, form("  alice\u{0}  ", " alice@example.com ", "pw12345")).unwrap();

        assert_eq!(account.username(), "alice");
        assert_eq!(account.email(), "alice@example.com");
    }

    #[test]
    fn malicious_username_is_rejected_before_shape() {
        let store = MemoryAccountStore::new();

        let err = register(&store, form("admin'--", "a@example.com", "pw12345")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.message(), IdentityField::Username.malicious_message());
        assert!(store.is_empty());
    }

    #[test]
    fn malicious_email_wins_over_bad_username_shape() {
        let store = MemoryAccountStore::new();

        let err = register(&store, form("ab", "<script>@x.com", "pw12345")).unwrap_err();

        assert_eq!(err.message(), IdentityField::Email.malicious_message());
    }

    #[test]
    fn malformed_fields_name_the_field() {
        let store = MemoryAccountStore::new();

        let username_err = register(&store, form("ab", "a@example.com", "pw12345")).unwrap_err();
        let email_err = register(&store, form("alice", "not-an-email", "pw12345")).unwrap_err();

        assert_eq!(username_err.message(), IdentityField::Username.invalid_message());
        assert_eq!(email_err.message(), IdentityField::Email.invalid_message());
    }

    #[test]
    fn absent_fields_are_malformed() {
        let store = MemoryAccountStore::new();
        let form = RegistrationForm {
            username: None,
            email: Some("a@example.com".to_string()),
            password: Some("pw12345".to_string()),
        };

        let err = register(&store, form).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn duplicate_username_is_conflict() {
        let store = MemoryAccountStore::new();
        register(&store, form("bob", "bob@example.com", "pw12345")).unwrap();

        let err = register(&store, form("bob", "other@example.com", "pw67890")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateResource);
        assert_eq!(err.message(), "Registration failed, user already exists");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn password_policy_runs_at_bind() {
        let err = form("carol", "carol@example.com", "  ")
            .bind(&PasswordPolicy::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    }

    #[test]
    fn sql_like_password_is_accepted() {
        let store = MemoryAccountStore::new();
        assert!(register(&store, form("dave", "dave@example.com", "p@ss;--word")).is_ok());
    }

    #[test]
    fn outcomes_are_audited_without_raw_input() {
        let store = MemoryAccountStore::new();
        let trail = AuditTrail::new();
        let guard = RegistrationGuard::new(&store, &SaltedSha256Hasher).with_audit(&trail);
        let policy = PasswordPolicy::default();

        guard
            .register(&anon(), form("erin", "erin@example.com", "pw12345").bind(&policy).unwrap())
            .unwrap();
        let _ = guard.register(
            &anon(),
            form("<script>", "x@example.com", "pw12345").bind(&policy).unwrap(),
        );

        let events = trail.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].outcome(), AuditOutcome::Success);
        assert_eq!(events[0].principal(), Some("erin"));
        assert_eq!(events[1].outcome(), AuditOutcome::Rejected);
        assert_eq!(events[1].principal(), None);
        assert_eq!(events[1].reason(), Some(ErrorKind::MalformedInput));
    }

    #[test]
    fn form_debug_redacts_password() {
        let debug = format!("{:?}", form("frank", "f@example.com", "hunter2"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
