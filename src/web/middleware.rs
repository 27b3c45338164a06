//! Builds request contexts from a [`RequestAdapter`].
//!
//! ```text
//! transport request
//!   -> RequestAdapter
//!   -> extract_anonymous() / extract_authenticated()
//!   -> (Ctx, TaintedInputs)
//!   -> guards and services
//! ```

use crate::context::Ctx;
use crate::error::GuardError;
use crate::gate::PrincipalGate;
use crate::state::{Anonymous, Authenticated};
use crate::store::AccountStore;

use super::{ExtractMetadata, ExtractTaintedInputs, RequestAdapter, TaintedInputs};

/// An anonymous context paired with the request's untrusted inputs.
///
/// # Examples
///
/// ```
/// use task_guard::web::{extract_anonymous, RequestAdapter};
///
/// let extraction = extract_anonymous(&RequestAdapter::new("req-001", "/signup"));
/// assert_eq!(extraction.context.request_id(), "req-001");
/// ```
#[derive(Debug)]
pub struct AnonymousExtraction {
    /// Context without a principal
    pub context: Ctx<Anonymous>,
    /// Untrusted inputs
    pub inputs: TaintedInputs,
}

/// An authenticated context paired with the request's untrusted inputs.
#[derive(Debug)]
pub struct AuthenticatedExtraction {
    /// Context with a resolved principal
    pub context: Ctx<Authenticated>,
    /// Untrusted inputs
    pub inputs: TaintedInputs,
}

/// Extracts an anonymous context. Never fails.
pub fn extract_anonymous(adapter: &RequestAdapter) -> AnonymousExtraction {
    AnonymousExtraction {
        context: PrincipalGate::new(adapter.extract_metadata()).anonymous(),
        inputs: adapter.extract_tainted_inputs(),
    }
}

/// Extracts a context whose principal is a stored account.
///
/// # Errors
///
/// `Unauthenticated` if the request has no session or the session names no
/// account; `Unexpected` if the store fails.
pub fn extract_authenticated<A>(
    adapter: &RequestAdapter,
    accounts: &A,
) -> Result<AuthenticatedExtraction, GuardError>
where
    A: AccountStore + ?Sized,
{
    let context = PrincipalGate::new(adapter.extract_metadata()).authenticate(accounts)?;
    Ok(AuthenticatedExtraction {
        context,
        inputs: adapter.extract_tainted_inputs(),
    })
}
