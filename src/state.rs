//! Type-state markers for request contexts.

use crate::request::Principal;

/// Marker for a context with no resolved principal.
///
/// `Ctx<Anonymous>` is what signup runs under.
#[derive(Debug, Clone, Copy)]
pub struct Anonymous {
    _private: (),
}

impl Anonymous {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// State of a context whose principal was resolved to a stored account.
///
/// Only [`crate::PrincipalGate`] can produce one.
#[derive(Debug, Clone)]
pub struct Authenticated {
    principal: Principal,
}

impl Authenticated {
    pub(crate) fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub(crate) fn principal(&self) -> &Principal {
        &self.principal
    }
}
