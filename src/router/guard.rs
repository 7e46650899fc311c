//! Session gate for protected routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Consulted by [`super::Router`] for every route whose `requires_auth()` is
//! true. A locally absent token redirects without touching the network; a
//! present token is validated with one "current user" probe. Every failure
//! collapses into the same redirect.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, Transport};
use crate::session::Session;

use super::table::RouteDef;

/// Validates a stored session token against the backend.
#[async_trait::async_trait]
pub trait AuthProbe: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backend does not accept the current session.
    async fn probe(&self) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
impl<T: Transport> AuthProbe for ApiClient<T> {
    async fn probe(&self) -> Result<(), ApiError> {
        self.get_current_user().await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl<P: AuthProbe + ?Sized> AuthProbe for Arc<P> {
    async fn probe(&self) -> Result<(), ApiError> {
        (**self).probe().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardPolicy {
    /// Drop the stored token when the probe fails. Off by default: a
    /// rejected token is left in storage.
    pub clear_token_on_reject: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

pub struct RouteGuard<P> {
    session: Session,
    probe: P,
    policy: GuardPolicy,
}

impl<P: AuthProbe> RouteGuard<P> {
    pub fn new(session: Session, probe: P, policy: GuardPolicy) -> Self {
        Self { session, probe, policy }
    }

    #[must_use]
    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    #[must_use]
    pub fn probe_client(&self) -> &P {
        &self.probe
    }

    /// Decide whether `route` may be entered with the current session.
    pub async fn check(&self, route: &RouteDef) -> GuardDecision {
        if !self.session.is_present() {
            tracing::info!(route = route.name, "no session token; redirecting to login");
            return GuardDecision::RedirectToLogin;
        }

        match self.probe.probe().await {
            Ok(()) => GuardDecision::Allow,
            Err(e) => {
                tracing::warn!(route = route.name, error = %e, code = e.error_code(), "session probe failed; redirecting to login");
                if self.policy.clear_token_on_reject {
                    if let Err(clear_err) = self.session.clear() {
                        tracing::warn!(error = %clear_err, "failed to clear rejected session token");
                    }
                }
                GuardDecision::RedirectToLogin
            }
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
