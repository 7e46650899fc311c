//! Navigation: route table lookup plus one centralized guard.

pub mod guard;
pub mod table;

pub use guard::{AuthProbe, GuardDecision, GuardPolicy, RouteGuard};
pub use table::{Page, RouteDef, RouteId, resolve, route, route_by_name};

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Enter `route`.
    Allow(&'static RouteDef),
    /// `from` was refused; go to `to` (the login route) instead.
    Redirect { from: &'static RouteDef, to: &'static RouteDef },
}

impl Navigation {
    /// Route the user ends up on.
    #[must_use]
    pub fn destination(&self) -> &'static RouteDef {
        match self {
            Self::Allow(route) => route,
            Self::Redirect { to, .. } => to,
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

pub struct Router<P> {
    guard: RouteGuard<P>,
}

impl<P: AuthProbe> Router<P> {
    pub fn new(guard: RouteGuard<P>) -> Self {
        Self { guard }
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard<P> {
        &self.guard
    }

    /// Navigate to a path such as `/admin/fish?area=PI01`.
    pub async fn navigate(&self, target: &str) -> Navigation {
        self.enter(resolve(target)).await
    }

    /// Navigate to a route by name; `None` if no routable route has that
    /// name (layouts are not routable).
    pub async fn navigate_named(&self, name: &str) -> Option<Navigation> {
        let route = route_by_name(name).filter(|r| !r.layout)?;
        Some(self.enter(route).await)
    }

    async fn enter(&self, route: &'static RouteDef) -> Navigation {
        if !route.requires_auth() {
            return Navigation::Allow(route);
        }

        match self.guard.check(route).await {
            GuardDecision::Allow => Navigation::Allow(route),
            GuardDecision::RedirectToLogin => Navigation::Redirect { from: route, to: table::route(RouteId::Login) },
        }
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
