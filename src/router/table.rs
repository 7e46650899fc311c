//! Declarative route table.
//!
//! Layout routes (`base`) only group children and never match a path on
//! their own. A child inherits its parent's auth requirement.

/// Route identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    Base,
    Home,
    Auction,
    Login,
    Admin,
    AdminApprovals,
    AdminFish,
    AdminPendingAuctions,
    NotFound,
}

/// Page a route renders. Consumers map each page to whatever they display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Layout,
    Home,
    Auction,
    Login,
    Admin,
    AdminApprovals,
    AdminFish,
    AdminPendingAuctions,
    NotFound,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RouteDef {
    pub id: RouteId,
    pub name: &'static str,
    /// Absolute path; `None` for the catch-all.
    pub path: Option<&'static str>,
    pub parent: Option<RouteId>,
    /// Auth required by this route itself, before inheritance.
    pub auth: bool,
    /// Groups children without matching paths itself.
    pub layout: bool,
    pub page: Page,
}

impl RouteDef {
    /// Whether this route or any ancestor requires a session.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        if self.auth {
            return true;
        }
        self.parent
            .is_some_and(|parent| route(parent).requires_auth())
    }
}

const fn def(
    id: RouteId,
    name: &'static str,
    path: Option<&'static str>,
    parent: Option<RouteId>,
    auth: bool,
    page: Page,
) -> RouteDef {
    RouteDef { id, name, path, parent, auth, layout: false, page }
}

pub static ROUTES: [RouteDef; 9] = [
    RouteDef {
        id: RouteId::Base,
        name: "base",
        path: Some("/"),
        parent: None,
        auth: false,
        layout: true,
        page: Page::Layout,
    },
    def(RouteId::Home, "home", Some("/"), Some(RouteId::Base), false, Page::Home),
    def(RouteId::Auction, "auction", Some("/auction"), Some(RouteId::Base), false, Page::Auction),
    def(RouteId::Login, "login", Some("/login"), None, false, Page::Login),
    def(RouteId::Admin, "admin", Some("/admin"), None, true, Page::Admin),
    def(RouteId::AdminApprovals, "admin-approvals", Some("/admin/approvals"), Some(RouteId::Admin), false, Page::AdminApprovals),
    def(RouteId::AdminFish, "admin-fish", Some("/admin/fish"), Some(RouteId::Admin), false, Page::AdminFish),
    def(
        RouteId::AdminPendingAuctions,
        "admin-pending-auctions",
        Some("/admin/pending-auctions"),
        Some(RouteId::Admin),
        false,
        Page::AdminPendingAuctions,
    ),
    def(RouteId::NotFound, "not-found", None, None, false, Page::NotFound),
];

/// Table entry for `id`.
#[must_use]
pub fn route(id: RouteId) -> &'static RouteDef {
    ROUTES
        .iter()
        .find(|r| r.id == id)
        .unwrap_or(&ROUTES[ROUTES.len() - 1])
}

/// Table entry named `name`.
#[must_use]
pub fn route_by_name(name: &str) -> Option<&'static RouteDef> {
    ROUTES.iter().find(|r| r.name == name)
}

/// Resolve a navigation target to a route; unknown paths hit `not-found`.
///
/// Matching is case-insensitive. Query string, fragment and trailing
/// slash are ignored.
#[must_use]
pub fn resolve(target: &str) -> &'static RouteDef {
    let path = normalize(target);
    ROUTES
        .iter()
        .filter(|r| !r.layout)
        .find(|r| r.path == Some(path.as_str()))
        .unwrap_or_else(|| route(RouteId::NotFound))
}

fn normalize(target: &str) -> String {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    let trimmed = target[..end].trim().trim_end_matches('/').to_lowercase();
    if trimmed.is_empty() {
        return "/".to_owned();
    }
    if trimmed.starts_with('/') {
        trimmed
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
