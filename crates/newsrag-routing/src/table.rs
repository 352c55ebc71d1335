//! Route table
//!
//! Routes are matched on their path only; a query string or trailing slash
//! on the navigation target is ignored.

use newsrag_core::{HOME_ROUTE, LOGIN_ROUTE};
use serde::{Deserialize, Serialize};

/// A named client route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub path: String,
    pub name: String,
    /// Anonymous users are redirected to the login route
    pub requires_auth: bool,
}

impl Route {
    pub fn public(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requires_auth: false,
        }
    }

    pub fn protected(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requires_auth: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Add a route; a later route with the same path replaces the earlier one
    pub fn add(&mut self, route: Route) {
        self.routes.retain(|r| r.path != route.path);
        self.routes.push(route);
    }

    pub fn with(mut self, route: Route) -> Self {
        self.add(route);
        self
    }

    /// Route registered for `target`, if any
    pub fn find(&self, target: &str) -> Option<&Route> {
        let path = normalize(target);
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    /// `/login` is public; `/`, `/search`, `/chat` and `/knowledge` need a session
    fn default() -> Self {
        Self::new()
            .with(Route::public(LOGIN_ROUTE, "Login"))
            .with(Route::protected(HOME_ROUTE, "Home"))
            .with(Route::protected("/search", "Search"))
            .with(Route::protected("/chat", "Chat"))
            .with(Route::protected("/knowledge", "Knowledge"))
    }
}

/// Path part of a navigation target, without query, fragment or trailing slash
pub(crate) fn normalize(target: &str) -> &str {
    let path = target
        .split(['?', '#'])
        .next()
        .unwrap_or(target);

    match path.trim_end_matches('/') {
        "" => HOME_ROUTE,
        trimmed => trimmed,
    }
}
