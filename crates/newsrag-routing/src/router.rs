//! In-process router
//!
//! Runs the route guard on every navigation and follows its redirects. The
//! current route is published on a `watch` channel so views can react.

use crate::guard::{GuardDecision, RouteGuard};
use crate::table::RouteTable;
use newsrag_core::{LOGIN_ROUTE, Navigator};
use newsrag_session::SessionStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Redirects followed for one navigation before giving up
pub const MAX_REDIRECTS: usize = 5;

pub struct Router {
    guard: RouteGuard,
    current: watch::Sender<String>,
}

impl Router {
    /// Create a router starting at the login route
    pub fn new(session: Arc<SessionStore>, table: RouteTable) -> Self {
        Self {
            guard: RouteGuard::new(session, table),
            current: watch::Sender::new(LOGIN_ROUTE.to_string()),
        }
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Navigate to `to`, following guard redirects
    ///
    /// Returns the route that was entered. If redirects do not settle within
    /// `MAX_REDIRECTS` the current route is left unchanged.
    pub fn push(&self, to: &str) -> String {
        let mut target = to.to_string();

        for _ in 0..=MAX_REDIRECTS {
            match self.guard.check(&target) {
                GuardDecision::Proceed => {
                    info!(from = to, to = %target, "Navigated");
                    self.current.send_replace(target.clone());
                    return target;
                }
                GuardDecision::Redirect(next) => target = next,
            }
        }

        warn!(to, "Navigation redirected too many times, staying put");
        self.current()
    }

    /// The route last entered
    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }
}

impl Navigator for Router {
    fn navigate(&self, to: &str) {
        self.push(to);
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("current", &*self.current.borrow())
            .field("routes", &self.guard.table().len())
            .finish()
    }
}
