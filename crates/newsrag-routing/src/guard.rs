//! Navigation-time authentication check
//!
//! Two logical states, Authenticated and Anonymous, read from the session
//! store on every check:
//! - Anonymous entering a protected route is redirected to the login route
//! - Authenticated entering the login route is redirected to the home route
//! - anything else proceeds unchanged
//!
//! The guard never changes the session.

use crate::table::{RouteTable, normalize};
use newsrag_core::{HOME_ROUTE, LOGIN_ROUTE};
use newsrag_session::SessionStore;
use std::sync::Arc;
use tracing::debug;

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>, table: RouteTable) -> Self {
        Self { session, table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide whether navigation to `to` may proceed
    ///
    /// Targets with no route entry proceed regardless of the session.
    pub fn check(&self, to: &str) -> GuardDecision {
        let logged_in = self.session.is_logged_in();
        let requires_auth = self
            .table
            .find(to)
            .is_some_and(|route| route.requires_auth);

        let decision = if requires_auth && !logged_in {
            GuardDecision::Redirect(LOGIN_ROUTE.to_string())
        } else if logged_in && normalize(to) == LOGIN_ROUTE {
            GuardDecision::Redirect(HOME_ROUTE.to_string())
        } else {
            GuardDecision::Proceed
        };

        debug!(to, logged_in, ?decision, "Route guard check");
        decision
    }
}
