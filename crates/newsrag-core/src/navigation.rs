//! Navigation seam
//!
//! The request gateway forces a redirect to the login route when the
//! backend rejects the session; the router in `newsrag-routing` is the
//! usual implementation.

/// Route of the login view
pub const LOGIN_ROUTE: &str = "/login";

/// Default landing route for authenticated users
pub const HOME_ROUTE: &str = "/";

/// Something that can move the client to another route
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str);
}
