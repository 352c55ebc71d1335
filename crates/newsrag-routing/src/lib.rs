//! NewsRAG Routing
//!
//! This crate provides client-side navigation:
//! - Route table with per-route authentication requirements
//! - Route guard deciding whether a navigation proceeds or redirects
//! - In-process router that follows guard redirects and publishes the
//!   current route

pub mod guard;
pub mod router;
pub mod table;

pub use guard::{GuardDecision, RouteGuard};
pub use router::Router;
pub use table::{Route, RouteTable};
