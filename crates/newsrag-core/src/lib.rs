//! NewsRAG Core Types and Traits
//!
//! This crate provides the fundamental types and traits shared by the
//! NewsRAG client crates:
//! - The backend response envelope and domain models
//! - The error taxonomy used by the request gateway
//! - Seams for durable session storage, user notifications and navigation

pub mod envelope;
pub mod error;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod storage;

pub use envelope::Envelope;
pub use error::{Error, Result};
pub use navigation::{HOME_ROUTE, LOGIN_ROUTE, Navigator};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::SessionStorage;
