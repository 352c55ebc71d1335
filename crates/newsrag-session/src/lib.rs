//! NewsRAG Session Store
//!
//! This crate holds the client-side session:
//! - `SessionStore`: in-memory session mirrored to durable storage
//! - `MemoryStorage`: process-local storage backend
//! - `FileStorage`: JSON file storage backend that survives restarts

mod atomic_writer;
pub mod file_storage;
pub mod memory;
pub mod store;

pub use file_storage::FileStorage;
pub use memory::MemoryStorage;
pub use store::SessionStore;
