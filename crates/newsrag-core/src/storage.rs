//! Durable key-value storage backing the session store
//!
//! The session layer persists three flat keys with no namespacing or
//! versioning. Implementations must survive process restarts to be useful
//! for rehydration, but callers treat every write as best-effort.

use crate::Result;

/// Key holding the opaque bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-serialized user profile
pub const USER_INFO_KEY: &str = "userInfo";

/// Key holding the username for quick access
pub const USERNAME_KEY: &str = "username";

/// Flat string key-value storage
///
/// Implementations:
/// - `MemoryStorage`: process-local, for tests and ephemeral sessions
/// - `FileStorage`: a JSON file on disk that survives restarts
pub trait SessionStorage: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    ///
    /// # Errors
    /// - `Error::Storage` if the backing store cannot be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    ///
    /// # Errors
    /// - `Error::Storage` / `Error::Io` if the value cannot be persisted
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing an absent key is not an error
    ///
    /// # Errors
    /// - `Error::Storage` / `Error::Io` if the removal cannot be persisted
    fn remove(&self, key: &str) -> Result<()>;
}
