//! Session store
//!
//! Holds the current `Session` in memory and mirrors every mutation to a
//! `SessionStorage` backend. Memory is authoritative: storage failures are
//! logged and otherwise ignored, degrading to a memory-only session.
//!
//! Observers get a `tokio::sync::watch` receiver that sees every change.

use newsrag_core::{
    Error, Result, SessionStorage,
    models::{Session, UserInfo},
    storage::{TOKEN_KEY, USER_INFO_KEY, USERNAME_KEY},
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::MemoryStorage;

/// Client session mirrored to durable storage
///
/// Shared as `Arc<SessionStore>` between the request gateway, the route
/// guard and the front end.
///
/// # Example
/// ```
/// use newsrag_session::SessionStore;
///
/// let store = SessionStore::in_memory();
/// store.init_from_storage();
/// assert!(!store.is_logged_in());
///
/// store.set_token("test-token-123");
/// assert!(store.is_logged_in());
/// assert_eq!(store.user_role(), "guest");
/// ```
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<Session>,
}

impl SessionStore {
    /// Create an empty store backed by `storage`
    ///
    /// Nothing is read until `init_from_storage` runs.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self { storage, state }
    }

    /// Store backed by process-local memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Rehydrate the in-memory session from storage
    ///
    /// Meant to run once at startup, before the first route guard check.
    /// A stored profile that cannot be parsed, or that exists without a
    /// token, is discarded and removed from storage.
    pub fn init_from_storage(&self) -> Session {
        let token = self.read(TOKEN_KEY).unwrap_or_default();

        let mut user_info = self
            .read(USER_INFO_KEY)
            .and_then(|raw| match serde_json::from_str::<UserInfo>(&raw) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable stored user profile");
                    self.forget(USER_INFO_KEY);
                    None
                }
            })
            .filter(|info| !info.is_empty());

        let mut username = self
            .read(USERNAME_KEY)
            .or_else(|| user_info.as_ref().and_then(|info| info.username.clone()))
            .unwrap_or_default();

        if token.is_empty() && (user_info.is_some() || !username.is_empty()) {
            warn!("Stored profile has no credential, discarding it");
            user_info = None;
            username.clear();
            self.forget(USER_INFO_KEY);
            self.forget(USERNAME_KEY);
        }

        let session = Session {
            token,
            user_info,
            username,
        };

        info!(
            logged_in = session.is_logged_in(),
            has_profile = session.user_info.is_some(),
            "Session rehydrated from storage"
        );

        self.state.send_replace(session.clone());
        session
    }

    /// Hold `token` and persist it
    ///
    /// An empty token is a logout: the profile and username go with it,
    /// since a profile is never held without a credential.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();

        if token.is_empty() {
            self.logout();
            return;
        }

        self.persist(TOKEN_KEY, &token);
        self.state.send_modify(|session| session.token = token);
        debug!("Session token updated");
    }

    /// Cache the user profile and persist it
    ///
    /// When the profile carries a username it is also stored on its own.
    ///
    /// # Errors
    /// - `Error::NoCredential` if no token is held: a profile cannot be
    ///   attached to an anonymous session
    /// - `Error::Serialization` if the profile cannot be encoded
    pub fn set_user_info(&self, info: UserInfo) -> Result<()> {
        if !self.has_token() {
            return Err(Error::NoCredential);
        }

        let encoded = serde_json::to_string(&info)?;
        self.persist(USER_INFO_KEY, &encoded);

        if let Some(username) = info.username.as_deref() {
            self.persist(USERNAME_KEY, username);
        }

        self.state.send_modify(|session| {
            if let Some(username) = info.username.as_ref() {
                session.username = username.clone();
            }
            session.user_info = Some(info);
        });

        debug!("Session profile updated");
        Ok(())
    }

    /// Clear token, profile and username from memory and storage
    ///
    /// Makes no network call. Idempotent: returns `false` when the session
    /// was already empty.
    pub fn logout(&self) -> bool {
        self.forget(TOKEN_KEY);
        self.forget(USER_INFO_KEY);
        self.forget(USERNAME_KEY);

        let cleared = self.state.send_if_modified(|session| {
            if *session == Session::default() {
                false
            } else {
                *session = Session::default();
                true
            }
        });

        if cleared {
            info!("Session cleared");
        }
        cleared
    }

    pub fn has_token(&self) -> bool {
        !self.state.borrow().token.is_empty()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_logged_in()
    }

    /// Current token; empty when anonymous
    pub fn token(&self) -> String {
        self.state.borrow().token.clone()
    }

    pub fn user_info(&self) -> Option<UserInfo> {
        self.state.borrow().user_info.clone()
    }

    pub fn username(&self) -> String {
        self.state.borrow().username.clone()
    }

    /// The profile role, or `"guest"` without a profile
    pub fn user_role(&self) -> String {
        self.state.borrow().role().to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    /// Copy of the whole session
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Observe session changes
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session storage");
                None
            }
        }
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "Failed to persist session value, keeping it in memory only");
        }
    }

    fn forget(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "Failed to remove session value from storage");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.state.borrow();
        f.debug_struct("SessionStore")
            .field("logged_in", &session.is_logged_in())
            .field("username", &session.username)
            .finish_non_exhaustive()
    }
}
