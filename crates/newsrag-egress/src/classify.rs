//! Transport-failure classification
//!
//! The single place where an expired session is torn down: a 401 notifies
//! the user, clears the session store and navigates to the login route.
//! Every failure produces exactly one notice and is then returned to the
//! caller.

use crate::messages;
use crate::request::RawResponse;
use newsrag_core::{Error, LOGIN_ROUTE, Navigator, Notice, Notifier, Result};
use newsrag_session::SessionStore;
use std::sync::Arc;
use tracing::warn;

/// Turns non-success transport outcomes into typed errors with side effects
#[derive(Clone)]
pub struct ErrorClassifier {
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ErrorClassifier {
    pub fn new(
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Option<Arc<dyn Navigator>>,
    ) -> Self {
        Self {
            session,
            notifier,
            navigator,
        }
    }

    /// Pass 2xx responses through; classify everything else
    pub fn inspect(&self, outcome: Result<RawResponse>) -> Result<RawResponse> {
        match outcome {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(self.reject(&response)),
            Err(error) if error.is_network() => {
                warn!(error = %error, "No response from backend");
                self.notify(messages::NETWORK_ERROR);
                Err(error)
            }
            Err(error) => {
                warn!(error = %error, "Request could not be sent");
                self.notify(messages::REQUEST_FAILED);
                Err(error)
            }
        }
    }

    fn reject(&self, response: &RawResponse) -> Error {
        let server_message = response.message().map(str::to_string);

        match response.status {
            401 => {
                warn!("Backend rejected the session, logging out");
                self.notify(messages::UNAUTHORIZED);
                self.session.logout();
                if let Some(navigator) = &self.navigator {
                    navigator.navigate(LOGIN_ROUTE);
                }
                Error::Unauthorized {
                    message: server_message.unwrap_or_else(|| messages::UNAUTHORIZED.to_string()),
                }
            }
            403 => {
                self.notify(messages::FORBIDDEN);
                Error::Forbidden {
                    message: server_message.unwrap_or_else(|| messages::FORBIDDEN.to_string()),
                }
            }
            404 => {
                self.notify(messages::NOT_FOUND);
                Error::NotFound {
                    message: server_message.unwrap_or_else(|| messages::NOT_FOUND.to_string()),
                }
            }
            status => {
                let message =
                    server_message.unwrap_or_else(|| messages::REQUEST_FAILED.to_string());
                warn!(status, message = %message, "Backend returned an error status");
                self.notify(&message);
                Error::Http { status, message }
            }
        }
    }

    fn notify(&self, message: &str) {
        self.notifier.notify(&Notice::error(message));
    }
}

impl std::fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorClassifier")
            .field("navigates", &self.navigator.is_some())
            .finish_non_exhaustive()
    }
}
