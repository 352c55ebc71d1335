//! Error types for NewsRAG Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The backend answered with an envelope whose `code` is not 200
    #[error("Request rejected ({code}): {message}")]
    Domain { code: i64, message: String },

    /// HTTP 401: the session credential is missing or expired
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// HTTP 403
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// HTTP 404
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other non-success HTTP status
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// No response was received (connection refused, DNS, reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    /// A success status whose body is not a response envelope
    #[error("Invalid response envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Session errors
    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("No session token is held")]
    NoCredential,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status carried by a transport failure that received a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::Forbidden { .. } => Some(403),
            Error::NotFound { .. } => Some(404),
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure means the session credential is no longer valid
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// Whether the request never produced a response
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = Error::Unauthorized {
            message: "expired".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_auth_expired());

        let err = Error::Http {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_auth_expired());

        assert_eq!(Error::Network("refused".to_string()).status(), None);
        assert_eq!(
            Error::Domain {
                code: 500,
                message: "boom".to_string()
            }
            .status(),
            None
        );
    }

    #[test]
    fn test_error_display_formatting() {
        let err = Error::Domain {
            code: 500,
            message: "用户名已存在".to_string(),
        };
        assert_eq!(err.to_string(), "Request rejected (500): 用户名已存在");

        assert_eq!(Error::Timeout(60).to_string(), "Request timeout after 60s");
        assert!(Error::NoCredential.to_string().contains("token"));
    }

    #[test]
    fn test_network_classification() {
        assert!(Error::Timeout(60).is_network());
        assert!(Error::Network("reset".to_string()).is_network());
        assert!(
            !Error::NotFound {
                message: "gone".to_string()
            }
            .is_network()
        );
    }
}
