//! NewsRAG Egress
//!
//! This crate talks to the knowledge-base backend:
//! - `Gateway`: the single outbound call path (bearer auth, failure
//!   classification, envelope unwrapping), built as an explicit chain
//! - `api`: one thin wrapper per backend endpoint
//! - `webhook`: the external answer-generation webhook, outside the envelope contract

pub mod api;
pub mod classify;
pub mod client;
pub mod envelope;
pub mod gateway;
pub mod layers;
pub mod request;
pub mod transport;
pub mod webhook;

pub use classify::ErrorClassifier;
pub use client::HttpClientConfig;
pub use envelope::EnvelopeDecoder;
pub use gateway::{Gateway, GatewayBuilder};
pub use layers::{BearerAuth, RequestLayer, StaticHeaders};
pub use request::{ApiRequest, RawResponse, RequestBody, UploadFile};
pub use transport::{HttpTransport, Transport};
pub use webhook::{WebhookClient, WebhookConfig, WebhookMode, WebhookPayload};

/// Messages shown to the user when a call fails
pub mod messages {
    pub const UNAUTHORIZED: &str = "Unauthorized, please log in";
    pub const FORBIDDEN: &str = "Access forbidden";
    pub const NOT_FOUND: &str = "Resource not found";
    pub const REQUEST_FAILED: &str = "Request failed";
    pub const NETWORK_ERROR: &str = "Network error";
}
