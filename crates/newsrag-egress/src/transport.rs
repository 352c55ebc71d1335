//! Transport: puts an `ApiRequest` on the wire
//!
//! A transport only distinguishes "a response came back" (any status) from
//! "no response" (connect failure, reset, timeout). Once a status is known
//! the call counts as answered, even if the body cannot be read. Classifying
//! statuses and reading envelopes happens in the gateway chain.

use crate::client::{HttpClientConfig, create_client};
use crate::request::{ApiRequest, RawResponse, RequestBody};
use async_trait::async_trait;
use newsrag_core::{Error, Result};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

/// Issues requests and returns whatever the backend answered
///
/// # Errors
/// Implementations return `Error::Network` or `Error::Timeout` only when no
/// response was received, and `Error::InvalidRequest` when the request
/// could not be built; HTTP error statuses are `Ok` responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// `reqwest`-based transport rooted at the API base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a transport for `base_url` (e.g. `http://localhost:8080/api`)
    pub fn new(base_url: impl Into<String>, config: &HttpClientConfig) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("API base URL is empty".to_string()));
        }

        Ok(Self {
            base_url,
            client: create_client(config)?,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, request: &ApiRequest) -> String {
        let path_and_query = request.path_and_query();
        if path_and_query.starts_with('/') {
            format!("{}{}", self.base_url, path_and_query)
        } else {
            format!("{}/{}", self.base_url, path_and_query)
        }
    }

    fn no_response(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout(self.timeout_secs)
        } else {
            Error::Network(error.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = self.url(&request);
        let mut builder = self.client.request(request.method.clone(), url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(file) => {
                let mut part = Part::bytes(file.content).file_name(file.file_name);
                if let Some(mime) = file.mime_type.as_deref() {
                    part = part
                        .mime_str(mime)
                        .map_err(|e| Error::InvalidRequest(format!("Invalid MIME type: {}", e)))?;
                }
                builder.multipart(Form::new().part("file", part))
            }
        };

        let http_request = builder
            .build()
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| self.no_response(e))?;
        let status = response.status().as_u16();

        let body = match response.text().await {
            Ok(text) => {
                debug!(status, bytes = text.len(), "Response received");
                parse_body(text)
            }
            Err(e) => {
                warn!(status, error = %e, "Failed to read response body");
                Value::Null
            }
        };

        Ok(RawResponse::new(status, body))
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or_else(|_| json!({ "message": text }))
}
