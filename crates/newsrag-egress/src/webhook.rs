//! Client for the external answer-generation webhook
//!
//! The webhook sits outside the backend's envelope contract: its JSON body
//! is returned as-is and failures are reported to the caller without any
//! notification or session side effects.

use crate::api::AskRequest;
use crate::client::{HttpClientConfig, create_client};
use newsrag_core::{Error, Result};
use newsrag_session::SessionStore;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Payload shape the deployed workflow expects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookMode {
    /// `{query, topK, needAnswer, similarityThreshold}`
    #[default]
    Retrieval,
    /// `{query, userId, topK, enableWebSearch}`
    Agent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub mode: WebhookMode,
    pub similarity_threshold: Option<f64>,
    pub enable_web_search: bool,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 60,
            mode: WebhookMode::default(),
            similarity_threshold: None,
            enable_web_search: false,
        }
    }

    pub fn with_mode(mut self, mode: WebhookMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Body posted to the webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    #[serde(rename_all = "camelCase")]
    Agent {
        query: String,
        user_id: Option<i64>,
        top_k: u32,
        enable_web_search: bool,
    },
    #[serde(rename_all = "camelCase")]
    Retrieval {
        query: String,
        top_k: u32,
        need_answer: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        similarity_threshold: Option<f64>,
    },
}

pub struct WebhookClient {
    config: WebhookConfig,
    client: Client,
    session: Option<Arc<SessionStore>>,
}

impl WebhookClient {
    /// Create a client; `session` supplies the bearer token and user id when present
    pub fn new(config: WebhookConfig, session: Option<Arc<SessionStore>>) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(Error::Config("Webhook URL is empty".to_string()));
        }

        let client = create_client(
            &HttpClientConfig::default().with_timeout_secs(config.timeout_secs),
        )?;

        Ok(Self {
            config,
            client,
            session,
        })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Payload for `request` in the configured mode
    ///
    /// A threshold on the request overrides the configured one. The agent
    /// shape has no answer or threshold fields, so those are dropped there.
    pub fn payload(&self, request: &AskRequest) -> WebhookPayload {
        let query = request.query.clone();
        let top_k = request.top_k;
        match self.config.mode {
            WebhookMode::Retrieval => WebhookPayload::Retrieval {
                query,
                top_k,
                need_answer: request.need_answer,
                similarity_threshold: request
                    .similarity_threshold
                    .or(self.config.similarity_threshold),
            },
            WebhookMode::Agent => WebhookPayload::Agent {
                query,
                user_id: self
                    .session
                    .as_ref()
                    .and_then(|s| s.user_info())
                    .and_then(|info| info.id),
                top_k,
                enable_web_search: self.config.enable_web_search,
            },
        }
    }

    /// Ask a question with the configured payload shape
    pub async fn ask(&self, request: &AskRequest) -> Result<Value> {
        let payload = self.payload(request);
        self.send(&payload).await
    }

    /// POST `payload` and return the response body unchanged
    #[instrument(skip(self, payload), fields(url = %self.config.url))]
    pub async fn send(&self, payload: &WebhookPayload) -> Result<Value> {
        let mut builder = self.client.post(&self.config.url).json(payload);

        if let Some(token) = self
            .session
            .as_ref()
            .map(|s| s.token())
            .filter(|t| !t.is_empty())
        {
            builder = builder.bearer_auth(token);
        }

        let request = builder
            .build()
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.no_response(e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.no_response(e))?;

        if !(200..300).contains(&status) {
            warn!(status, "Webhook returned an error status");
            return Err(Error::Http {
                status,
                message: text,
            });
        }

        debug!(status, bytes = text.len(), "Webhook response received");

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    fn no_response(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout(self.config.timeout_secs)
        } else {
            Error::Network(error.to_string())
        }
    }
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("config", &self.config)
            .field("authenticated", &self.session.is_some())
            .finish()
    }
}
