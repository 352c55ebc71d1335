//! Request-side layers applied before a request reaches the transport

use crate::request::ApiRequest;
use newsrag_session::SessionStore;
use std::sync::Arc;

/// Rewrites an outgoing request
pub trait RequestLayer: Send + Sync {
    fn apply(&self, request: &mut ApiRequest);
}

/// Attaches `Authorization: Bearer <token>` while a token is held
#[derive(Debug, Clone)]
pub struct BearerAuth {
    session: Arc<SessionStore>,
}

impl BearerAuth {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

impl RequestLayer for BearerAuth {
    fn apply(&self, request: &mut ApiRequest) {
        let token = self.session.token();
        if !token.is_empty() {
            request.set_header("Authorization", format!("Bearer {}", token));
        }
    }
}

/// Adds a fixed set of headers to every request
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: Vec<(String, String)>,
}

impl StaticHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl RequestLayer for StaticHeaders {
    fn apply(&self, request: &mut ApiRequest) {
        for (name, value) in &self.headers {
            if request.header(name).is_none() {
                request.set_header(name.clone(), value.clone());
            }
        }
    }
}
