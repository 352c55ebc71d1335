//! HTTP request gateway
//!
//! The single outbound call path. A call runs through:
//! 1. request layers (bearer token first, then any extra layers)
//! 2. the transport
//! 3. `ErrorClassifier` for transport failures
//! 4. `EnvelopeDecoder` for envelope failures and unwrapping
//!
//! Nothing is retried.

use crate::classify::ErrorClassifier;
use crate::client::HttpClientConfig;
use crate::envelope::EnvelopeDecoder;
use crate::layers::{BearerAuth, RequestLayer};
use crate::request::{ApiRequest, RawResponse};
use crate::transport::{HttpTransport, Transport};
use newsrag_core::{Navigator, Notifier, Result, TracingNotifier};
use newsrag_session::SessionStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Outbound call path shared by every API wrapper
pub struct Gateway {
    transport: Arc<dyn Transport>,
    layers: Vec<Arc<dyn RequestLayer>>,
    classifier: ErrorClassifier,
    decoder: EnvelopeDecoder,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl Gateway {
    pub fn builder(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> GatewayBuilder {
        GatewayBuilder {
            transport,
            session,
            notifier: Arc::new(TracingNotifier),
            navigator: None,
            layers: Vec::new(),
        }
    }

    /// Builder over an `HttpTransport` rooted at `base_url`
    pub fn http(
        base_url: impl Into<String>,
        config: &HttpClientConfig,
        session: Arc<SessionStore>,
    ) -> Result<GatewayBuilder> {
        let transport = HttpTransport::new(base_url, config)?;
        Ok(Self::builder(Arc::new(transport), session))
    }

    /// Send a request and return the envelope's `data` unchanged
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send_value(&self, request: ApiRequest) -> Result<Value> {
        let response = self.dispatch(request).await?;
        self.decoder.decode(response)
    }

    /// Send a request and deserialize the envelope's `data`
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.dispatch(request).await?;
        self.decoder.decode_into(response)
    }

    /// Session the gateway authenticates with
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Where this gateway's failure notices go
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    async fn dispatch(&self, mut request: ApiRequest) -> Result<RawResponse> {
        for layer in &self.layers {
            layer.apply(&mut request);
        }

        debug!(
            authenticated = request.header("authorization").is_some(),
            "Dispatching request"
        );

        let outcome = self.transport.execute(request).await;
        self.classifier.inspect(outcome)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("layers", &self.layers.len())
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

/// Assembles a `Gateway`
pub struct GatewayBuilder {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Option<Arc<dyn Navigator>>,
    layers: Vec<Arc<dyn RequestLayer>>,
}

impl GatewayBuilder {
    /// Where failure notices go (default: logged only)
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Where a 401 sends the user
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Extra request layer, applied after the bearer token
    pub fn layer(mut self, layer: Arc<dyn RequestLayer>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn build(self) -> Gateway {
        let mut layers: Vec<Arc<dyn RequestLayer>> =
            vec![Arc::new(BearerAuth::new(self.session.clone()))];
        layers.extend(self.layers);

        Gateway {
            transport: self.transport,
            layers,
            classifier: ErrorClassifier::new(
                self.session.clone(),
                self.notifier.clone(),
                self.navigator,
            ),
            decoder: EnvelopeDecoder::new(self.notifier.clone()),
            session: self.session,
            notifier: self.notifier,
        }
    }
}
