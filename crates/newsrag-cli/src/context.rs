//! Wiring of session, router, gateway and API clients for one invocation

use crate::console::ConsoleNotifier;
use anyhow::Context as _;
use newsrag_config_file::ClientConfig;
use newsrag_egress::api::{Api, AuthService};
use newsrag_egress::{Gateway, WebhookClient};
use newsrag_routing::{RouteTable, Router};
use newsrag_session::{FileStorage, SessionStore};
use std::sync::Arc;
use tracing::debug;

pub struct Context {
    pub session: Arc<SessionStore>,
    pub router: Arc<Router>,
    pub api: Api,
    pub auth: AuthService,
    pub webhook: Option<WebhookClient>,
}

impl Context {
    /// Rehydrate the session from disk and build the client stack on top of it
    pub fn build(config: &ClientConfig) -> anyhow::Result<Self> {
        let storage = FileStorage::new(config.session_path())
            .with_context(|| format!("Invalid session file {}", config.session.storage_path))?;
        let session = Arc::new(SessionStore::new(Arc::new(storage)));
        session.init_from_storage();
        debug!(logged_in = session.is_logged_in(), "Session restored");

        let router = Arc::new(Router::new(session.clone(), RouteTable::default()));

        let gateway = Gateway::http(
            config.api.base_url.clone(),
            &config.http_client_config(),
            session.clone(),
        )
        .context("Failed to create API client")?
        .notifier(Arc::new(ConsoleNotifier))
        .navigator(router.clone())
        .build();
        let gateway = Arc::new(gateway);

        let webhook = config
            .webhook_config()
            .map(|webhook| WebhookClient::new(webhook, Some(session.clone())))
            .transpose()
            .context("Failed to create webhook client")?;

        Ok(Self {
            session,
            router,
            api: Api::new(gateway.clone()),
            auth: AuthService::new(gateway),
            webhook,
        })
    }
}
