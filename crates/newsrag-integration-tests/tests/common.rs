//! Common test utilities for integration tests

use newsrag_core::RecordingNotifier;
use newsrag_egress::api::{Api, AuthService};
use newsrag_egress::{Gateway, HttpClientConfig};
use newsrag_routing::{RouteTable, Router};
use newsrag_session::{FileStorage, SessionStore};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// A client stack over a file-backed session, as a front end would build it
#[allow(dead_code)]
pub struct Client {
    pub session: Arc<SessionStore>,
    pub router: Arc<Router>,
    pub notifier: RecordingNotifier,
    pub api: Api,
    pub auth: AuthService,
}

#[allow(dead_code)]
impl Client {
    /// Build a client and rehydrate its session from `session_file`
    pub fn start(server: &MockServer, session_file: &Path) -> Self {
        let storage = FileStorage::new(session_file.to_path_buf()).unwrap();
        let session = Arc::new(SessionStore::new(Arc::new(storage)));
        session.init_from_storage();

        let router = Arc::new(Router::new(session.clone(), RouteTable::default()));
        let notifier = RecordingNotifier::new();

        let gateway = Gateway::http(
            format!("{}/api", server.uri()),
            &HttpClientConfig::default(),
            session.clone(),
        )
        .unwrap()
        .notifier(Arc::new(notifier.clone()))
        .navigator(router.clone())
        .build();
        let gateway = Arc::new(gateway);

        Self {
            session,
            router,
            notifier,
            api: Api::new(gateway.clone()),
            auth: AuthService::new(gateway),
        }
    }
}

/// Temporary directory holding a session file path
#[allow(dead_code)]
pub fn session_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("session.json");
    (dir, file)
}

/// Envelope wrapping `data` with the success code
#[allow(dead_code)]
pub fn ok(data: Value) -> Value {
    json!({
        "code": 200,
        "message": "success",
        "data": data,
        "timestamp": 1700000000000i64
    })
}

/// Mount a login endpoint that issues `token`
#[allow(dead_code)]
pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!({"token": token, "tokenType": "Bearer"}))),
        )
        .mount(server)
        .await;
}
