//! Configuration drives the client stack

use newsrag_config_file::ClientConfig;
use newsrag_egress::api::AskRequest;
use newsrag_egress::{Gateway, WebhookClient, WebhookMode};
use newsrag_session::{FileStorage, SessionStore};
use serde_json::json;
use serial_test::serial;
use std::io::Write;
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let file = dir.path().join("config.yaml");
    let mut handle = std::fs::File::create(&file).unwrap();
    handle.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
#[serial]
async fn test_config_file_points_client_at_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kb/api/auth/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": "OK"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let session_path = dir.path().join("session.json");
    let config_path = write_config(
        &dir,
        &format!(
            "api:\n  base_url: \"{}/kb/api\"\nsession:\n  storage_path: \"{}\"\n",
            server.uri(),
            session_path.display()
        ),
    );

    // SAFETY: serialized with other environment-touching tests
    unsafe { std::env::remove_var("NEWSRAG_API_BASE_URL") };
    let config = ClientConfig::load(Some(config_path.as_path())).unwrap();

    let session = Arc::new(SessionStore::new(Arc::new(
        FileStorage::new(config.session_path()).unwrap(),
    )));
    let gateway = Gateway::http(
        config.api.base_url.clone(),
        &config.http_client_config(),
        session,
    )
    .unwrap()
    .build();

    let health = newsrag_egress::api::AuthApi::new(Arc::new(gateway))
        .health()
        .await
        .unwrap();
    assert_eq!(health, "OK");
}

#[tokio::test]
#[serial]
async fn test_webhook_config_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/agent"))
        .and(body_json(json!({
            "query": "本周热点",
            "userId": null,
            "topK": 5,
            "enableWebSearch": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "..."})))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let config_path = write_config(
        &dir,
        &format!(
            "webhook:\n  url: \"{}/webhook/agent\"\n  payload: agent\n  enable_web_search: true\n",
            server.uri()
        ),
    );

    // SAFETY: serialized with other environment-touching tests
    unsafe { std::env::remove_var("NEWSRAG_WEBHOOK_URL") };
    let config = ClientConfig::load(Some(config_path.as_path())).unwrap();
    let webhook = config.webhook_config().unwrap();
    assert_eq!(webhook.mode, WebhookMode::Agent);

    let client = WebhookClient::new(webhook, None).unwrap();
    let value = client.ask(&AskRequest::new("本周热点")).await.unwrap();
    assert_eq!(value["output"], "...");
}
