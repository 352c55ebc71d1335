//! `/auth` endpoints and the login flow that feeds the session store

use crate::request::ApiRequest;
use crate::{Gateway, messages};
use newsrag_core::models::UserInfo;
use newsrag_core::{Error, Notice, Notifier, Result};
use newsrag_session::SessionStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Credentials for `/auth/login`
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember_me: None,
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("remember_me", &self.remember_me)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Payload for `/auth/register`
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthApi {
    gateway: Arc<Gateway>,
}

impl AuthApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        self.gateway
            .send(ApiRequest::post("/auth/login").with_json(credentials)?)
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        self.gateway
            .send(ApiRequest::post("/auth/register").with_json(request)?)
            .await
    }

    /// Backend liveness message
    pub async fn health(&self) -> Result<String> {
        self.gateway.send(ApiRequest::get("/auth/health")).await
    }
}

/// Login, registration and logout against the session store
#[derive(Clone)]
pub struct AuthService {
    api: AuthApi,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl AuthService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        let session = gateway.session().clone();
        let notifier = gateway.notifier().clone();
        Self {
            api: AuthApi::new(gateway),
            session,
            notifier,
        }
    }

    /// Log in and hold the returned token
    ///
    /// The profile is seeded with the username used to log in.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let response = self.api.login(credentials).await?;
        if response.token.is_empty() {
            self.notifier.notify(&Notice::error(messages::REQUEST_FAILED));
            return Err(Error::InvalidEnvelope(
                "login response carried no token".to_string(),
            ));
        }

        self.session.set_token(response.token.clone());
        self.session
            .set_user_info(UserInfo::with_username(credentials.username.clone()))?;

        info!("Logged in");
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        self.api.register(request).await
    }

    /// Forget the local session; the backend keeps no server-side state to revoke
    pub fn logout(&self) -> bool {
        self.session.logout()
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("api", &self.api)
            .field("logged_in", &self.session.is_logged_in())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{gateway_expecting, gateway_returning};
    use crate::request::{RawResponse, RequestBody};
    use crate::transport::MockTransport;
    use newsrag_core::RecordingNotifier;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.method == Method::POST
                    && req.path == "/auth/login"
                    && req.body
                        == RequestBody::Json(
                            json!({"username": "testuser", "password": "password123"}),
                        )
            },
            json!({"token": "test-token-123", "tokenType": "Bearer"}),
        );

        let response = AuthApi::new(gateway)
            .login(&LoginRequest::new("testuser", "password123"))
            .await
            .unwrap();

        assert_eq!(response.token, "test-token-123");
        assert_eq!(response.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_service_login_populates_session() {
        let (gateway, session) =
            gateway_returning(json!({"token": "test-token-123"}));

        AuthService::new(gateway)
            .login(&LoginRequest::new("testuser", "password123"))
            .await
            .unwrap();

        assert_eq!(session.token(), "test-token-123");
        assert!(session.is_logged_in());
        assert_eq!(session.username(), "testuser");
    }

    #[tokio::test]
    async fn test_service_login_failure_leaves_session_empty() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(RawResponse::new(
                200,
                json!({"code": 401, "message": "用户名或密码错误"}),
            ))
        });
        let session = Arc::new(SessionStore::in_memory());
        let gateway = Arc::new(Gateway::builder(Arc::new(mock), session.clone()).build());

        let err = AuthService::new(gateway)
            .login(&LoginRequest::new("wronguser", "wrongpass"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Domain { code: 401, .. }));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_service_rejects_empty_token() {
        let mut mock = MockTransport::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(RawResponse::new(
                200,
                json!({"code": 200, "data": {"token": ""}}),
            ))
        });
        let session = Arc::new(SessionStore::in_memory());
        let notifier = RecordingNotifier::new();
        let gateway = Gateway::builder(Arc::new(mock), session.clone())
            .notifier(Arc::new(notifier.clone()))
            .build();

        let err = AuthService::new(Arc::new(gateway))
            .login(&LoginRequest::new("testuser", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidEnvelope(_)));
        assert!(!session.is_logged_in());
        assert_eq!(notifier.messages(), vec![messages::REQUEST_FAILED]);
    }

    #[tokio::test]
    async fn test_register_payload_is_camel_case() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.path == "/auth/register"
                    && req.body
                        == RequestBody::Json(json!({
                            "username": "newuser",
                            "password": "Password123",
                            "confirmPassword": "Password123",
                            "email": "newuser@example.com"
                        }))
            },
            json!({"userId": 1, "username": "newuser", "email": "newuser@example.com"}),
        );

        let response = AuthApi::new(gateway)
            .register(&RegisterRequest {
                username: "newuser".to_string(),
                password: "Password123".to_string(),
                confirm_password: "Password123".to_string(),
                email: "newuser@example.com".to_string(),
                full_name: None,
            })
            .await
            .unwrap();

        assert_eq!(response.user_id, Some(1));
        assert_eq!(response.username, "newuser");
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", LoginRequest::new("alice", "hunter2"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
