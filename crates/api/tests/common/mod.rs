#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use sprezzia_api::auth::jwt::{generate_access_token, JwtConfig};
use sprezzia_api::config::{EvolutionConfig, ServerConfig};
use sprezzia_api::router::build_app_router;
use sprezzia_api::state::AppState;
use sprezzia_evolution::{ConnectionState, EvolutionError, MessageGateway, QrCode};

pub const TEST_SECRET: &str = "integration-test-secret-long-enough";

/// Build a test `ServerConfig` with safe defaults and no send delay.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
        max_upload_bytes: 15 * 1024 * 1024,
        whatsapp_send_delay_ms: 0,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        evolution: EvolutionConfig {
            api_url: "http://gateway.invalid".to_string(),
            api_key: "test".to_string(),
            instance_prefix: "sprezzia".to_string(),
            timeout_secs: 1,
        },
    }
}

/// A bearer token for `user_id` signed with the test secret.
pub fn token(user_id: &str) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Fake gateway
// ---------------------------------------------------------------------------

/// In-memory [`MessageGateway`] that records sends and fails on request.
#[derive(Default)]
pub struct FakeGateway {
    /// `(instance, number, text)` of every successful send.
    pub sent: Mutex<Vec<(String, String, String)>>,
    /// Numbers whose sends fail with a gateway error.
    pub failing_numbers: Mutex<HashSet<String>>,
    /// Instances that exist on the fake gateway.
    pub instances: Mutex<HashSet<String>>,
}

impl FakeGateway {
    pub fn fail_for(&self, number: &str) {
        self.failing_numbers.lock().unwrap().insert(number.to_string());
    }

    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn qr(instance: &str) -> QrCode {
        QrCode {
            base64: Some("data:image/png;base64,AAAA".to_string()),
            code: Some(format!("qr-{instance}")),
            pairing_code: None,
        }
    }
}

#[async_trait]
impl MessageGateway for FakeGateway {
    async fn create_instance(&self, instance: &str) -> Result<QrCode, EvolutionError> {
        if !self.instances.lock().unwrap().insert(instance.to_string()) {
            return Err(EvolutionError::Api {
                status: 403,
                body: "instance name already in use".to_string(),
            });
        }
        Ok(QrCode::default())
    }

    async fn connect(&self, instance: &str) -> Result<QrCode, EvolutionError> {
        Ok(Self::qr(instance))
    }

    async fn connection_state(&self, instance: &str) -> Result<ConnectionState, EvolutionError> {
        if self.instances.lock().unwrap().contains(instance) {
            Ok(ConnectionState::Connecting)
        } else {
            Err(EvolutionError::Api {
                status: 404,
                body: "instance does not exist".to_string(),
            })
        }
    }

    async fn logout(&self, _instance: &str) -> Result<(), EvolutionError> {
        Ok(())
    }

    async fn delete_instance(&self, instance: &str) -> Result<(), EvolutionError> {
        if self.instances.lock().unwrap().remove(instance) {
            Ok(())
        } else {
            Err(EvolutionError::Api {
                status: 404,
                body: "instance does not exist".to_string(),
            })
        }
    }

    async fn send_text(&self, instance: &str, number: &str, text: &str) -> Result<(), EvolutionError> {
        if self.failing_numbers.lock().unwrap().contains(number) {
            return Err(EvolutionError::Api {
                status: 500,
                body: "send failed".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((instance.to_string(), number.to_string(), text.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with a fresh fake gateway.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_gateway(pool, Arc::new(FakeGateway::default()))
}

/// Build the full application router around the given fake gateway, using
/// the same middleware stack as production.
pub fn build_test_app_with_gateway(pool: PgPool, gateway: Arc<FakeGateway>) -> Router {
    build_test_app_with_config(pool, gateway, test_config())
}

/// Like [`build_test_app_with_gateway`] with a caller-supplied config.
pub fn build_test_app_with_config(
    pool: PgPool,
    gateway: Arc<FakeGateway>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn authed(method: Method, uri: &str, token: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response {
    send(app, authed(Method::GET, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn get_public(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response {
    send(app, authed(Method::DELETE, uri, token).body(Body::empty()).unwrap()).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = authed(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, token, body).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, token, body).await
}

pub async fn patch_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PATCH, uri, token, body).await
}

/// Send a single-file multipart form.
pub async fn multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Response {
    let boundary = "sprezzia-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = authed(method, uri, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Create a project owned by `token`'s user and return its id.
pub async fn create_project(app: Router, token: &str, name: &str) -> i64 {
    let response = post_json(app, "/api/v1/projects", token, serde_json::json!({ "name": name })).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
