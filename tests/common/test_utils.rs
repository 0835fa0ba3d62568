use super::{MockCredential, MockLlmClient};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use chat_relay::{
    config::{Config, LlmConfig},
    llm::{LlmClient, ModelHandle},
    relay::RelayService,
    server::{self, AppState},
};
use serde_json::Value;
use std::sync::Arc;

/// Create a test LLM configuration with short timeouts
pub fn create_test_llm_config() -> LlmConfig {
    LlmConfig {
        model: "gemini-1.5-flash".to_string(),
        chat_timeout_secs: 2,
        status_timeout_secs: 1,
        ..LlmConfig::default()
    }
}

pub fn create_test_config() -> Config {
    Config {
        llm: create_test_llm_config(),
        ..Config::default()
    }
}

/// Build the full router around a mock client and a revocable credential
pub fn create_test_app(
    client: MockLlmClient,
) -> (Router, Arc<MockLlmClient>, Arc<MockCredential>) {
    create_test_app_with_config(client, create_test_llm_config())
}

pub fn create_test_app_with_config(
    client: MockLlmClient,
    config: LlmConfig,
) -> (Router, Arc<MockLlmClient>, Arc<MockCredential>) {
    let client = Arc::new(client);
    let (app, credential) = create_app_with_client(client.clone(), &config);
    (app, client, credential)
}

/// Build the router around any client, e.g. a real one pointed at a mock provider
pub fn create_app_with_client(
    client: Arc<dyn LlmClient>,
    config: &LlmConfig,
) -> (Router, Arc<MockCredential>) {
    let credential = Arc::new(MockCredential::present());
    let handle = ModelHandle::new(client, config.model.clone());
    let relay = RelayService::new(handle, credential.clone(), config);

    let app = server::router(AppState {
        relay: Arc::new(relay),
    });

    (app, credential)
}

pub fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8080
  logs:
    level: "debug"

llm:
  base_url: "http://localhost:9999/v1"
  model: "gemini-1.5-pro"
  api_key_env: "RELAY_TEST_KEY"
  chat_timeout_secs: 15
  status_timeout_secs: 5
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
"#;
