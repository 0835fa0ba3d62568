use async_trait::async_trait;
use chat_relay::{Error, Result, config::CredentialSource, llm::LlmClient};
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// What the mock returns when its queue of responses is empty.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Llm(String),
    Quota(String),
}

/// Mock LLM client for testing
#[derive(Debug, Default)]
pub struct MockLlmClient {
    pub responses: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
    pub failure: Option<MockFailure>,
    pub delay: Option<Duration>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(self, responses: Vec<&str>) -> Self {
        *self.responses.lock().unwrap() = responses.into_iter().map(String::from).collect();
        self
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.failure = Some(MockFailure::Llm(message.to_string()));
        self
    }

    pub fn with_quota_error(mut self, message: &str) -> Self {
        self.failure = Some(MockFailure::Quota(message.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(MockFailure::Llm(message)) => return Err(Error::llm(message.clone())),
            Some(MockFailure::Quota(message)) => return Err(Error::quota_exceeded(message.clone())),
            None => {}
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::llm("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

/// Credential that can be revoked mid-test.
#[derive(Debug)]
pub struct MockCredential {
    present: AtomicBool,
}

impl MockCredential {
    pub fn present() -> Self {
        Self {
            present: AtomicBool::new(true),
        }
    }

    pub fn absent() -> Self {
        Self {
            present: AtomicBool::new(false),
        }
    }

    pub fn revoke(&self) {
        self.present.store(false, Ordering::SeqCst);
    }
}

impl CredentialSource for MockCredential {
    fn api_key(&self) -> Option<String> {
        self.present
            .load(Ordering::SeqCst)
            .then(|| "test-api-key-0000".to_string())
    }

    fn name(&self) -> &str {
        "TEST_API_KEY"
    }
}
