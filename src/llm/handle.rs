use super::LlmClient;
use crate::{Error, Result};
use std::{fmt, sync::Arc, time::Duration};

/// Process-wide handle to the remote model.
///
/// Built once at startup and shared read-only by every request handler.
#[derive(Clone)]
pub struct ModelHandle {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl ModelHandle {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` to the model, giving up once `timeout` has elapsed.
    pub async fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String> {
        tokio::time::timeout(timeout, self.client.complete(prompt))
            .await
            .map_err(|_| Error::Timeout(timeout))?
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
