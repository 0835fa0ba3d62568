use super::{ChatRequest, ChatResponse, ProbeStatus, StatusReport, classify};
use crate::{
    Error, Result,
    config::{CredentialSource, LlmConfig},
    llm::ModelHandle,
};
use chrono::Utc;
use std::{sync::Arc, time::Duration, time::Instant};
use tracing::{error, info, warn};

/// Forwards chat messages to the model and probes its availability.
///
/// Holds no per-request state; one instance is shared by all handlers.
pub struct RelayService {
    handle: ModelHandle,
    credential: Arc<dyn CredentialSource>,
    chat_timeout: Duration,
    status_timeout: Duration,
    status_prompt: String,
    api_tier: String,
    quota_info: String,
}

impl RelayService {
    pub fn new(
        handle: ModelHandle,
        credential: Arc<dyn CredentialSource>,
        config: &LlmConfig,
    ) -> Self {
        Self {
            handle,
            credential,
            chat_timeout: config.chat_timeout(),
            status_timeout: config.status_timeout(),
            status_prompt: config.status_prompt.clone(),
            api_tier: config.api_tier.clone(),
            quota_info: config.quota_info.clone(),
        }
    }

    /// Forwards one message. No retries: every failure is returned as-is for
    /// the caller to classify.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        info!("Received message: {}", request.message);

        match self.forward(&request.message).await {
            Ok(response) => {
                info!("AI reply: {}", response.reply);
                Ok(response)
            }
            Err(e) => {
                log_failure("chat", &e);
                Err(e)
            }
        }
    }

    async fn forward(&self, message: &str) -> Result<ChatResponse> {
        if message.trim().is_empty() {
            return Err(Error::invalid_request("message must not be empty"));
        }

        if !self.credential.is_present() {
            return Err(Error::config(format!(
                "{} is no longer set",
                self.credential.name()
            )));
        }

        let reply = self.handle.invoke(message, self.chat_timeout).await?;
        Ok(ChatResponse { reply })
    }

    /// Sends the status prompt and reports how the model responded.
    ///
    /// Advisory only; the outcome does not affect later chat calls.
    pub async fn probe(&self) -> StatusReport {
        let started = Instant::now();
        let outcome = self
            .handle
            .invoke(&self.status_prompt, self.status_timeout)
            .await;
        let elapsed = started.elapsed();

        let mut report = StatusReport {
            status: ProbeStatus::Operational,
            model: self.handle.model().to_string(),
            response_time_seconds: None,
            message: None,
            api_tier: self.api_tier.clone(),
            quota_info: self.quota_info.clone(),
            error: None,
            checked_at: Utc::now(),
        };

        match outcome {
            Ok(_) => {
                report.response_time_seconds = Some(round_secs(elapsed));
                report.message = Some("API is working correctly".to_string());
            }
            Err(e) => {
                log_failure("status probe", &e);
                let message = e.to_string();
                report.status = if classify::is_quota_message(&message) {
                    ProbeStatus::QuotaExceeded
                } else {
                    ProbeStatus::Error
                };
                report.error = Some(message);
            }
        }

        report
    }
}

fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

fn log_failure(operation: &str, err: &Error) {
    match err {
        Error::InvalidRequest(_) => warn!("Rejected {} request: {}", operation, err),
        _ => error!(
            error = %err,
            diagnostic = %err.diagnostic(),
            "{} failed",
            operation
        ),
    }
}
