use super::types::{ErrorResponse, HealthResponse};
use crate::{
    Error,
    relay::{
        ChatRequest, ChatResponse, ProbeStatus, RelayService, StatusReport,
        classify::{self, QuotaKind},
    },
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::{any::Any, sync::Arc};
use tracing::{error, warn};

pub const RATE_LIMIT_DETAIL: &str = "Rate limit exceeded. Please try again in a few seconds.";
pub const DAILY_QUOTA_DETAIL: &str = "Model API quota exceeded. Your daily limit may have been reached. Please try again later or consider upgrading your API tier.";
pub const TIMEOUT_DETAIL: &str =
    "Request to the model API timed out. The service might be experiencing high load.";
pub const CONFIG_DETAIL: &str = "API key configuration error";

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running".to_string(),
    })
}

pub async fn api_status(State(state): State<AppState>) -> (StatusCode, Json<StatusReport>) {
    let report = state.relay.probe().await;
    (probe_status_code(report.status), Json(report))
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(rejection_response)?;

    state
        .relay
        .chat(request)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

pub fn probe_status_code(status: ProbeStatus) -> StatusCode {
    match status {
        ProbeStatus::Operational => StatusCode::OK,
        ProbeStatus::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
        ProbeStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a relay failure to the status code and message returned to callers.
pub fn error_response(err: &Error) -> (StatusCode, Json<ErrorResponse>) {
    let (status, detail) = match err {
        Error::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
        Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, CONFIG_DETAIL.to_string()),
        Error::QuotaExceeded(msg) => {
            let detail = match classify::quota_kind(msg) {
                QuotaKind::RateLimit => RATE_LIMIT_DETAIL,
                QuotaKind::DailyQuota => DAILY_QUOTA_DETAIL,
            };
            (StatusCode::TOO_MANY_REQUESTS, detail.to_string())
        }
        Error::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, TIMEOUT_DETAIL.to_string()),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred: {}", other),
        ),
    };

    (status, Json(ErrorResponse::new(detail)))
}

/// Malformed or mistyped request bodies get the same `{detail}` shape as
/// relay failures.
pub fn rejection_response(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    warn!("Rejected chat request body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(ErrorResponse::new(rejection.body_text())),
    )
}

/// Last-resort response when a handler panics.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(format!("An error occurred: {}", detail))),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_rate_limit_and_daily_quota_share_status() {
        let (rate_status, Json(rate)) =
            error_response(&Error::quota_exceeded("Rate limit exceeded for model"));
        let (daily_status, Json(daily)) =
            error_response(&Error::quota_exceeded("daily limit reached"));

        assert_eq!(rate_status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(daily_status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(rate.detail, RATE_LIMIT_DETAIL);
        assert_eq!(daily.detail, DAILY_QUOTA_DETAIL);
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let (status, Json(body)) = error_response(&Error::Timeout(Duration::from_secs(30)));

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body.detail, TIMEOUT_DETAIL);
    }

    #[test]
    fn test_config_error_hides_variable_name() {
        let (status, Json(body)) = error_response(&Error::config("GOOGLE_API_KEY is no longer set"));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, CONFIG_DETAIL);
    }

    #[test]
    fn test_unclassified_error_includes_description() {
        let (status, Json(body)) = error_response(&Error::llm("upstream exploded"));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "An error occurred: LLM error: upstream exploded");
    }

    #[test]
    fn test_probe_status_codes() {
        assert_eq!(probe_status_code(ProbeStatus::Operational), StatusCode::OK);
        assert_eq!(
            probe_status_code(ProbeStatus::QuotaExceeded),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            probe_status_code(ProbeStatus::Error),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_panic_response_is_internal_error() {
        let response = panic_response(Box::new("handler blew up"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
