pub mod handlers;
mod shutdown;
mod types;

pub use handlers::AppState;
pub use types::*;

use crate::{
    Result,
    config::{Config, CredentialSource, mask},
    llm::{ModelHandle, OpenAiClient},
    relay::RelayService,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/api-status", get(handlers::api_status))
        .route("/chat", post(handlers::chat))
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the model handle and serves until a shutdown signal arrives.
///
/// Fails before binding if the credential is missing or the client cannot
/// be constructed.
pub async fn run(config: Config, credential: Arc<dyn CredentialSource>) -> Result<()> {
    let api_key = credential.require()?;
    info!("API key present: {}", mask(&api_key));

    info!("Initializing model client for {}", config.llm.model);
    let client = OpenAiClient::new(&config.llm, api_key)?;
    let handle = ModelHandle::new(Arc::new(client), config.llm.model.clone());
    info!("Model client initialization successful");

    let relay = RelayService::new(handle, credential, &config.llm);
    let app = router(AppState {
        relay: Arc::new(relay),
    });

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    Ok(())
}
