use chat_relay::{
    config::{self, EnvCredential},
    server,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();

    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG overrides the configured level
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = match config::log_filter(rust_log.as_deref(), &config.server.logs.level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    info!(
        "Starting chat relay with log filter: {}",
        rust_log.as_deref().unwrap_or(&config.server.logs.level)
    );

    let credential = Arc::new(EnvCredential::new(config.llm.api_key_env.clone()));

    if let Err(e) = server::run(config, credential).await {
        error!(error = %e, diagnostic = %e.diagnostic(), "Chat relay failed to start or serve");
        std::process::exit(1);
    }

    Ok(())
}
