mod app;
mod config;
mod db;
mod security;
mod state;
mod users;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "mealmatch=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr();
    tracing::info!(
        store = ?config.store_backend,
        public_dir = %config.public_dir.display(),
        "starting"
    );

    let app_state = AppState::init(config).await?;
    let store = app_state.store.clone();
    let app = app::build_app(app_state)?;

    let served = app::serve(app, &addr).await;
    store.close().await;
    tracing::info!("user store closed");
    served
}
