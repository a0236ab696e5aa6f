mod config;
mod errors;
mod extract;
mod llm_client;
mod pipeline;
mod render;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::render::default_page_config;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (a missing credential refuses to start)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobberly v{}", env!("CARGO_PKG_VERSION"));

    let gateway = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_api_url.clone());
    info!(
        "Gemini client initialized (fast: {}, deep: {})",
        config.models.fast, config.models.deep
    );

    let page_config = default_page_config();
    info!(
        "PDF page config: {:.0}x{:.0}pt, {:.1}pt margins",
        page_config.width_pt, page_config.height_pt, page_config.margin_pt
    );

    let state = AppState {
        sessions: SessionStore::new(),
        gateway: Arc::new(gateway),
        models: config.models.clone(),
        page_config,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            return Err(e.into());
        }
    };
    axum::serve(listener, app).await?;

    Ok(())
}
