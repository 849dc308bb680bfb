mod config;
mod errors;
mod export;
mod fingerprint;
mod llm_client;
mod models;
mod parser;
mod review;
mod routes;
mod scoring;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::PageConfig;
use crate::llm_client::select_provider;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Reviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Offline stand-in when no API key is configured
    let llm = select_provider(&config);

    match &config.sessions_dir {
        Some(dir) => info!("Session storage enabled at {}", dir.display()),
        None => info!("Session storage disabled (SESSIONS_DIR not set)"),
    }

    let page_config = PageConfig::default();
    info!(
        "PDF export: {}x{}pt, {} columns, {} lines per page",
        page_config.page_width_pt,
        page_config.page_height_pt,
        page_config.columns(),
        page_config.lines_per_page()
    );

    // Build app state
    let state = AppState {
        llm,
        config: config.clone(),
        page_config,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web front end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
