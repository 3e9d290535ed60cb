mod assistant;
mod config;
mod document;
mod errors;
mod export;
mod layout;
mod llm_client;
mod models;
mod render;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::canned::CannedGenerator;
use crate::assistant::{AiAssistant, AiLimits};
use crate::config::Config;
use crate::document::InMemoryStore;
use crate::export::{LayoutRasterizer, NoShareSheet};
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::session::{SessionRegistry, StatsTicker};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume editor v{}", env!("CARGO_PKG_VERSION"));

    // Text generator: the model API when a key is configured, canned replies otherwise
    let generator: Arc<dyn TextGenerator> = match &config.anthropic_api_key {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmClient::new(key.clone())?)
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; assistant uses canned replies");
            Arc::new(CannedGenerator::new())
        }
    };
    let assistant = AiAssistant::new(
        generator,
        AiLimits {
            max_input_chars: config.ai_max_input_chars,
            max_output_tokens: config.ai_max_output_tokens,
        },
    );

    let stats = Arc::new(StatsTicker::start(Duration::from_secs(config.stats_tick_secs)));
    info!("Dashboard stats ticker started ({}s period)", config.stats_tick_secs);

    // Build app state
    let state = AppState {
        sessions: SessionRegistry::new(),
        store: Arc::new(InMemoryStore::default()),
        assistant,
        rasterizer: Arc::new(LayoutRasterizer::default()),
        share_sheet: Arc::new(NoShareSheet),
        stats,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to PUBLIC_ORIGIN once the front end is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
