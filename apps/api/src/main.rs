mod config;
mod enhance;
mod errors;
mod export;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::enhance::EnhancementClient;
use crate::export::ExportAdapter;
use crate::llm_client::LlmClient;
use crate::render::TemplateRegistry;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{open_backend, DocumentRepository};
use crate::store::DocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV API v{}", env!("CARGO_PKG_VERSION"));

    // Restore the document from whichever backend STORAGE_URL names
    let backend = open_backend(&config.storage_url).await?;
    let store = DocumentStore::open(DocumentRepository::new(backend)).await;
    info!("Document store ready (storage: {})", config.storage_url);

    // Initialize LLM client
    let llm = LlmClient::new(
        config.enhance_api_url.clone(),
        config.enhance_api_key.clone(),
        config.enhance_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let templates = TemplateRegistry::with_builtin();
    info!(
        "Templates: {}",
        templates
            .available_templates()
            .iter()
            .map(|t| t.id)
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Build app state
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        enhancer: EnhancementClient::new(llm),
        templates: Arc::new(templates),
        exporter: ExportAdapter::default(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
