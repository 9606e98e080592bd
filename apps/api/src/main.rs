mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod resumes;
mod routes;
mod state;
mod tailoring;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, Storage};
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::resumes::memory::InMemoryResumeRepository;
use crate::resumes::postgres::PgResumeRepository;
use crate::resumes::ResumeRepository;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::LlmTailoringService;

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

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    let resumes: Arc<dyn ResumeRepository> = match &config.storage {
        Storage::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            run_migrations(&pool).await?;
            Arc::new(PgResumeRepository::new(pool))
        }
        Storage::Memory => {
            info!("Using in-memory resume storage; data is lost on restart");
            Arc::new(InMemoryResumeRepository::new())
        }
    };

    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        resumes,
        tailor: Arc::new(LlmTailoringService::new(llm)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
