mod config;
mod errors;
mod llm_client;
mod optimize;
mod routes;
mod state;
mod tools;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LanguageModel, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tools::job_fetcher::HttpJobFetcher;
use crate::tools::keyword_extractor::LlmKeywordExtractor;
use crate::tools::resume_parser::PdfResumeParser;
use crate::tools::resume_rewriter::LlmResumeRewriter;
use crate::workflow::{Collaborators, Orchestrator};

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

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // One model handle, shared by the keyword and rewrite steps
    let llm: Arc<dyn LanguageModel> = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let collaborators = Collaborators {
        job_fetcher: Arc::new(HttpJobFetcher::new(Duration::from_secs(
            config.fetch_timeout_secs,
        ))?),
        resume_parser: Arc::new(PdfResumeParser),
        keyword_extractor: Arc::new(LlmKeywordExtractor::new(llm.clone())),
        resume_rewriter: Arc::new(LlmResumeRewriter::new(llm)),
    };

    let state = AppState {
        config: config.clone(),
        orchestrator: Arc::new(Orchestrator::new(collaborators)),
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
