use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use match_api::config::Config;
use match_api::extraction::DocumentExtractor;
use match_api::inference::{TeiEmbedder, TeiReranker};
use match_api::llm_client::{LlmClient, TextGenerator};
use match_api::matching::MatchEngine;
use match_api::routes::build_router;
use match_api::state::AppState;

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

    info!("Starting Match API v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.inference_timeout_secs);

    // Initialize model-serving clients
    let embedder = TeiEmbedder::new(&config.embedding_url, timeout, config.inference_batch_size)?;
    info!("Embedding client initialized ({})", config.embedding_url);
    let reranker = TeiReranker::new(&config.reranker_url, timeout, config.inference_batch_size)?;
    info!("Cross-encoder client initialized ({})", config.reranker_url);

    // Generative fallbacks are optional; heuristics alone when no key is set
    let generator: Option<Arc<dyn TextGenerator>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.anthropic_model.clone(), timeout)?;
            info!("LLM client initialized (model: {})", llm.model());
            Some(Arc::new(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; skill and experience extraction use heuristics only");
            None
        }
    };

    let engine = MatchEngine::new(
        Arc::new(embedder),
        Arc::new(reranker),
        generator,
        config.matching.clone(),
    )?;
    info!(
        "Match engine ready (acronym expansion: {}, semantic offset: {})",
        config.matching.expand_acronyms, config.matching.semantic_offset
    );

    // Build app state
    let state = AppState {
        engine: Arc::new(engine),
        extractor: Arc::new(DocumentExtractor),
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
