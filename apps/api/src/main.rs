mod auth;
mod config;
mod db;
mod embedding;
mod errors;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod profile;
mod resources;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::embedding::{Embedder, GeminiEmbedder};
use crate::llm_client::LlmClient;
use crate::matching::gap_scorer::SubstringGapScorer;
use crate::resources::cache::{ResourceCache, SystemClock};
use crate::resources::youtube::YouTubeSearch;
use crate::resources::{ResourceResolver, ResourceSearch};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgJobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL + pgvector, migrations applied on startup
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgJobStore::new(db));

    // One HTTP client shared by every upstream adapter
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()?;

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; matching will use the recency fallback");
    }
    let embedder: Arc<dyn Embedder> = Arc::new(GeminiEmbedder::new(
        http.clone(),
        config.gemini_api_key.clone(),
        config.gemini_embedding_model.clone(),
    ));
    info!("Embedder initialized (model: {})", embedder.model());

    let llm = LlmClient::new(
        http.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    );
    info!("LLM client initialized (model: {})", llm.model());

    let search: Option<Arc<dyn ResourceSearch>> = match config.youtube_api_key.clone() {
        Some(key) => Some(Arc::new(YouTubeSearch::new(http, key))),
        None => {
            warn!("YOUTUBE_API_KEY is not set; skill gaps will carry no learning resources");
            None
        }
    };
    let cache =
        ResourceCache::with_default_ttl(config.resource_cache_max_entries, Arc::new(SystemClock));

    let state = AppState {
        store,
        embedder,
        llm,
        gap_scorer: Arc::new(SubstringGapScorer),
        resources: Arc::new(ResourceResolver::new(search, cache)),
        jwt: JwtVerifier::new(&config.jwt_secret),
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
