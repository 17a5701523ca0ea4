use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::embedding::Embedder;
use crate::llm_client::LlmClient;
use crate::matching::gap_scorer::GapScorer;
use crate::resources::ResourceResolver;
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub embedder: Arc<dyn Embedder>,
    pub llm: LlmClient,
    /// Pluggable gap scorer. Default: SubstringGapScorer.
    pub gap_scorer: Arc<dyn GapScorer>,
    /// Holds the process-wide resource cache.
    pub resources: Arc<ResourceResolver>,
    pub jwt: JwtVerifier,
}
