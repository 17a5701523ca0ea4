//! Similarity Search: ranks stored postings against a profile's skills.
//!
//! Degradation is a small state machine:
//!
//! ```text
//! PRIMARY ──(no skills | embed error | empty result | query error)──▶ FALLBACK
//! FALLBACK ──(recent-jobs read error)──▶ FAILED
//! ```
//!
//! Only `FAILED` surfaces as an error. Every other path returns postings.

use std::fmt;

use tracing::{debug, warn};

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::matching::skills::ProfileSkillSet;
use crate::models::job::MatchResult;
use crate::store::JobStore;

/// Number of postings returned by the matches operation.
pub const MATCH_LIMIT: i64 = 20;

/// Which state produced the returned list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Primary,
    Fallback,
}

/// Why the primary path was abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The profile has no skills, or they could not be read.
    NoSkills,
    EmbeddingFailed(String),
    EmptyResult,
    QueryFailed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoSkills => write!(f, "no skills to embed"),
            FallbackReason::EmbeddingFailed(e) => write!(f, "embedding failed: {e}"),
            FallbackReason::EmptyResult => write!(f, "no embedded postings matched"),
            FallbackReason::QueryFailed(e) => write!(f, "similarity query failed: {e}"),
        }
    }
}

#[derive(Debug)]
pub struct MatchOutcome {
    pub phase: MatchPhase,
    pub fallback_reason: Option<FallbackReason>,
    pub jobs: Vec<MatchResult>,
}

enum MatchState {
    Primary,
    Fallback(FallbackReason),
    Failed(sqlx::Error),
    Done(MatchOutcome),
}

/// Runs the matching state machine for one request.
pub async fn find_matches(
    store: &dyn JobStore,
    embedder: &dyn Embedder,
    skills: &ProfileSkillSet,
    limit: i64,
) -> Result<MatchOutcome, AppError> {
    let mut state = if skills.is_empty() {
        MatchState::Fallback(FallbackReason::NoSkills)
    } else {
        MatchState::Primary
    };

    loop {
        state = match state {
            MatchState::Primary => primary(store, embedder, skills, limit).await,
            MatchState::Fallback(reason) => {
                warn!("Matching degraded to recency fallback: {reason}");
                recency_fallback(store, reason, limit).await
            }
            MatchState::Failed(e) => {
                warn!("Recency fallback failed, matching unavailable: {e}");
                return Err(AppError::Database(e));
            }
            MatchState::Done(outcome) => return Ok(outcome),
        };
    }
}

async fn primary(
    store: &dyn JobStore,
    embedder: &dyn Embedder,
    skills: &ProfileSkillSet,
    limit: i64,
) -> MatchState {
    let query = match embedder.embed(&skills.embedding_text()).await {
        Ok(v) => v,
        Err(e) => return MatchState::Fallback(FallbackReason::EmbeddingFailed(e.to_string())),
    };

    let rows = match store.nearest_jobs(&query, limit).await {
        Ok(rows) => rows,
        Err(e) => return MatchState::Fallback(FallbackReason::QueryFailed(e.to_string())),
    };
    if rows.is_empty() {
        return MatchState::Fallback(FallbackReason::EmptyResult);
    }

    let mut jobs: Vec<MatchResult> = rows
        .into_iter()
        .map(|(job, distance)| MatchResult {
            job,
            similarity: Some(similarity_from_distance(distance)),
        })
        .collect();
    // Stable: equal similarities keep the store's order.
    jobs.sort_by(|a, b| {
        b.similarity
            .unwrap_or(f64::MIN)
            .total_cmp(&a.similarity.unwrap_or(f64::MIN))
    });

    debug!("Primary matching returned {} postings", jobs.len());
    MatchState::Done(MatchOutcome {
        phase: MatchPhase::Primary,
        fallback_reason: None,
        jobs,
    })
}

async fn recency_fallback(store: &dyn JobStore, reason: FallbackReason, limit: i64) -> MatchState {
    match store.recent_jobs(limit).await {
        Ok(recent) => MatchState::Done(MatchOutcome {
            phase: MatchPhase::Fallback,
            fallback_reason: Some(reason),
            jobs: recent
                .into_iter()
                .map(|job| MatchResult {
                    job,
                    similarity: None,
                })
                .collect(),
        }),
        Err(e) => MatchState::Failed(e),
    }
}

/// `1 - cosine distance`, clamped to [-1, 1]. Non-finite distances map to -1.
pub fn similarity_from_distance(distance: f64) -> f64 {
    if !distance.is_finite() {
        return -1.0;
    }
    (1.0 - distance).clamp(-1.0, 1.0)
}
