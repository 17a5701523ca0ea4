//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::embedding::truncate_chars;
use crate::errors::AppError;
use crate::matching::gap_scorer::SkillGap;
use crate::matching::search::{find_matches, MatchPhase, MATCH_LIMIT};
use crate::matching::skills::ProfileSkillSet;
use crate::models::job::{JobDraft, JobPosting, MatchResult};
use crate::resources::{LearningResource, DEFAULT_RESOURCES_PER_SKILL};
use crate::state::AppState;

/// Characters of title + company + description considered for a posting's
/// embedding, before the embedder's own budget applies.
const MAX_JOB_TEXT_CHARS: usize = 12_000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub jobs: Vec<MatchResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapReport {
    #[serde(flatten)]
    pub gap: SkillGap,
    pub learning_resources: Vec<LearningResource>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobs/matches
///
/// Ranks postings against the caller's skills. Degrades to the most recent
/// postings (similarity `null`) instead of failing; errors only when even the
/// recency read fails.
pub async fn handle_matches(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MatchesResponse>, AppError> {
    let skills = match state.store.find_profile_skills(user.user_id).await {
        Ok(Some(skills)) => skills,
        Ok(None) => return Err(AppError::NotFound("Profile not found".to_string())),
        Err(e) => {
            warn!("Could not read skills for user {}: {e}", user.user_id);
            ProfileSkillSet::default()
        }
    };

    let outcome = find_matches(
        state.store.as_ref(),
        state.embedder.as_ref(),
        &skills,
        MATCH_LIMIT,
    )
    .await?;

    match outcome.phase {
        MatchPhase::Primary => info!(
            "Matched {} postings for user {} by similarity over {} skills",
            outcome.jobs.len(),
            user.user_id,
            skills.len()
        ),
        MatchPhase::Fallback => info!(
            "Returned {} recent postings for user {} ({})",
            outcome.jobs.len(),
            user.user_id,
            outcome
                .fallback_reason
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        ),
    }

    Ok(Json(MatchesResponse { jobs: outcome.jobs }))
}

/// GET /api/jobs/:job_id/skill-gap
///
/// Scores the caller's skills against one posting and attaches learning
/// links for each missing skill.
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> Result<Json<SkillGapReport>, AppError> {
    let job_id = Uuid::parse_str(job_id.trim())
        .map_err(|_| AppError::Validation(format!("'{job_id}' is not a valid job id")))?;

    let (skills, job) = tokio::try_join!(
        state.store.find_profile_skills(user.user_id),
        state.store.find_job(job_id),
    )?;
    let skills = skills.ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let job = job.ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let gap = state.gap_scorer.score(&skills, &job);
    let learning_resources = state
        .resources
        .resolve(&gap.missing_skills, DEFAULT_RESOURCES_PER_SKILL)
        .await;

    info!(
        "Skill gap for user {} on job {}: score={}, missing={}",
        user.user_id,
        job_id,
        gap.score,
        gap.missing_skills.len()
    );

    Ok(Json(SkillGapReport {
        gap,
        learning_resources,
    }))
}

/// POST /api/jobs
///
/// Ingestion hook for the crawler. A posting whose embedding fails is still
/// stored; it only participates in the recency fallback.
pub async fn handle_create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let draft = draft.normalized();
    let text = draft.embedding_text();

    let embedding = match state
        .embedder
        .embed(truncate_chars(&text, MAX_JOB_TEXT_CHARS))
        .await
    {
        Ok(vector) => Some(vector),
        Err(e) => {
            warn!("Storing job '{}' without embedding: {e}", draft.title);
            None
        }
    };

    let job = state.store.insert_job(&draft, embedding.as_ref()).await?;
    info!("Job {} ingested by {}", job.id, user.email);
    Ok((StatusCode::CREATED, Json(job)))
}
