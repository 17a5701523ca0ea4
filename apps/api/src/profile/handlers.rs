//! Axum route handlers for the Profile API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::matching::skills::ProfileSkillSet;
use crate::models::profile::ProfileView;
use crate::profile::resume_parser::parse_resume_text;
use crate::state::AppState;
use crate::store::ProfileUpdate;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeTextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeTextResponse {
    pub message: String,
    pub profile: ProfileView,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/profile/me
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileView>, AppError> {
    state
        .store
        .find_profile(user.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// POST /api/profile/resume-text
///
/// Parses résumé text and replaces the caller's profile. The skill set is
/// replaced as a whole; name and headline are only overwritten when found.
pub async fn handle_resume_text(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ResumeTextRequest>,
) -> Result<Json<ResumeTextResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let parsed = parse_resume_text(&req.text, &state.llm).await?;
    let update = ProfileUpdate {
        full_name: Some(parsed.full_name).filter(|s| !s.is_empty()),
        headline: Some(parsed.headline).filter(|s| !s.is_empty()),
        skills: ProfileSkillSet::from_raw(&parsed.skills),
    };

    let profile = state.store.replace_profile(user.user_id, update).await?;
    info!(
        "Profile for user {} replaced with {} skills",
        user.user_id,
        profile.skills.len()
    );

    Ok(Json(ResumeTextResponse {
        message: "Resume parsed and profile updated".to_string(),
        profile,
    }))
}
