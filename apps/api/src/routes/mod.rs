pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route("/api/jobs", post(jobs::handle_create_job))
        .route("/api/jobs/matches", get(jobs::handle_matches))
        .route("/api/jobs/:job_id/skill-gap", get(jobs::handle_skill_gap))
        // Profile API
        .route("/api/profile/me", get(profile::handle_get_profile))
        .route(
            "/api/profile/resume-text",
            post(profile::handle_resume_text),
        )
        .with_state(state)
}
