//! Gap Scoring: compares a profile's skills against the skills a job implies.
//!
//! `AppState` holds an `Arc<dyn GapScorer>`; the default backend is
//! `SubstringGapScorer`, which delegates extraction to [`extractor::extract`].
//! Scoring is pure: no I/O, no caching.

use serde::Serialize;
use uuid::Uuid;

use crate::matching::extractor;
use crate::matching::skills::{ProfileSkillSet, SkillTerm};
use crate::models::job::JobPosting;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// The scored comparison between one profile and one job.
///
/// `matching_skills` and `missing_skills` partition `job_skills`: disjoint,
/// and together equal to it. Both keep `job_skills` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub job_id: Uuid,
    pub score: u32, // 0 – 100
    pub matching_skills: Vec<SkillTerm>,
    pub missing_skills: Vec<SkillTerm>,
    #[serde(skip)]
    pub job_skills: Vec<SkillTerm>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Swap backends without touching the handler. Any replacement changes
/// observable scores and needs its own tests.
pub trait GapScorer: Send + Sync {
    fn score(&self, user_skills: &ProfileSkillSet, job: &JobPosting) -> SkillGap;
}

/// Default backend: substring extraction over the user's skills plus the
/// reference vocabulary.
pub struct SubstringGapScorer;

impl GapScorer for SubstringGapScorer {
    fn score(&self, user_skills: &ProfileSkillSet, job: &JobPosting) -> SkillGap {
        let job_skills = extractor::extract(&job.description, user_skills.terms());
        let (matching_skills, missing_skills): (Vec<_>, Vec<_>) = job_skills
            .iter()
            .cloned()
            .partition(|skill| user_skills.contains(skill));

        SkillGap {
            job_id: job.id,
            score: match_score(matching_skills.len(), job_skills.len()),
            matching_skills,
            missing_skills,
            job_skills,
        }
    }
}

/// `round(100 * matching / required)`, or 0 when nothing is required.
pub fn match_score(matching: usize, required: usize) -> u32 {
    if required == 0 {
        return 0;
    }
    ((matching as f64 / required as f64) * 100.0).round() as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
