//! Storage boundary. Handlers and the matching engine only see `JobStore`;
//! `PgJobStore` is the production backend.

pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::embedding::EmbeddingVector;
use crate::matching::skills::ProfileSkillSet;
use crate::models::job::{JobDraft, JobPosting};
use crate::models::profile::ProfileView;

pub use postgres::PgJobStore;

/// Replacement values for a profile. `None` keeps the stored value on update.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub skills: ProfileSkillSet,
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileView>, sqlx::Error>;

    /// `None` when the user has no profile; an empty set when they have one
    /// without skills.
    async fn find_profile_skills(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileSkillSet>, sqlx::Error>;

    /// Creates or updates the profile and atomically replaces its skill set.
    async fn replace_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<ProfileView, sqlx::Error>;

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, sqlx::Error>;

    /// Newest first.
    async fn recent_jobs(&self, limit: i64) -> Result<Vec<JobPosting>, sqlx::Error>;

    /// Postings embedded by the same model as `query`, nearest first, paired
    /// with their cosine distance.
    async fn nearest_jobs(
        &self,
        query: &EmbeddingVector,
        limit: i64,
    ) -> Result<Vec<(JobPosting, f64)>, sqlx::Error>;

    async fn insert_job(
        &self,
        draft: &JobDraft,
        embedding: Option<&EmbeddingVector>,
    ) -> Result<JobPosting, sqlx::Error>;
}
