//! In-memory collaborators for unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::embedding::{Embedder, EmbeddingError, EmbeddingVector};
use crate::matching::skills::{ProfileSkillSet, SkillTerm};
use crate::models::job::{JobDraft, JobPosting};
use crate::models::profile::ProfileView;
use crate::resources::cache::Clock;
use crate::resources::{LearningResource, ResourceSearch, ResourceSearchError};
use crate::store::{JobStore, ProfileUpdate};

pub const TEST_MODEL: &str = "test-embedding";

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A posting created `minutes` after a fixed epoch, without embedding.
pub fn job_at(title: &str, minutes: i64) -> JobPosting {
    JobPosting {
        id: Uuid::new_v4(),
        title: title.to_string(),
        company: "Acme".to_string(),
        description: String::new(),
        location: None,
        url: None,
        created_at: epoch() + Duration::minutes(minutes),
        embedding: None,
    }
}

pub fn job_with_embedding(title: &str, minutes: i64, values: Vec<f32>) -> JobPosting {
    JobPosting {
        embedding: Some(EmbeddingVector::new(TEST_MODEL, values).unwrap()),
        ..job_at(title, minutes)
    }
}

pub fn job_with_description(description: &str) -> JobPosting {
    JobPosting {
        description: description.to_string(),
        ..job_at("Engineer", 0)
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let na: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na * nb)
}

// ────────────────────────────────────────────────────────────────────────────
// JobStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<Vec<JobPosting>>,
    profiles: Mutex<HashMap<Uuid, ProfileView>>,
    fail_nearest: AtomicBool,
    fail_recent: AtomicBool,
    fail_profiles: AtomicBool,
}

impl MemoryJobStore {
    pub fn add_job(&self, job: JobPosting) -> Uuid {
        let id = job.id;
        self.jobs.lock().unwrap().push(job);
        id
    }

    pub fn add_profile(&self, user_id: Uuid, skills: &[&str]) {
        let set = ProfileSkillSet::from_raw(skills);
        self.profiles.lock().unwrap().insert(
            user_id,
            ProfileView {
                full_name: "Test User".to_string(),
                headline: String::new(),
                skills: set.terms().iter().map(|t| t.to_string()).collect(),
            },
        );
    }

    pub fn fail_nearest(&self) {
        self.fail_nearest.store(true, Ordering::SeqCst);
    }

    pub fn fail_recent(&self) {
        self.fail_recent.store(true, Ordering::SeqCst);
    }

    pub fn fail_profiles(&self) {
        self.fail_profiles.store(true, Ordering::SeqCst);
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    fn check(flag: &AtomicBool) -> Result<(), sqlx::Error> {
        if flag.load(Ordering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileView>, sqlx::Error> {
        Self::check(&self.fail_profiles)?;
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_profile_skills(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileSkillSet>, sqlx::Error> {
        Self::check(&self.fail_profiles)?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|p| ProfileSkillSet::from_raw(&p.skills)))
    }

    async fn replace_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<ProfileView, sqlx::Error> {
        Self::check(&self.fail_profiles)?;
        let mut profiles = self.profiles.lock().unwrap();
        let existing = profiles.get(&user_id).cloned();
        let view = ProfileView {
            full_name: update
                .full_name
                .or_else(|| existing.as_ref().map(|p| p.full_name.clone()))
                .unwrap_or_else(|| "Unknown".to_string()),
            headline: update
                .headline
                .or_else(|| existing.as_ref().map(|p| p.headline.clone()))
                .unwrap_or_default(),
            skills: update
                .skills
                .terms()
                .iter()
                .map(SkillTerm::to_string)
                .collect(),
        };
        profiles.insert(user_id, view.clone());
        Ok(view)
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobPosting>, sqlx::Error> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == job_id)
            .cloned())
    }

    async fn recent_jobs(&self, limit: i64) -> Result<Vec<JobPosting>, sqlx::Error> {
        Self::check(&self.fail_recent)?;
        let mut jobs = self.jobs.lock().unwrap().clone();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.truncate(limit as usize);
        Ok(jobs)
    }

    async fn nearest_jobs(
        &self,
        query: &EmbeddingVector,
        limit: i64,
    ) -> Result<Vec<(JobPosting, f64)>, sqlx::Error> {
        Self::check(&self.fail_nearest)?;
        let mut ranked: Vec<(JobPosting, f64)> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter_map(|job| {
                let vector = job.embedding.as_ref()?;
                if vector.model() != query.model() || vector.dimensions() != query.dimensions() {
                    return None;
                }
                Some((job.clone(), cosine_distance(vector.values(), query.values())))
            })
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(limit as usize);
        Ok(ranked)
    }

    async fn insert_job(
        &self,
        draft: &JobDraft,
        embedding: Option<&EmbeddingVector>,
    ) -> Result<JobPosting, sqlx::Error> {
        let job = JobPosting {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            company: draft.company.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            url: draft.url.clone(),
            created_at: Utc::now(),
            embedding: embedding.cloned(),
        };
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Embedder
// ────────────────────────────────────────────────────────────────────────────

pub struct ScriptedEmbedder {
    vector: Option<Vec<f32>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEmbedder {
    pub fn returning(vector: Vec<f32>) -> Self {
        Self {
            vector: Some(vector),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            vector: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for ScriptedEmbedder {
    fn model(&self) -> &str {
        TEST_MODEL
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        self.calls.lock().unwrap().push(text.to_string());
        match &self.vector {
            Some(values) => EmbeddingVector::new(TEST_MODEL, values.clone()),
            None => Err(EmbeddingError::QuotaExceeded { retries: 3 }),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ResourceSearch
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum SearchReply {
    Videos(Vec<&'static str>),
    Quota,
    Status(u16),
}

#[derive(Default)]
pub struct ScriptedResourceSearch {
    replies: Mutex<HashMap<String, SearchReply>>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedResourceSearch {
    pub fn reply(&self, skill: &str, reply: SearchReply) {
        self.replies.lock().unwrap().insert(skill.to_string(), reply);
    }

    pub fn calls_for(&self, skill: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == skill)
            .count()
    }

    pub fn last_limit(&self) -> Option<usize> {
        self.calls.lock().unwrap().last().map(|(_, limit)| *limit)
    }
}

#[async_trait]
impl ResourceSearch for ScriptedResourceSearch {
    async fn search(
        &self,
        skill: &SkillTerm,
        max_results: usize,
    ) -> Result<Vec<LearningResource>, ResourceSearchError> {
        self.calls
            .lock()
            .unwrap()
            .push((skill.to_string(), max_results));
        let reply = self.replies.lock().unwrap().get(skill.as_str()).cloned();
        match reply {
            Some(SearchReply::Videos(ids)) => Ok(ids
                .into_iter()
                .map(|id| LearningResource {
                    skill: skill.clone(),
                    title: format!("{id} video"),
                    url: format!("https://www.youtube.com/watch?v={id}"),
                })
                .collect()),
            Some(SearchReply::Quota) => Err(ResourceSearchError::QuotaExceeded),
            Some(SearchReply::Status(status)) => Err(ResourceSearchError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Clock
// ────────────────────────────────────────────────────────────────────────────

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(epoch()),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
