//! Learning-Resource Resolver: attaches study links to each missing skill.
//!
//! Per skill, in input order:
//! 1. fresh cache entry: reuse it, no external call
//! 2. otherwise one live search
//! 3. quota exhausted: static catalog, cached as if live
//! 4. any other failure: skip the skill, nothing cached
//!
//! Without a search credential the whole step is skipped. Resolution never
//! fails the caller; fewer links is always a valid result.

pub mod cache;
pub mod catalog;
pub mod youtube;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::matching::skills::SkillTerm;
use cache::ResourceCache;

/// Links requested per missing skill.
pub const DEFAULT_RESOURCES_PER_SKILL: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningResource {
    pub skill: SkillTerm,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum ResourceSearchError {
    #[error("resource search quota exceeded")]
    QuotaExceeded,

    #[error("resource search returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Query in, small ranked list of links out.
#[async_trait]
pub trait ResourceSearch: Send + Sync {
    async fn search(
        &self,
        skill: &SkillTerm,
        max_results: usize,
    ) -> Result<Vec<LearningResource>, ResourceSearchError>;
}

pub struct ResourceResolver {
    search: Option<Arc<dyn ResourceSearch>>,
    cache: ResourceCache,
}

impl ResourceResolver {
    /// `search = None` disables resolution entirely.
    pub fn new(search: Option<Arc<dyn ResourceSearch>>, cache: ResourceCache) -> Self {
        if search.is_none() {
            info!("No resource search credential configured; learning resources disabled");
        }
        Self { search, cache }
    }

    /// Resolves links for `skills`, preserving their order in the output.
    pub async fn resolve(
        &self,
        skills: &[SkillTerm],
        per_skill_limit: usize,
    ) -> Vec<LearningResource> {
        let Some(search) = self.search.as_deref() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for skill in skills {
            out.extend(self.resolve_one(search, skill, per_skill_limit).await);
        }
        out
    }

    async fn resolve_one(
        &self,
        search: &dyn ResourceSearch,
        skill: &SkillTerm,
        per_skill_limit: usize,
    ) -> Vec<LearningResource> {
        if let Some(mut cached) = self.cache.get(skill) {
            debug!("Resource cache hit for '{skill}'");
            cached.truncate(per_skill_limit);
            return cached;
        }

        match search.search(skill, per_skill_limit).await {
            Ok(mut found) => {
                found.truncate(per_skill_limit);
                if !found.is_empty() {
                    self.remember(skill, &found);
                }
                found
            }
            Err(ResourceSearchError::QuotaExceeded) => {
                let fallback = catalog::lookup(skill, per_skill_limit);
                warn!(
                    "Resource search quota exceeded for '{skill}', using catalog ({} links)",
                    fallback.len()
                );
                if !fallback.is_empty() {
                    self.remember(skill, &fallback);
                }
                fallback
            }
            Err(e) => {
                warn!("Resource search failed for '{skill}', skipping: {e}");
                Vec::new()
            }
        }
    }

    fn remember(&self, skill: &SkillTerm, items: &[LearningResource]) {
        self.cache.put(skill.clone(), items.to_vec());
        debug!("Cached resources for '{skill}' ({} entries)", self.cache.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ManualClock, ScriptedResourceSearch, SearchReply};
    use chrono::Duration;

    fn skill(s: &str) -> SkillTerm {
        SkillTerm::new(s).unwrap()
    }

    fn skills(raw: &[&str]) -> Vec<SkillTerm> {
        raw.iter().map(|s| skill(s)).collect()
    }

    fn resolver_with(
        search: Arc<ScriptedResourceSearch>,
        clock: Arc<ManualClock>,
    ) -> ResourceResolver {
        ResourceResolver::new(
            Some(search),
            ResourceCache::with_default_ttl(64, clock),
        )
    }

    #[tokio::test]
    async fn test_live_results_are_returned_in_skill_order_and_cached() {
        let search = Arc::new(ScriptedResourceSearch::default());
        search.reply("kubernetes", SearchReply::Videos(vec!["k8s-1"]));
        search.reply("redis", SearchReply::Videos(vec!["redis-1"]));
        let clock = Arc::new(ManualClock::default());
        let resolver = resolver_with(search.clone(), clock);

        let out = resolver.resolve(&skills(&["redis", "kubernetes"]), 1).await;
        let order: Vec<_> = out.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(order, vec!["redis", "kubernetes"]);

        let again = resolver.resolve(&skills(&["redis", "kubernetes"]), 1).await;
        assert_eq!(again, out);
        assert_eq!(search.calls_for("redis"), 1);
        assert_eq!(search.calls_for("kubernetes"), 1);
    }

    #[tokio::test]
    async fn test_fresh_cache_entry_skips_live_call() {
        let search = Arc::new(ScriptedResourceSearch::default());
        search.reply("docker", SearchReply::Videos(vec!["d1"]));
        let clock = Arc::new(ManualClock::default());
        let resolver = resolver_with(search.clone(), clock.clone());

        resolver.resolve(&skills(&["docker"]), 1).await;
        clock.advance(Duration::hours(11) + Duration::minutes(59));
        resolver.resolve(&skills(&["docker"]), 1).await;

        assert_eq!(search.calls_for("docker"), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_exactly_one_live_attempt() {
        let search = Arc::new(ScriptedResourceSearch::default());
        search.reply("docker", SearchReply::Videos(vec!["d1"]));
        let clock = Arc::new(ManualClock::default());
        let resolver = resolver_with(search.clone(), clock.clone());

        resolver.resolve(&skills(&["docker"]), 1).await;
        clock.advance(Duration::hours(13));
        search.reply("docker", SearchReply::Quota);
        let out = resolver.resolve(&skills(&["docker"]), 1).await;

        assert_eq!(search.calls_for("docker"), 2);
        assert_eq!(out, catalog::lookup(&skill("docker"), 1));
    }

    #[tokio::test]
    async fn test_quota_exceeded_uses_catalog_and_caches_it() {
        let search = Arc::new(ScriptedResourceSearch::default());
        search.reply("docker", SearchReply::Quota);
        let clock = Arc::new(ManualClock::default());
        let resolver = resolver_with(search.clone(), clock);

        let out = resolver.resolve(&skills(&["docker"]), 1).await;
        assert_eq!(out, catalog::lookup(&skill("docker"), 1));
        assert_eq!(out.len(), 1);

        // Cached: the quota window is not re-attempted.
        let again = resolver.resolve(&skills(&["docker"]), 1).await;
        assert_eq!(again, out);
        assert_eq!(search.calls_for("docker"), 1);
    }

    #[tokio::test]
    async fn test_quota_exceeded_without_catalog_entry_yields_nothing_uncached() {
        let search = Arc::new(ScriptedResourceSearch::default());
        search.reply("terraform", SearchReply::Quota);
        let clock = Arc::new(ManualClock::default());
        let resolver = resolver_with(search.clone(), clock);

        assert!(resolver.resolve(&skills(&["terraform"]), 1).await.is_empty());
        assert!(resolver.resolve(&skills(&["terraform"]), 1).await.is_empty());
        assert_eq!(search.calls_for("terraform"), 2);
    }

    #[tokio::test]
    async fn test_server_error_skips_skill_without_caching() {
        let search = Arc::new(ScriptedResourceSearch::default());
        search.reply("rust", SearchReply::Status(500));
        search.reply("docker", SearchReply::Videos(vec!["d1"]));
        let clock = Arc::new(ManualClock::default());
        let resolver = resolver_with(search.clone(), clock);

        let out = resolver.resolve(&skills(&["rust", "docker"]), 1).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].skill.as_str(), "docker");

        resolver.resolve(&skills(&["rust"]), 1).await;
        assert_eq!(search.calls_for("rust"), 2, "failed lookups are not cached");
    }

    #[tokio::test]
    async fn test_per_skill_limit_truncates_live_results() {
        let search = Arc::new(ScriptedResourceSearch::default());
        search.reply("react", SearchReply::Videos(vec!["r1", "r2", "r3"]));
        let clock = Arc::new(ManualClock::default());
        let resolver = resolver_with(search.clone(), clock);

        let out = resolver.resolve(&skills(&["react"]), 2).await;
        assert_eq!(out.len(), 2);
        assert_eq!(search.last_limit(), Some(2));
    }

    #[tokio::test]
    async fn test_cache_hit_respects_smaller_per_skill_limit() {
        let search = Arc::new(ScriptedResourceSearch::default());
        search.reply("react", SearchReply::Videos(vec!["r1", "r2", "r3"]));
        let clock = Arc::new(ManualClock::default());
        let resolver = resolver_with(search.clone(), clock);

        assert_eq!(resolver.resolve(&skills(&["react"]), 3).await.len(), 3);
        let out = resolver.resolve(&skills(&["react"]), 1).await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, "https://www.youtube.com/watch?v=r1");
        assert_eq!(search.calls_for("react"), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_everything() {
        let clock = Arc::new(ManualClock::default());
        let resolver = ResourceResolver::new(None, ResourceCache::with_default_ttl(8, clock));
        assert!(resolver.resolve(&skills(&["docker", "rust"]), 1).await.is_empty());
    }
}
