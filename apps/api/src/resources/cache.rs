//! Time-boxed, size-bounded cache of learning resources keyed by skill.
//!
//! Staleness is checked lazily on read; nothing is swept in the background.
//! When full, inserting a new key evicts the entry with the oldest fetch time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::matching::skills::SkillTerm;
use crate::resources::LearningResource;

/// Entries older than this are ignored on read.
pub const RESOURCE_CACHE_TTL_HOURS: i64 = 12;

/// Source of "now" for TTL decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    items: Vec<LearningResource>,
}

pub struct ResourceCache {
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<SkillTerm, CacheEntry>>,
}

impl ResourceCache {
    pub fn new(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self::new(Duration::hours(RESOURCE_CACHE_TTL_HOURS), max_entries, clock)
    }

    /// Returns the cached items if the entry is younger than the TTL.
    pub fn get(&self, skill: &SkillTerm) -> Option<Vec<LearningResource>> {
        let now = self.clock.now();
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(skill)
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| entry.items.clone())
    }

    /// Creates or refreshes the entry for `skill`, stamped with the current time.
    pub fn put(&self, skill: SkillTerm, items: Vec<LearningResource>) {
        let fetched_at = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if !entries.contains_key(&skill) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                entries.remove(&key);
            }
        }

        entries.insert(skill, CacheEntry { fetched_at, items });
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
