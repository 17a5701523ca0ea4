//! Skill vocabulary primitives shared by the extractor, scorer and profile code.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on the number of skills kept per profile.
pub const MAX_PROFILE_SKILLS: usize = 50;

/// A single skill, trimmed and lower-cased. Two terms are equal iff their
/// normalized text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillTerm(String);

impl SkillTerm {
    /// Normalizes `raw`. Returns `None` when nothing is left after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SkillTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The skills owned by one profile. Always replaced wholesale, never merged.
///
/// Iteration order is the order the skills were first seen, which keeps
/// downstream output (extracted skills, missing skills) stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSkillSet {
    terms: Vec<SkillTerm>,
}

impl ProfileSkillSet {
    /// Normalizes, drops blanks, de-duplicates case-insensitively and caps the
    /// result at [`MAX_PROFILE_SKILLS`].
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let terms = raw
            .into_iter()
            .filter_map(|s| SkillTerm::new(s.as_ref()))
            .filter(|t| seen.insert(t.clone()))
            .take(MAX_PROFILE_SKILLS)
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[SkillTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn contains(&self, term: &SkillTerm) -> bool {
        self.terms.contains(term)
    }

    /// Joins the skills into the single text submitted for embedding.
    pub fn embedding_text(&self) -> String {
        self.terms
            .iter()
            .map(SkillTerm::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn into_terms(self) -> Vec<SkillTerm> {
        self.terms
    }
}
