//! Skill Extractor: derives the skills a job description implies.
//!
//! Literal substring matching over two term sources: the caller's own skills
//! and a fixed technology vocabulary. Deterministic and auditable; precision
//! and recall are knowingly imperfect ("go" matches "good", "ci" matches
//! "social"). Changing the heuristic changes observable scores.

use std::collections::HashSet;

use crate::matching::skills::SkillTerm;

/// Reference vocabulary of common technology keywords, already normalized.
pub const COMMON_TECH_KEYWORDS: &[&str] = &[
    "javascript", "typescript", "node", "express", "react", "vite", "next", "angular", "vue",
    "redux", "tailwind", "css", "html", "graphql", "rest", "postgres", "mysql", "prisma",
    "mongodb", "redis", "docker", "kubernetes", "aws", "gcp", "azure", "ci", "cd", "git",
    "testing", "jest", "vitest", "python", "java", "go", "rust", "c#", "c++", "nlp", "llm",
    "gemini", "openai", "api", "websocket", "oauth", "jwt", "microservices",
];

/// Returns the skills implied by `description`, in discovery order: the
/// caller's skills first (in their order), then vocabulary hits. No duplicates.
///
/// An empty description yields an empty result.
pub fn extract(description: &str, known_user_skills: &[SkillTerm]) -> Vec<SkillTerm> {
    let text = description.to_lowercase();
    if text.trim().is_empty() {
        return Vec::new();
    }

    let vocabulary = COMMON_TECH_KEYWORDS
        .iter()
        .filter_map(|k| SkillTerm::new(k));

    let mut seen = HashSet::new();
    known_user_skills
        .iter()
        .cloned()
        .chain(vocabulary)
        .filter(|term| text.contains(term.as_str()))
        .filter(|term| seen.insert(term.clone()))
        .collect()
}
