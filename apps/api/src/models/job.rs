use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::embedding::EmbeddingVector;

/// A stored job posting. The embedding never leaves the service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub embedding: Option<EmbeddingVector>,
}

/// Row shape of the `jobs` table.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub embedding: Option<pgvector::Vector>,
    pub embedding_model: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        // A vector without a model tag cannot be compared safely; drop it.
        let embedding = match (row.embedding, row.embedding_model) {
            (Some(vector), Some(model)) => EmbeddingVector::new(model, vector.to_vec()).ok(),
            _ => None,
        };
        JobPosting {
            id: row.id,
            title: row.title,
            company: row.company,
            description: row.description,
            location: row.location,
            url: row.url,
            created_at: row.created_at,
            embedding,
        }
    }
}

/// A job posting with its similarity to the caller's profile.
///
/// `similarity` is `1 - cosine distance` on the ranked path and `None` when
/// the list came from the recency fallback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub job: JobPosting,
    pub similarity: Option<f64>,
}

/// Incoming job record, as produced by the ingestion crawler.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    pub url: Option<String>,
}

impl JobDraft {
    /// Fills placeholder title/company and drops blank optional fields.
    pub fn normalized(self) -> Self {
        fn or_default(value: String, default: &str) -> String {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            }
        }
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        JobDraft {
            title: or_default(self.title, "Untitled"),
            company: or_default(self.company, "Unknown"),
            description: self.description,
            location: non_blank(self.location),
            url: non_blank(self.url),
        }
    }

    /// Text submitted for the posting's embedding.
    pub fn embedding_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.company, self.description)
    }
}
