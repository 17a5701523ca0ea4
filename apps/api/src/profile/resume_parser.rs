//! Résumé parser: turns free résumé text into a name, headline, and skill list.
//!
//! The model call can fail outright (missing key, upstream error) and that is
//! surfaced to the caller. A reply that is not usable JSON is not an error:
//! the parser falls back to the first non-empty line as the name.

use serde::Deserialize;
use tracing::warn;

use crate::embedding::truncate_chars;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, LlmClient};
use crate::profile::prompts::RESUME_EXTRACT_PROMPT_TEMPLATE;

const MAX_RESUME_CHARS: usize = 15_000;
const MAX_FALLBACK_NAME_CHARS: usize = 80;

/// Fields extracted from a résumé. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResume {
    pub full_name: String,
    pub headline: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResumeReply {
    #[serde(default)]
    full_name: Option<serde_json::Value>,
    #[serde(default)]
    headline: Option<serde_json::Value>,
    #[serde(default)]
    skills: Option<serde_json::Value>,
}

pub async fn parse_resume_text(text: &str, llm: &LlmClient) -> Result<ParsedResume, AppError> {
    let prompt =
        RESUME_EXTRACT_PROMPT_TEMPLATE.replace("{resume_text}", truncate_chars(text, MAX_RESUME_CHARS));
    let reply = llm.call_text(&prompt, JSON_ONLY_SYSTEM).await?;
    Ok(interpret_reply(&reply, text))
}

/// Reads the model's reply. Anything that is not a JSON object degrades to
/// the first-line fallback built from `source_text`.
pub fn interpret_reply(reply: &str, source_text: &str) -> ParsedResume {
    let body = strip_json_fences(reply);
    let body = match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    };

    match serde_json::from_str::<ResumeReply>(body) {
        Ok(parsed) => ParsedResume {
            full_name: string_field(parsed.full_name),
            headline: string_field(parsed.headline),
            skills: skill_list(parsed.skills),
        },
        Err(e) => {
            warn!("Resume reply was not valid JSON, using first-line fallback: {e}");
            first_line_fallback(source_text)
        }
    }
}

fn string_field(value: Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

fn skill_list(value: Option<serde_json::Value>) -> Vec<String> {
    let Some(serde_json::Value::Array(items)) = value else {
        return Vec::new();
    };

    let mut skills: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let raw = match item {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => continue,
            other => other.to_string(),
        };
        let skill = raw.trim();
        if !skill.is_empty() && !skills.iter().any(|s| s == skill) {
            skills.push(skill.to_string());
        }
    }
    skills
}

fn first_line_fallback(source_text: &str) -> ParsedResume {
    let first_line = source_text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    ParsedResume {
        full_name: truncate_chars(first_line, MAX_FALLBACK_NAME_CHARS).to_string(),
        ..ParsedResume::default()
    }
}
