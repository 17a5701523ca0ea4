use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::matching::skills::SkillTerm;
use crate::resources::{LearningResource, ResourceSearch, ResourceSearchError};

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const QUOTA_EXCEEDED_MARKER: &str = "quotaExceeded";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<ItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
}

/// YouTube Data API v3 video search. Quota-limited; a 403 carrying
/// `quotaExceeded` is reported as [`ResourceSearchError::QuotaExceeded`].
#[derive(Clone)]
pub struct YouTubeSearch {
    client: Client,
    api_key: String,
}

impl YouTubeSearch {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ResourceSearch for YouTubeSearch {
    async fn search(
        &self,
        skill: &SkillTerm,
        max_results: usize,
    ) -> Result<Vec<LearningResource>, ResourceSearchError> {
        let query = format!("{skill} tutorial");
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(YOUTUBE_SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("order", "relevance"),
                ("maxResults", max_results.as_str()),
                ("q", query.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), body));
        }

        let parsed: SearchResponse = response.json().await?;
        let resources = into_resources(skill, parsed);
        debug!("YouTube returned {} usable items for '{skill}'", resources.len());
        Ok(resources)
    }
}

fn classify_failure(status: u16, body: String) -> ResourceSearchError {
    if status == 403 && body.contains(QUOTA_EXCEEDED_MARKER) {
        ResourceSearchError::QuotaExceeded
    } else {
        ResourceSearchError::Status { status, body }
    }
}

/// Keeps only items with both a title and a video id.
fn into_resources(skill: &SkillTerm, response: SearchResponse) -> Vec<LearningResource> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let title = item.snippet.and_then(|s| s.title).filter(|t| !t.is_empty())?;
            let video_id = item.id.and_then(|i| i.video_id).filter(|v| !v.is_empty())?;
            Some(LearningResource {
                skill: skill.clone(),
                title,
                url: format!("https://www.youtube.com/watch?v={video_id}"),
            })
        })
        .collect()
}
