//! Video search against the public YouTube Data API.
//!
//! Search is a collaborator, not core state: results are staged by the
//! caller and only enter the queue or library through explicit add
//! actions. Every failure maps to a [`SearchError`] the surface renders as
//! an inline "no results" message -- nothing here is fatal.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::media::MediaItem;
use crate::storage::Config;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Environment fallback for the API key.
pub const API_KEY_ENV: &str = "STUDYSTATION_YOUTUBE_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    All,
    Lectures,
    Tutorials,
    Pomodoro,
}

impl SearchType {
    /// Rewrite the query for the educational search modes.
    fn augment(self, query: &str) -> String {
        match self {
            SearchType::All => query.to_string(),
            SearchType::Lectures => format!("{query} lecture educational"),
            SearchType::Tutorials => format!("{query} tutorial how to"),
            SearchType::Pomodoro => format!("pomodoro timer study with me {query}"),
        }
    }

    fn video_duration(self) -> &'static str {
        match self {
            SearchType::Pomodoro => "long",
            _ => "any",
        }
    }
}

/// Normalized search results: regular videos and shorts, separated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub videos: Vec<MediaItem>,
    pub shorts: Vec<MediaItem>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.shorts.is_empty()
    }
}

/// YouTube search client.
pub struct YoutubeSearch {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YoutubeSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Build a client from config, falling back to the environment for the
    /// API key. A missing key is a search error, not a panic.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let api_key = config
            .search
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
            .ok_or(SearchError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Point at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search for videos. With `educational_focus`, the query is rewritten
    /// per `search_type`; results split into regular videos and shorts.
    pub async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        educational_focus: bool,
        max_results: u32,
    ) -> Result<SearchResults, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let effective_query = if educational_focus {
            search_type.augment(query)
        } else {
            query.to_string()
        };

        let max_results = max_results.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
                ("q", effective_query.as_str()),
                ("type", "video"),
                ("videoDuration", search_type.video_duration()),
            ])
            .send()
            .await?;

        let body: serde_json::Value = check_status(response).await?;
        let items = body["items"]
            .as_array()
            .ok_or_else(|| SearchError::BadResponse("missing items".to_string()))?;

        let mut results = SearchResults::default();
        for raw in items {
            let Some(item) = MediaItem::from_provider(raw) else {
                continue;
            };
            if looks_like_short(raw) {
                results.shorts.push(item);
            } else {
                results.videos.push(item);
            }
        }
        Ok(results)
    }

    /// Fetch full details for one video id.
    pub async fn video_details(&self, id: &str) -> Result<Option<MediaItem>, SearchError> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,statistics,contentDetails"),
                ("id", id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: serde_json::Value = check_status(response).await?;
        let items = body["items"]
            .as_array()
            .ok_or_else(|| SearchError::BadResponse("missing items".to_string()))?;
        Ok(items.first().and_then(MediaItem::from_provider))
    }
}

/// Decode the body, surfacing the provider's own error message on non-2xx.
async fn check_status(response: reqwest::Response) -> Result<serde_json::Value, SearchError> {
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| SearchError::BadResponse(e.to_string()))?;
    if !status.is_success() {
        let message = body["error"]["message"]
            .as_str()
            .unwrap_or("request failed")
            .to_string();
        return Err(SearchError::BadResponse(message));
    }
    Ok(body)
}

/// Shorts are flagged by markers in the title or description.
fn looks_like_short(raw: &serde_json::Value) -> bool {
    let title = raw["snippet"]["title"].as_str().unwrap_or("").to_lowercase();
    let description = raw["snippet"]["description"]
        .as_str()
        .unwrap_or("")
        .to_lowercase();
    title.contains("short") || description.contains("short")
}
