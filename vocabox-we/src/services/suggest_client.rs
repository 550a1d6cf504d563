//! Datamuse suggestion client
//!
//! Remote prefix-completion source used to top up local suggestions.
//! Failures degrade to an empty list.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::sources::SuggestionSource;
use crate::utils::rate_limit::MinIntervalLimiter;

const SUGGEST_API_BASE_URL: &str = "https://api.datamuse.com";
const USER_AGENT: &str = "vocabox/0.1.0 (https://github.com/vocabox/vocabox)";
const REQUEST_TIMEOUT_SECS: u64 = 3;
const RATE_LIMIT_MS: u64 = 200;
const MAX_REMOTE_SUGGESTIONS: usize = 5;

#[derive(Debug, Error)]
pub enum SuggestApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct SuggestItem {
    word: String,
}

/// Datamuse `sug` endpoint client
pub struct SuggestClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: MinIntervalLimiter,
}

impl SuggestClient {
    pub fn new() -> Result<Self, SuggestApiError> {
        Self::with_base_url(SUGGEST_API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, SuggestApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SuggestApiError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: MinIntervalLimiter::new(RATE_LIMIT_MS),
        })
    }

    pub async fn fetch_suggestions(&self, prefix: &str) -> Result<Vec<String>, SuggestApiError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/sug", self.base_url);
        let max = MAX_REMOTE_SUGGESTIONS.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[("s", prefix.trim()), ("max", max.as_str())])
            .send()
            .await
            .map_err(|e| SuggestApiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SuggestApiError::ApiError(status.as_u16(), error_text));
        }

        let items: Vec<SuggestItem> = response
            .json()
            .await
            .map_err(|e| SuggestApiError::ParseError(e.to_string()))?;

        Ok(items.into_iter().map(|i| i.word).collect())
    }
}

#[async_trait]
impl SuggestionSource for SuggestClient {
    async fn suggest(&self, prefix: &str) -> Vec<String> {
        match self.fetch_suggestions(prefix).await {
            Ok(words) => words,
            Err(e) => {
                tracing::warn!(prefix = %prefix, error = %e, "Suggestion API failed");
                Vec::new()
            }
        }
    }
}
