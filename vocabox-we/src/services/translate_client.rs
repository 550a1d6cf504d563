//! MyMemory translation client
//!
//! Fallback translation source, consulted only when neither the cache nor
//! the primary lexical source yields translation text. Returns the raw
//! multilingual string; display formatting happens downstream.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::sources::{is_present, TranslationSource};
use crate::utils::rate_limit::MinIntervalLimiter;

const TRANSLATE_API_BASE_URL: &str = "https://api.mymemory.translated.net";
const USER_AGENT: &str = "vocabox/0.1.0 (https://github.com/vocabox/vocabox)";
const REQUEST_TIMEOUT_SECS: u64 = 3;
const RATE_LIMIT_MS: u64 = 200;
const LANG_PAIR: &str = "en|zh-CN";

/// Provenance tag recorded on entries this source populated.
pub const TRANSLATE_SOURCE: &str = "mymemory";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "responseData")]
    response_data: Option<TranslateData>,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// MyMemory translation API client
pub struct TranslateClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: MinIntervalLimiter,
}

impl TranslateClient {
    pub fn new() -> Result<Self, TranslateError> {
        Self::with_base_url(TRANSLATE_API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, TranslateError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TranslateError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: MinIntervalLimiter::new(RATE_LIMIT_MS),
        })
    }

    /// Fetch the raw translation for a word, empty result as `Ok("")`.
    pub async fn fetch_translation(&self, word: &str) -> Result<String, TranslateError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/get", self.base_url);

        tracing::debug!(word = %word, "Querying translation API");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", word.trim()), ("langpair", LANG_PAIR)])
            .send()
            .await
            .map_err(|e| TranslateError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslateError::ApiError(status.as_u16(), error_text));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::ParseError(e.to_string()))?;

        let translated = parsed
            .response_data
            .and_then(|d| d.translated_text)
            .unwrap_or_default();

        Ok(translated.trim().to_string())
    }
}

#[async_trait]
impl TranslationSource for TranslateClient {
    async fn translate(&self, word: &str) -> Option<String> {
        match self.fetch_translation(word).await {
            Ok(text) if is_present(&text) => Some(text),
            Ok(_) => {
                tracing::debug!(word = %word, "Translation API returned nothing");
                None
            }
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "Translation API failed");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        TRANSLATE_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TranslateClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn response_shape_parses() {
        let parsed: TranslateResponse = serde_json::from_str(
            r#"{"responseData": {"translatedText": "苹果"}, "responseStatus": 200}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.response_data.unwrap().translated_text.as_deref(),
            Some("苹果")
        );
    }

    #[test]
    fn missing_payload_parses_to_none() {
        let parsed: TranslateResponse = serde_json::from_str(r#"{"responseStatus": 403}"#).unwrap();
        assert!(parsed.response_data.is_none());
    }
}
