//! Image generation client
//!
//! Best-effort fallback illustration source. The generation service takes
//! a word prompt and answers with the URL of a freshly rendered image;
//! anything short of that (timeout, non-2xx, malformed payload) degrades
//! to an empty result and the word simply stays without a picture.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::sources::{is_present, ImageSource};
use crate::utils::rate_limit::MinIntervalLimiter;

const IMAGE_API_BASE_URL: &str = "https://image.diegodad.com/api";
const USER_AGENT: &str = "vocabox/0.1.0 (https://github.com/vocabox/vocabox)";
const REQUEST_TIMEOUT_SECS: u64 = 5;
const RATE_LIMIT_MS: u64 = 500;
const IMAGE_SIZE_PARAM: &str = "300x300";

/// Provenance tag recorded on entries this source populated.
pub const IMAGE_GEN_SOURCE: &str = "image-gen";

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    url: Option<String>,
}

/// Image generation API client
pub struct ImageGenClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: MinIntervalLimiter,
}

impl ImageGenClient {
    pub fn new() -> Result<Self, ImageGenError> {
        Self::with_base_url(IMAGE_API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ImageGenError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ImageGenError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: MinIntervalLimiter::new(RATE_LIMIT_MS),
        })
    }

    /// Request a generated illustration and return its URL.
    pub async fn generate_image(&self, word: &str) -> Result<String, ImageGenError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/v1/images/generations", self.base_url);

        tracing::debug!(word = %word, "Requesting image generation");

        let response = self
            .http_client
            .get(&url)
            .query(&[("prompt", word.trim()), ("size", IMAGE_SIZE_PARAM)])
            .send()
            .await
            .map_err(|e| ImageGenError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImageGenError::ApiError(status.as_u16(), error_text));
        }

        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ImageGenError::ParseError(e.to_string()))?;

        Ok(parsed.url.unwrap_or_default().trim().to_string())
    }
}

#[async_trait]
impl ImageSource for ImageGenClient {
    async fn generate(&self, word: &str) -> Option<String> {
        match self.generate_image(word).await {
            Ok(url) if is_present(&url) => Some(url),
            Ok(_) => {
                tracing::debug!(word = %word, "Image generation returned no URL");
                None
            }
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "Image generation failed");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        IMAGE_GEN_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ImageGenClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn response_shape_parses() {
        let parsed: GenerationResponse =
            serde_json::from_str(r#"{"url": "https://cdn.example.com/gen/apple.png"}"#).unwrap();
        assert_eq!(
            parsed.url.as_deref(),
            Some("https://cdn.example.com/gen/apple.png")
        );
    }

    #[test]
    fn missing_url_parses_to_none() {
        let parsed: GenerationResponse = serde_json::from_str(r#"{"id": "req-1"}"#).unwrap();
        assert!(parsed.url.is_none());
    }
}
