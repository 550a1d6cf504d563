//! Free Dictionary API client
//!
//! Primary lexical source. One round trip per word supplies canonical
//! spelling, phonetics, pronunciation audio, definition text, and an
//! example sentence. A word missing from the corpus is a normal outcome
//! (`WordNotFound`), not a failure.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::sources::{is_present, LexicalSource, SourceReport};
use crate::utils::rate_limit::MinIntervalLimiter;

const DICTIONARY_API_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2";
const USER_AGENT: &str = "vocabox/0.1.0 (https://github.com/vocabox/vocabox)";
const REQUEST_TIMEOUT_SECS: u64 = 3;
const RATE_LIMIT_MS: u64 = 200;

/// Provenance tag recorded on entries this source populated.
pub const DICT_API_SOURCE: &str = "dictionary-api";

/// Dictionary API client errors
#[derive(Debug, Error)]
pub enum DictApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Word not found: {0}")]
    WordNotFound(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One dictionary entry for a word
#[derive(Debug, Clone, Deserialize)]
pub struct DictEntry {
    /// Canonical spelling
    pub word: String,
    /// Phonetic transcriptions with optional audio
    #[serde(default)]
    pub phonetics: Vec<DictPhonetic>,
    /// Senses grouped by part of speech
    #[serde(default)]
    pub meanings: Vec<DictMeaning>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictPhonetic {
    /// IPA transcription, e.g. "/ˈæp.əl/"
    pub text: Option<String>,
    /// Pronunciation audio URL; the accent is encoded in the file name
    pub audio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictMeaning {
    #[serde(rename = "partOfSpeech", default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<DictDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictDefinition {
    pub definition: String,
    pub example: Option<String>,
}

/// Free Dictionary API client
pub struct DictApiClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: MinIntervalLimiter,
}

impl DictApiClient {
    pub fn new() -> Result<Self, DictApiError> {
        Self::with_base_url(DICTIONARY_API_BASE_URL)
    }

    /// Point the client at a different endpoint (tests, mirrors).
    pub fn with_base_url(base_url: &str) -> Result<Self, DictApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DictApiError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: MinIntervalLimiter::new(RATE_LIMIT_MS),
        })
    }

    /// Lookup all entries for a word
    pub async fn lookup_entries(&self, word: &str) -> Result<Vec<DictEntry>, DictApiError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/entries/en/{}", self.base_url, word.trim());

        tracing::debug!(word = %word, url = %url, "Querying dictionary API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| DictApiError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(DictApiError::WordNotFound(word.to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DictApiError::ApiError(status.as_u16(), error_text));
        }

        let entries: Vec<DictEntry> = response
            .json()
            .await
            .map_err(|e| DictApiError::ParseError(e.to_string()))?;

        tracing::debug!(
            word = %word,
            entries = entries.len(),
            "Dictionary API lookup successful"
        );

        Ok(entries)
    }
}

/// Collapse dictionary entries into a single capability report.
///
/// Accent selection mirrors how the audio URLs name their files: a URL
/// containing "us" feeds the US slots, "uk" the UK slots. A final pass
/// falls back to the first transcription/audio found when no accent
/// matched.
fn report_from_entries(entries: &[DictEntry]) -> Option<SourceReport> {
    let entry = entries.first()?;

    let mut report = SourceReport::new(DICT_API_SOURCE);
    report.word = entry.word.trim().to_string();

    for phonetic in &entry.phonetics {
        let audio = phonetic.audio.as_deref().unwrap_or("");
        let text = phonetic.text.as_deref().unwrap_or("");
        if audio.contains("us") && !is_present(&report.audio_us_url) {
            report.audio_us_url = audio.to_string();
            report.phonetic_us = text.to_string();
        } else if audio.contains("uk") && !is_present(&report.audio_uk_url) {
            report.audio_uk_url = audio.to_string();
            report.phonetic_uk = text.to_string();
        }
    }

    // Fallback pass when no accent-specific variant was found
    for phonetic in &entry.phonetics {
        if !is_present(&report.phonetic_us) {
            if let Some(text) = &phonetic.text {
                if is_present(text) {
                    report.phonetic_us = text.trim().to_string();
                }
            }
        }
        if !is_present(&report.audio_us_url) {
            if let Some(audio) = &phonetic.audio {
                if is_present(audio) {
                    report.audio_us_url = audio.trim().to_string();
                }
            }
        }
    }

    if let Some(meaning) = entry.meanings.first() {
        if let Some(definition) = meaning.definitions.first() {
            report.translation = definition.definition.trim().to_string();
            if let Some(example) = &definition.example {
                report.example = example.trim().to_string();
            }
        }
    }

    if report.is_empty() {
        None
    } else {
        Some(report)
    }
}

#[async_trait]
impl LexicalSource for DictApiClient {
    async fn lookup(&self, word: &str) -> Option<SourceReport> {
        match self.lookup_entries(word).await {
            Ok(entries) => report_from_entries(&entries),
            Err(DictApiError::WordNotFound(_)) => {
                tracing::debug!(word = %word, "Word not in dictionary corpus");
                None
            }
            Err(e) => {
                tracing::warn!(word = %word, error = %e, "Dictionary API lookup failed");
                None
            }
        }
    }
}
