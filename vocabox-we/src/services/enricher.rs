//! Word enrichment orchestration
//!
//! Cache-aside coordinator for dictionary entries. A fully populated
//! cache row short-circuits without any outbound call; otherwise the
//! orchestrator queries sources in priority order for the missing fields
//! only, merges monotonically (a populated field is never replaced), and
//! persists through the atomic merge-upsert.
//!
//! Every source failure degrades to "no contribution". The only hard
//! failure is a word with no cache entry and no usable data from any
//! source.

use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;

use super::asset_store::AssetStore;
use super::formatter::format_translation;
use super::sources::{is_present, ImageSource, LexicalSource, SourceReport, TranslationSource};
use crate::db::word_ext::{self, WordExt};

/// Enrichment errors surfaced to the API layer
#[derive(Debug, Error)]
pub enum EnrichError {
    /// No cached data and no source knows the word
    #[error("Word unknown: {0}")]
    WordUnknown(String),

    #[error(transparent)]
    Common(#[from] vocabox_common::Error),
}

/// Caller-facing enrichment result: the cache entry minus the raw
/// translation text, with empty fields rendered as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct WordEnrichment {
    pub vc_id: String,
    pub word: String,
    pub phonetic_us: Option<String>,
    pub phonetic_uk: Option<String>,
    pub translation: Option<String>,
    pub example: Option<String>,
    pub image_url: Option<String>,
    pub audio_us_url: Option<String>,
    pub audio_uk_url: Option<String>,
    pub word_from: Option<String>,
}

impl WordEnrichment {
    pub fn from_entry(entry: &WordExt) -> Self {
        Self {
            vc_id: entry.vc_id.clone(),
            word: entry.word.trim().to_string(),
            phonetic_us: opt(&entry.phonetic_us),
            phonetic_uk: opt(&entry.phonetic_uk),
            translation: opt(&entry.translation),
            example: opt(&entry.example),
            image_url: opt(&entry.image_url),
            audio_us_url: opt(&entry.audio_us_url),
            audio_uk_url: opt(&entry.audio_uk_url),
            word_from: opt(&entry.word_from),
        }
    }
}

fn opt(value: &str) -> Option<String> {
    if is_present(value) {
        Some(value.trim().to_string())
    } else {
        None
    }
}

/// Enrichment orchestrator. Collaborators are injected at construction;
/// the orchestrator holds no state of its own beyond them.
pub struct Enricher {
    db: SqlitePool,
    lexical: Arc<dyn LexicalSource>,
    translator: Arc<dyn TranslationSource>,
    images: Arc<dyn ImageSource>,
    assets: AssetStore,
}

impl Enricher {
    pub fn new(
        db: SqlitePool,
        lexical: Arc<dyn LexicalSource>,
        translator: Arc<dyn TranslationSource>,
        images: Arc<dyn ImageSource>,
        assets: AssetStore,
    ) -> Self {
        Self {
            db,
            lexical,
            translator,
            images,
            assets,
        }
    }

    /// Produce a display-ready record for a dictionary entry, fetching
    /// only what the cache is missing.
    ///
    /// **Algorithm:**
    /// 1. Full cache hit returns immediately, zero outbound calls
    /// 2. Primary lexical source fills any missing fields
    /// 3. Translation fallback fills raw text when none arrived
    /// 4. Image fallback generates an illustration; the asset store
    ///    localizes it, keeping the remote URL on store failure
    /// 5. Format the raw translation for display
    /// 6. Atomic merge-upsert, then reload so concurrent fills are
    ///    reflected in the response
    pub async fn ensure(
        &self,
        vc_id: &str,
        word_hint: &str,
    ) -> std::result::Result<WordEnrichment, EnrichError> {
        let cached = word_ext::load_entry(&self.db, vc_id).await?;

        if let Some(entry) = &cached {
            if entry.is_complete() {
                tracing::debug!(vc_id = %vc_id, word = %entry.word, "Cache hit, entry complete");
                return Ok(WordEnrichment::from_entry(entry));
            }
        }

        let had_cache = cached.is_some();
        let mut staged = cached.unwrap_or_else(|| WordExt::new(vc_id));

        let lookup_word = if is_present(&staged.word) {
            staged.word.trim().to_string()
        } else {
            word_hint.trim().to_string()
        };

        tracing::debug!(vc_id = %vc_id, word = %lookup_word, "Enriching entry");

        if !lookup_word.is_empty() {
            if let Some(report) = self.lexical.lookup(&lookup_word).await {
                stage_report(&mut staged, &report);
            }
        }

        // The display spelling falls back to the caller's hint when the
        // primary source had no canonical form to offer
        if !is_present(&staged.word) {
            staged.word = lookup_word.clone();
        }

        if !lookup_word.is_empty()
            && !is_present(&staged.translation)
            && !is_present(&staged.raw_translation)
        {
            if let Some(text) = self.translator.translate(&lookup_word).await {
                staged.raw_translation = text;
                if !is_present(&staged.word_from) {
                    staged.word_from = self.translator.name().to_string();
                }
            }
        }

        if !lookup_word.is_empty() && !is_present(&staged.image_url) {
            if let Some(remote_url) = self.images.generate(&lookup_word).await {
                // Localize when possible; a failed store is not an error,
                // the remote URL still renders
                staged.image_url = self
                    .assets
                    .store_image(&lookup_word, &remote_url)
                    .await
                    .unwrap_or(remote_url);
                if !is_present(&staged.word_from) {
                    staged.word_from = self.images.name().to_string();
                }
            }
        }

        if !is_present(&staged.translation) && is_present(&staged.raw_translation) {
            staged.translation = format_translation(&staged.raw_translation);
        }

        if !had_cache && staged.is_bare() {
            let label = if lookup_word.is_empty() {
                vc_id.to_string()
            } else {
                lookup_word
            };
            tracing::info!(vc_id = %vc_id, word = %label, "No source knows this word");
            return Err(EnrichError::WordUnknown(label));
        }

        word_ext::merge_upsert(&self.db, &staged).await?;

        // A concurrent enrichment for the same id may have landed fields
        // this pass did not; the persisted row is authoritative
        let persisted = word_ext::load_entry(&self.db, vc_id).await?.unwrap_or(staged);

        tracing::info!(
            vc_id = %vc_id,
            word = %persisted.word,
            complete = persisted.is_complete(),
            source = %persisted.word_from,
            "Enrichment persisted"
        );

        Ok(WordEnrichment::from_entry(&persisted))
    }
}

/// Stage a source report into the entry: only empty fields take values,
/// and definition/translation text lands in the raw slot for later
/// formatting. Provenance is tagged when the report contributed anything.
fn stage_report(entry: &mut WordExt, report: &SourceReport) {
    let mut contributed = false;

    if !is_present(&entry.word) && is_present(&report.word) {
        entry.word = report.word.trim().to_string();
    }

    stage_field(&mut entry.phonetic_us, &report.phonetic_us, &mut contributed);
    stage_field(&mut entry.phonetic_uk, &report.phonetic_uk, &mut contributed);
    stage_field(&mut entry.example, &report.example, &mut contributed);
    stage_field(&mut entry.image_url, &report.image_url, &mut contributed);
    stage_field(&mut entry.audio_us_url, &report.audio_us_url, &mut contributed);
    stage_field(&mut entry.audio_uk_url, &report.audio_uk_url, &mut contributed);

    if !is_present(&entry.translation) {
        stage_field(
            &mut entry.raw_translation,
            &report.translation,
            &mut contributed,
        );
    }

    if contributed && !is_present(&entry.word_from) {
        entry.word_from = report.source.clone();
    }
}

fn stage_field(target: &mut String, candidate: &str, contributed: &mut bool) {
    if !is_present(target) && is_present(candidate) {
        *target = candidate.trim().to_string();
        *contributed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_report_fills_gaps_only() {
        let mut entry = WordExt::new("vc-1");
        entry.phonetic_us = "/existing/".to_string();

        let mut report = SourceReport::new("dictionary-api");
        report.word = "Apple".to_string();
        report.phonetic_us = "/new/".to_string();
        report.example = "She ate an apple.".to_string();

        stage_report(&mut entry, &report);

        assert_eq!(entry.phonetic_us, "/existing/", "populated field survives");
        assert_eq!(entry.example, "She ate an apple.");
        assert_eq!(entry.word, "Apple");
        assert_eq!(entry.word_from, "dictionary-api");
    }

    #[test]
    fn stage_report_routes_definition_to_raw_slot() {
        let mut entry = WordExt::new("vc-1");
        let mut report = SourceReport::new("dictionary-api");
        report.translation = "A round fruit.".to_string();

        stage_report(&mut entry, &report);

        assert_eq!(entry.raw_translation, "A round fruit.");
        assert_eq!(entry.translation, "");
    }

    #[test]
    fn stage_report_skips_raw_slot_when_formatted_exists() {
        let mut entry = WordExt::new("vc-1");
        entry.translation = "n. 苹果".to_string();

        let mut report = SourceReport::new("dictionary-api");
        report.translation = "A round fruit.".to_string();

        stage_report(&mut entry, &report);

        assert_eq!(entry.raw_translation, "");
        assert_eq!(entry.word_from, "", "nothing contributed, no provenance");
    }

    #[test]
    fn enrichment_renders_empty_fields_as_none() {
        let mut entry = WordExt::new("vc-1");
        entry.word = "apple".to_string();
        entry.translation = "n. 苹果".to_string();

        let result = WordEnrichment::from_entry(&entry);
        assert_eq!(result.translation.as_deref(), Some("n. 苹果"));
        assert_eq!(result.example, None);
        assert_eq!(result.image_url, None);
    }
}
