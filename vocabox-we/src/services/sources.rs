//! Source adapter interface
//!
//! Every external provider is wrapped behind one of these traits and
//! translates its own response shape into [`SourceReport`], a fixed
//! optional-field capability struct. Adapters catch their own network,
//! timeout, and parse failures and normalize them to empty results. The
//! empty path is visible in the type (`Option`), never an error the
//! orchestrator has to handle.

use async_trait::async_trait;

/// Whether a cached or fetched field counts as populated.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// One provider's contribution for a word. Empty strings mean "this
/// provider has nothing for that field".
#[derive(Debug, Clone, Default)]
pub struct SourceReport {
    /// Canonical spelling as the provider knows it (may differ in casing
    /// from the query).
    pub word: String,
    pub phonetic_us: String,
    pub phonetic_uk: String,
    /// Raw (unformatted) translation or definition text.
    pub translation: String,
    pub example: String,
    pub image_url: String,
    pub audio_us_url: String,
    pub audio_uk_url: String,
    /// Provenance tag for reporting.
    pub source: String,
}

impl SourceReport {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Default::default()
        }
    }

    /// True when no capability field carries data (the word itself and the
    /// provenance tag do not count).
    pub fn is_empty(&self) -> bool {
        !is_present(&self.phonetic_us)
            && !is_present(&self.phonetic_uk)
            && !is_present(&self.translation)
            && !is_present(&self.example)
            && !is_present(&self.image_url)
            && !is_present(&self.audio_us_url)
            && !is_present(&self.audio_uk_url)
    }
}

/// Primary lexical source: phonetics, definition text, example sentence,
/// pronunciation audio. `None` covers both "word not in corpus" and any
/// provider failure.
#[async_trait]
pub trait LexicalSource: Send + Sync {
    async fn lookup(&self, word: &str) -> Option<SourceReport>;
}

/// Fallback translation source: raw translation text only.
#[async_trait]
pub trait TranslationSource: Send + Sync {
    async fn translate(&self, word: &str) -> Option<String>;

    /// Provenance tag recorded when this source is the dominant contributor.
    fn name(&self) -> &'static str {
        "translation"
    }
}

/// Best-effort image source: URL of a freshly generated illustration.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn generate(&self, word: &str) -> Option<String>;

    /// Provenance tag recorded when this source is the dominant contributor.
    fn name(&self) -> &'static str {
        "image"
    }
}

/// Remote word-suggestion source for prefix completion.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, prefix: &str) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_empty() {
        let report = SourceReport::new("test");
        assert!(report.is_empty());
    }

    #[test]
    fn word_alone_does_not_count_as_data() {
        let mut report = SourceReport::new("test");
        report.word = "apple".to_string();
        assert!(report.is_empty());
    }

    #[test]
    fn any_capability_field_counts() {
        let mut report = SourceReport::new("test");
        report.example = "An apple a day.".to_string();
        assert!(!report.is_empty());
    }

    #[test]
    fn whitespace_is_not_present() {
        assert!(!is_present(""));
        assert!(!is_present("   "));
        assert!(is_present("x"));
    }
}
