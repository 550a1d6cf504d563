//! Shared test helpers: scripted source adapters with call counting and
//! database/asset-store setup.
#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use vocabox_we::services::{
    AssetStore, Enricher, ImageSource, LexicalSource, SourceReport, SuggestionSource,
    TranslationSource,
};

/// Single-connection in-memory pool so every query sees one database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    vocabox_common::db::init::create_word_ext_table(&pool)
        .await
        .unwrap();
    pool
}

/// Asset store rooted in a tempdir. Downloads in tests always point at an
/// unroutable address, so storing fails fast and the remote URL survives.
pub fn test_asset_store(tmp: &TempDir) -> AssetStore {
    AssetStore::new(tmp.path().to_path_buf(), Duration::from_millis(200)).unwrap()
}

/// A lexical source that always answers with the same report.
pub struct ScriptedLexical {
    report: Option<SourceReport>,
    calls: AtomicUsize,
}

impl ScriptedLexical {
    pub fn answering(report: SourceReport) -> Arc<Self> {
        Arc::new(Self {
            report: Some(report),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            report: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LexicalSource for ScriptedLexical {
    async fn lookup(&self, _word: &str) -> Option<SourceReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.report.clone()
    }
}

/// A translation source that always answers with the same text.
pub struct ScriptedTranslate {
    text: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedTranslate {
    pub fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            text: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationSource for ScriptedTranslate {
    async fn translate(&self, _word: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone()
    }

    fn name(&self) -> &'static str {
        "scripted-translate"
    }
}

/// An image source that always answers with the same URL.
pub struct ScriptedImage {
    url: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedImage {
    pub fn answering(url: &str) -> Arc<Self> {
        Arc::new(Self {
            url: Some(url.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            url: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for ScriptedImage {
    async fn generate(&self, _word: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.url.clone()
    }

    fn name(&self) -> &'static str {
        "scripted-image"
    }
}

/// A remote suggestion source that always answers with the same words.
pub struct ScriptedSuggest {
    words: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedSuggest {
    pub fn answering(words: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionSource for ScriptedSuggest {
    async fn suggest(&self, _prefix: &str) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.words.clone()
    }
}

/// A report carrying everything the primary source can supply except an
/// image, the common real-world shape.
pub fn full_lexical_report() -> SourceReport {
    let mut report = SourceReport::new("dictionary-api");
    report.word = "Apple".to_string();
    report.phonetic_us = "/ˈæp.əl/".to_string();
    report.phonetic_uk = "/ˈæp.əl/".to_string();
    report.translation = "A round fruit with firm flesh.".to_string();
    report.example = "She ate an apple.".to_string();
    report.audio_us_url = "https://cdn.example.com/apple-us.mp3".to_string();
    report.audio_uk_url = "https://cdn.example.com/apple-uk.mp3".to_string();
    report
}

/// Wire an enricher from scripted parts.
pub fn scripted_enricher(
    pool: &SqlitePool,
    assets: AssetStore,
    lexical: &Arc<ScriptedLexical>,
    translate: &Arc<ScriptedTranslate>,
    image: &Arc<ScriptedImage>,
) -> Enricher {
    Enricher::new(
        pool.clone(),
        lexical.clone(),
        translate.clone(),
        image.clone(),
        assets,
    )
}
