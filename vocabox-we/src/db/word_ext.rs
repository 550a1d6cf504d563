//! Enrichment cache persistence
//!
//! One `word_ext` row per dictionary entry. Writes go through
//! [`merge_upsert`], whose conflict clause coalesces field-wise: an
//! existing non-empty value always survives, an empty one takes the
//! incoming value. Concurrent writers for the same `vc_id` therefore
//! converge on the union of their contributions regardless of order.

use sqlx::{Row, SqlitePool};
use vocabox_common::Result;

use crate::services::sources::is_present;

/// Persisted enrichment cache entry. Empty string means "not yet
/// fetched"; a field counts as populated only when non-empty after
/// trimming.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordExt {
    /// Upstream dictionary id, immutable after creation
    pub vc_id: String,
    /// Canonical display spelling
    pub word: String,
    pub phonetic_us: String,
    pub phonetic_uk: String,
    /// Formatted display translation
    pub translation: String,
    /// Unformatted translation text retained for re-formatting
    pub raw_translation: String,
    pub example: String,
    /// Remote URL or local deterministic asset path
    pub image_url: String,
    pub audio_us_url: String,
    pub audio_uk_url: String,
    /// Provenance tag of the dominant data source
    pub word_from: String,
}

impl WordExt {
    pub fn new(vc_id: &str) -> Self {
        Self {
            vc_id: vc_id.to_string(),
            ..Default::default()
        }
    }

    /// All fields the enrichment pipeline is required to fill.
    pub fn is_complete(&self) -> bool {
        is_present(&self.audio_us_url)
            && is_present(&self.audio_uk_url)
            && is_present(&self.example)
            && is_present(&self.image_url)
            && is_present(&self.translation)
    }

    /// True when nothing beyond the key and the display word is populated.
    pub fn is_bare(&self) -> bool {
        !is_present(&self.phonetic_us)
            && !is_present(&self.phonetic_uk)
            && !is_present(&self.translation)
            && !is_present(&self.raw_translation)
            && !is_present(&self.example)
            && !is_present(&self.image_url)
            && !is_present(&self.audio_us_url)
            && !is_present(&self.audio_uk_url)
    }
}

/// Load a cache entry by id.
pub async fn load_entry(pool: &SqlitePool, vc_id: &str) -> Result<Option<WordExt>> {
    let row = sqlx::query(
        r#"
        SELECT vc_id, word, phonetic_us, phonetic_uk, translation, raw_translation,
               example, image_url, audio_us_url, audio_uk_url, word_from
        FROM word_ext
        WHERE vc_id = ?
        "#,
    )
    .bind(vc_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| WordExt {
        vc_id: row.get("vc_id"),
        word: row.get("word"),
        phonetic_us: row.get("phonetic_us"),
        phonetic_uk: row.get("phonetic_uk"),
        translation: row.get("translation"),
        raw_translation: row.get("raw_translation"),
        example: row.get("example"),
        image_url: row.get("image_url"),
        audio_us_url: row.get("audio_us_url"),
        audio_uk_url: row.get("audio_uk_url"),
        word_from: row.get("word_from"),
    }))
}

/// Insert the entry, or merge it into an existing row on key conflict.
///
/// The merge keeps every existing non-empty column and fills only gaps,
/// in a single statement, so racing writers cannot erase each other's
/// fields.
pub async fn merge_upsert(pool: &SqlitePool, entry: &WordExt) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO word_ext (
            vc_id, word, phonetic_us, phonetic_uk, translation, raw_translation,
            example, image_url, audio_us_url, audio_uk_url, word_from,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(vc_id) DO UPDATE SET
            word            = COALESCE(NULLIF(TRIM(word_ext.word), ''), excluded.word),
            phonetic_us     = COALESCE(NULLIF(TRIM(word_ext.phonetic_us), ''), excluded.phonetic_us),
            phonetic_uk     = COALESCE(NULLIF(TRIM(word_ext.phonetic_uk), ''), excluded.phonetic_uk),
            translation     = COALESCE(NULLIF(TRIM(word_ext.translation), ''), excluded.translation),
            raw_translation = COALESCE(NULLIF(TRIM(word_ext.raw_translation), ''), excluded.raw_translation),
            example         = COALESCE(NULLIF(TRIM(word_ext.example), ''), excluded.example),
            image_url       = COALESCE(NULLIF(TRIM(word_ext.image_url), ''), excluded.image_url),
            audio_us_url    = COALESCE(NULLIF(TRIM(word_ext.audio_us_url), ''), excluded.audio_us_url),
            audio_uk_url    = COALESCE(NULLIF(TRIM(word_ext.audio_uk_url), ''), excluded.audio_uk_url),
            word_from       = COALESCE(NULLIF(TRIM(word_ext.word_from), ''), excluded.word_from),
            updated_at      = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&entry.vc_id)
    .bind(entry.word.trim())
    .bind(entry.phonetic_us.trim())
    .bind(entry.phonetic_uk.trim())
    .bind(entry.translation.trim())
    .bind(entry.raw_translation.trim())
    .bind(entry.example.trim())
    .bind(entry.image_url.trim())
    .bind(entry.audio_us_url.trim())
    .bind(entry.audio_uk_url.trim())
    .bind(entry.word_from.trim())
    .execute(pool)
    .await?;

    Ok(())
}

/// Prefix search over cached words for suggestions, in storage order.
pub async fn find_words_with_prefix(
    pool: &SqlitePool,
    prefix: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let words: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT word FROM word_ext
        WHERE word != '' AND word LIKE ?
        ORDER BY word
        LIMIT ?
        "#,
    )
    .bind(format!("{}%", prefix))
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(words)
}

/// Count cached entries.
pub async fn count_entries(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM word_ext")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// Single-connection in-memory pool so every query sees one database.
    async fn setup_test_db() -> SqlitePool {
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

    fn entry_with(vc_id: &str, word: &str, translation: &str) -> WordExt {
        let mut e = WordExt::new(vc_id);
        e.word = word.to_string();
        e.translation = translation.to_string();
        e
    }

    #[tokio::test]
    async fn insert_and_load_roundtrip() {
        let pool = setup_test_db().await;

        let entry = entry_with("vc-1", "apple", "n. 苹果");
        merge_upsert(&pool, &entry).await.unwrap();

        let loaded = load_entry(&pool, "vc-1").await.unwrap().unwrap();
        assert_eq!(loaded.word, "apple");
        assert_eq!(loaded.translation, "n. 苹果");
        assert_eq!(loaded.example, "");
    }

    #[tokio::test]
    async fn load_missing_entry_is_none() {
        let pool = setup_test_db().await;
        assert!(load_entry(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn merge_fills_gaps_only() {
        let pool = setup_test_db().await;

        merge_upsert(&pool, &entry_with("vc-1", "apple", "n. 苹果"))
            .await
            .unwrap();

        // Second write: different translation (must lose), new example (must fill)
        let mut second = entry_with("vc-1", "apple", "DIFFERENT");
        second.example = "She ate an apple.".to_string();
        merge_upsert(&pool, &second).await.unwrap();

        let loaded = load_entry(&pool, "vc-1").await.unwrap().unwrap();
        assert_eq!(loaded.translation, "n. 苹果", "non-empty field must survive");
        assert_eq!(loaded.example, "She ate an apple.", "gap must be filled");
    }

    #[tokio::test]
    async fn merge_never_erases_with_empty() {
        let pool = setup_test_db().await;

        let mut full = entry_with("vc-1", "apple", "n. 苹果");
        full.image_url = "/assets/images/a/apple.jpg".to_string();
        merge_upsert(&pool, &full).await.unwrap();

        // A later, emptier write must not clear anything
        merge_upsert(&pool, &WordExt::new("vc-1")).await.unwrap();

        let loaded = load_entry(&pool, "vc-1").await.unwrap().unwrap();
        assert_eq!(loaded.word, "apple");
        assert_eq!(loaded.translation, "n. 苹果");
        assert_eq!(loaded.image_url, "/assets/images/a/apple.jpg");
    }

    #[tokio::test]
    async fn concurrent_disjoint_writers_converge() {
        let pool = setup_test_db().await;

        let mut a = WordExt::new("vc-1");
        a.word = "apple".to_string();
        a.translation = "n. 苹果".to_string();

        let mut b = WordExt::new("vc-1");
        b.example = "She ate an apple.".to_string();
        b.audio_us_url = "https://cdn.example.com/apple-us.mp3".to_string();

        let mut c = WordExt::new("vc-1");
        c.image_url = "/assets/images/a/apple.jpg".to_string();
        c.audio_uk_url = "https://cdn.example.com/apple-uk.mp3".to_string();

        let writes = [a, b, c].map(|entry| {
            let pool = pool.clone();
            tokio::spawn(async move { merge_upsert(&pool, &entry).await })
        });
        for handle in writes {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(count_entries(&pool).await.unwrap(), 1);
        let loaded = load_entry(&pool, "vc-1").await.unwrap().unwrap();
        assert_eq!(loaded.word, "apple");
        assert_eq!(loaded.translation, "n. 苹果");
        assert_eq!(loaded.example, "She ate an apple.");
        assert_eq!(loaded.image_url, "/assets/images/a/apple.jpg");
        assert_eq!(loaded.audio_us_url, "https://cdn.example.com/apple-us.mp3");
        assert_eq!(loaded.audio_uk_url, "https://cdn.example.com/apple-uk.mp3");
    }

    #[tokio::test]
    async fn prefix_search_respects_limit_and_order() {
        let pool = setup_test_db().await;

        for word in ["applaud", "apple", "applet", "apply", "apricot", "appoint"] {
            merge_upsert(&pool, &entry_with(&format!("vc-{}", word), word, ""))
                .await
                .unwrap();
        }

        let words = find_words_with_prefix(&pool, "app", 5).await.unwrap();
        assert_eq!(words, vec!["applaud", "apple", "applet", "apply", "appoint"]);
    }

    #[test]
    fn is_complete_requires_all_five_fields() {
        let mut entry = WordExt::new("vc-1");
        entry.translation = "n. 苹果".to_string();
        entry.example = "x".to_string();
        entry.image_url = "y".to_string();
        entry.audio_us_url = "z".to_string();
        assert!(!entry.is_complete());

        entry.audio_uk_url = "w".to_string();
        assert!(entry.is_complete());
    }

    #[test]
    fn whitespace_fields_do_not_complete() {
        let mut entry = WordExt::new("vc-1");
        entry.translation = "  ".to_string();
        entry.example = "x".to_string();
        entry.image_url = "y".to_string();
        entry.audio_us_url = "z".to_string();
        entry.audio_uk_url = "w".to_string();
        assert!(!entry.is_complete());
    }
}
