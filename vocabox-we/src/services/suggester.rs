//! Word suggestion merging
//!
//! Combines local prefix matches with remote suggestions. Local matches
//! come first in storage order; the remote source is consulted only when
//! the local set leaves room under the cap. Dedup against local results
//! is exact-string and case-sensitive.

use sqlx::SqlitePool;
use std::sync::Arc;
use vocabox_common::Result;

use super::sources::SuggestionSource;
use crate::db::word_ext;

/// Prefixes shorter than this return no suggestions at all.
const MIN_PREFIX_CHARS: usize = 3;
/// Maximum merged suggestions.
const SUGGEST_CAP: usize = 5;

pub struct Suggester {
    db: SqlitePool,
    remote: Arc<dyn SuggestionSource>,
}

impl Suggester {
    pub fn new(db: SqlitePool, remote: Arc<dyn SuggestionSource>) -> Self {
        Self { db, remote }
    }

    /// Suggest up to five words starting with `prefix`.
    ///
    /// A short prefix is a defined precondition, not an error: the result
    /// is empty and neither the database nor the remote is touched.
    pub async fn suggest(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.trim();
        if prefix.chars().count() < MIN_PREFIX_CHARS {
            return Ok(Vec::new());
        }

        let mut merged = word_ext::find_words_with_prefix(&self.db, prefix, SUGGEST_CAP).await?;

        if merged.len() < SUGGEST_CAP {
            let remote = self.remote.suggest(prefix).await;
            for word in remote {
                if merged.len() >= SUGGEST_CAP {
                    break;
                }
                if merged.iter().any(|existing| existing == &word) {
                    continue;
                }
                merged.push(word);
            }
        }

        Ok(merged)
    }
}
