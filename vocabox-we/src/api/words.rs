//! Word lookup and suggestion endpoints
//!
//! Thin layer over the enrichment pipeline: resolves a spelling to a
//! stable entry id, delegates to the orchestrator, and maps its errors
//! to HTTP responses.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::WordEnrichment;
use crate::AppState;

/// Namespace for deriving stable entry ids from canonical spellings when
/// the upstream corpus supplies none. Changing this orphans every cached
/// entry, so it never changes.
const WORD_ID_NAMESPACE: Uuid = Uuid::from_u128(0x7c9e_6679_4225_40b2_b1d4_a716_5534_10ab);

/// Stable entry id for a spelling: same word (case-insensitive), same id.
pub fn derive_vc_id(word: &str) -> String {
    Uuid::new_v5(
        &WORD_ID_NAMESPACE,
        word.trim().to_lowercase().as_bytes(),
    )
    .to_string()
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub word: String,
}

/// GET /api/words/search?word=apple
///
/// Look a word up by spelling, enriching the cache entry as needed.
/// 404 means no source knows the word; a provider outage alone never
/// surfaces here.
pub async fn search_word(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<WordEnrichment>> {
    let word = params.word.trim().to_string();
    if word.is_empty() {
        return Err(ApiError::BadRequest("word must not be empty".to_string()));
    }

    let vc_id = derive_vc_id(&word);
    let result = state.enricher.ensure(&vc_id, &word).await?;
    Ok(Json(result))
}

/// GET /api/words/:vc_id
///
/// Look a word up by its cache id.
pub async fn get_word(
    State(state): State<AppState>,
    Path(vc_id): Path<String>,
) -> ApiResult<Json<WordEnrichment>> {
    let result = state.enricher.ensure(&vc_id, "").await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    pub q: String,
}

/// GET /api/words/suggest?q=app
///
/// Prefix suggestions; under three characters returns an empty list.
pub async fn suggest_words(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> ApiResult<Json<Vec<String>>> {
    let words = state
        .suggester
        .suggest(&params.q)
        .await
        .map_err(ApiError::Common)?;
    Ok(Json(words))
}

/// Build word routes
pub fn word_routes() -> Router<AppState> {
    Router::new()
        .route("/api/words/search", get(search_word))
        .route("/api/words/suggest", get(suggest_words))
        .route("/api/words/:vc_id", get(get_word))
}
