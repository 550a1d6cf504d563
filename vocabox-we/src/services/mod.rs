//! Service layer for vocabox-we
//!
//! The enrichment pipeline and its collaborators. [`Enricher`] is the
//! only component that touches the cache and the source adapters.

pub mod asset_store;
pub mod dict_client;
pub mod enricher;
pub mod formatter;
pub mod image_client;
pub mod sources;
pub mod suggest_client;
pub mod suggester;
pub mod translate_client;

pub use asset_store::AssetStore;
pub use dict_client::DictApiClient;
pub use enricher::{EnrichError, Enricher, WordEnrichment};
pub use formatter::format_translation;
pub use image_client::ImageGenClient;
pub use sources::{ImageSource, LexicalSource, SourceReport, SuggestionSource, TranslationSource};
pub use suggest_client::SuggestClient;
pub use suggester::Suggester;
pub use translate_client::TranslateClient;
