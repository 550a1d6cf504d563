//! vocabox-we - Word Enrichment service
//!
//! Builds display-ready lexical records for vocabulary words: phonetics,
//! translation, example sentence, pronunciation audio, and an
//! illustration, assembled cache-first from external dictionary,
//! translation, and image sources.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use vocabox_we::services::{
    AssetStore, DictApiClient, Enricher, ImageGenClient, ImageSource, LexicalSource, SuggestClient,
    Suggester, SuggestionSource, TranslateClient, TranslationSource,
};
use vocabox_we::AppState;

/// Image download timeout (covers the largest generated images).
const ASSET_TIMEOUT_SECS: u64 = 5;

#[derive(Parser, Debug)]
#[command(name = "vocabox-we", about = "Vocabox word enrichment service", version)]
struct Args {
    /// Root folder holding the database and stored assets
    #[arg(long)]
    root_folder: Option<String>,

    /// HTTP listen port
    #[arg(long, default_value_t = 5731)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting vocabox-we (Word Enrichment) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve and prepare the root folder
    let root_folder = vocabox_common::config::resolve_root_folder(args.root_folder.as_deref());
    vocabox_common::config::ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    // Open or create the database
    let db_path = vocabox_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());
    let db_pool = vocabox_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Explicitly constructed collaborators; their lifetime is the process
    let assets_dir = vocabox_common::config::assets_dir(&root_folder);
    let asset_store = AssetStore::new(assets_dir.clone(), Duration::from_secs(ASSET_TIMEOUT_SECS))
        .map_err(|e| anyhow::anyhow!("Asset store init failed: {}", e))?;

    let lexical: Arc<dyn LexicalSource> = Arc::new(
        DictApiClient::new().map_err(|e| anyhow::anyhow!("Dictionary client init failed: {}", e))?,
    );
    let translator: Arc<dyn TranslationSource> = Arc::new(
        TranslateClient::new()
            .map_err(|e| anyhow::anyhow!("Translate client init failed: {}", e))?,
    );
    let images: Arc<dyn ImageSource> = Arc::new(
        ImageGenClient::new().map_err(|e| anyhow::anyhow!("Image client init failed: {}", e))?,
    );
    let remote_suggest: Arc<dyn SuggestionSource> = Arc::new(
        SuggestClient::new().map_err(|e| anyhow::anyhow!("Suggest client init failed: {}", e))?,
    );

    let enricher = Arc::new(Enricher::new(
        db_pool.clone(),
        lexical,
        translator,
        images,
        asset_store,
    ));
    let suggester = Arc::new(Suggester::new(db_pool.clone(), remote_suggest));

    let state = AppState::new(db_pool, enricher, suggester);
    let app = vocabox_we::build_router(state, assets_dir);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
