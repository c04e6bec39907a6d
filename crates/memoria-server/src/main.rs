//! Process entry point: loads configuration, wires the store adapter,
//! the embedding/summarization providers, the service, the maintainer,
//! and the tool router, then serves the MCP protocol over stdio until
//! the transport closes (spec §6 "Transport", §5 "Exit behavior").

mod errors;
mod server;
mod validation;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use memoria_core::MemoriaConfig;
use memoria_embeddings::{GeminiEmbeddingClient, GeminiSummarizer};
use memoria_maintenance::BackgroundMaintainer;
use memoria_retrieval::Repository;
use memoria_service::MemoryService;
use memoria_storage::{InMemoryStore, JsonFileStore};
use memoria_tokens::TokenCounter;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use server::MemoriaToolServer;

/// `MEMORIA_LOG=memoria_service=debug,memoria_retrieval=info`, falling
/// back to `memoria=info`. The fmt layer writes to stderr: stdout is
/// the MCP wire and must never carry a stray log line.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MEMORIA_LOG").unwrap_or_else(|_| EnvFilter::new("memoria=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = MemoriaConfig::from_env();

    let store: Arc<dyn memoria_core::StoreAdapter> = match config.storage.database_type.as_str() {
        "json-file" => Arc::new(
            JsonFileStore::new(&config.storage.json_file_directory)
                .await
                .context("failed to initialize json-file store")?,
        ),
        "in-memory" => Arc::new(InMemoryStore::new()),
        other => {
            tracing::warn!(database_type = other, "unknown DATABASE_TYPE, falling back to json-file");
            Arc::new(
                JsonFileStore::new(&config.storage.json_file_directory)
                    .await
                    .context("failed to initialize json-file store")?,
            )
        }
    };

    if config.embedding.api_key.is_empty() {
        bail!("GEMINI_API_KEY is required (spec §6: embedding provider is not optional)");
    }

    let embedder: Arc<dyn memoria_core::EmbeddingProvider> = Arc::new(GeminiEmbeddingClient::new(&config.embedding));
    let summarizer: Arc<dyn memoria_core::traits::SummarizationProvider> =
        Arc::new(GeminiSummarizer::new(config.embedding.api_key.clone()));

    let repo = Repository::new(store);
    let service = Arc::new(MemoryService::new(repo, embedder, summarizer, config.similarity_threshold));
    let maintainer = Arc::new(BackgroundMaintainer::new(service.clone(), config.background.clone()));
    let counter = Arc::new(TokenCounter::new());

    let tool_server = MemoriaToolServer::new(service, maintainer.clone(), config.composer.clone(), counter);

    tracing::info!(database_type = %config.storage.database_type, "memoria server starting");

    let running = tool_server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    running.waiting().await.context("MCP server task failed")?;

    maintainer.dispose(2_000).await;
    tracing::info!("memoria server shut down");

    Ok(())
}
