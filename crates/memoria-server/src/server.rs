//! The tool facade (C8, spec §4.8): maps MCP tool calls onto
//! `memoria-service` methods, validating inputs at the boundary and
//! formatting results through `memoria-compose` where the spec calls
//! for a digest rather than a raw record dump.

use std::sync::Arc;

use memoria_compose::{compose, format_digest};
use memoria_core::config::ComposerConfig;
use memoria_core::query::SortBy;
use memoria_core::{CleanSearchResult, MemoryRecord};
use memoria_maintenance::BackgroundMaintainer;
use memoria_service::{MemoryService, SearchType};
use memoria_tokens::TokenCounter;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::errors::{invalid_params, to_mcp_error};
use crate::validation::{validate_content_length, validate_min_array_size, validate_threshold};

#[derive(Clone)]
pub struct MemoriaToolServer {
    service: Arc<MemoryService>,
    maintainer: Arc<BackgroundMaintainer>,
    composer_config: ComposerConfig,
    counter: Arc<TokenCounter>,
    tool_router: ToolRouter<Self>,
}

fn text_result(body: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(body)])
}

fn parse_sort_by(raw: Option<String>) -> Result<SortBy, McpError> {
    match raw.as_deref() {
        None => Ok(SortBy::CreatedAt),
        Some("created_at") => Ok(SortBy::CreatedAt),
        Some("importance") => Ok(SortBy::Importance),
        Some("relevance") => Ok(SortBy::Relevance),
        Some(other) => Err(invalid_params(format!(
            "sort_by must be one of created_at, importance, relevance; got '{other}'"
        ))),
    }
}

fn parse_search_type(raw: Option<String>) -> Result<SearchType, McpError> {
    match raw.as_deref() {
        None | Some("text") => Ok(SearchType::Text),
        Some("semantic") => Ok(SearchType::Semantic),
        Some("hybrid") => Ok(SearchType::Hybrid),
        Some(other) => Err(invalid_params(format!(
            "search_type must be one of text, semantic, hybrid; got '{other}'"
        ))),
    }
}

fn with_no_similarity(record: memoria_core::CleanRecord) -> CleanSearchResult {
    CleanSearchResult {
        record,
        similarity: None,
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RememberRequest {
    /// Content to remember, up to 2000 characters.
    content: String,
    /// Importance from 0 (trivial) to 10 (critical). Out-of-range values are clamped.
    #[serde(default = "default_importance")]
    importance: i32,
    #[serde(default)]
    tags: Vec<String>,
}

fn default_importance() -> i32 {
    5
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RecallRequest {
    query: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    /// One of "text", "semantic", "hybrid". Defaults to "text".
    search_type: Option<String>,
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize, JsonSchema)]
struct IdRequest {
    id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListMemoriesRequest {
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
    /// One of "created_at", "importance", "relevance". Defaults to "created_at".
    sort_by: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateMemoryRequest {
    id: String,
    content: Option<String>,
    importance: Option<i32>,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BackfillRequest {
    #[serde(default = "default_batch_size")]
    batch_size: usize,
}

fn default_batch_size() -> usize {
    10
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ConsolidateRequest {
    /// At least two source memory ids.
    ids: Vec<String>,
    prompt: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RelatedRequest {
    id: String,
    #[serde(default)]
    include_consolidated: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SimilarRequest {
    id: String,
    /// Defaults to the server's configured `SIMILARITY_THRESHOLD` when omitted.
    threshold: Option<f64>,
    #[serde(default = "default_similar_limit")]
    limit: usize,
}

fn default_similar_limit() -> usize {
    5
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LinkRequest {
    a: String,
    b: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AutoLinkRequest {
    /// Defaults to the server's configured `SIMILARITY_THRESHOLD` when omitted.
    threshold: Option<f64>,
    #[serde(default = "default_max_per_memory")]
    max_per_memory: usize,
}

fn default_max_per_memory() -> usize {
    5
}

#[tool_router]
impl MemoriaToolServer {
    pub fn new(
        service: Arc<MemoryService>,
        maintainer: Arc<BackgroundMaintainer>,
        composer_config: ComposerConfig,
        counter: Arc<TokenCounter>,
    ) -> Self {
        Self {
            service,
            maintainer,
            composer_config,
            counter,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Store a new memory with importance and optional tags.")]
    async fn remember(&self, Parameters(req): Parameters<RememberRequest>) -> Result<CallToolResult, McpError> {
        validate_content_length(&req.content).map_err(invalid_params)?;

        let record = self
            .service
            .remember(req.content, req.importance, req.tags)
            .await
            .map_err(to_mcp_error)?;
        self.maintainer.schedule();

        Ok(text_result(format!("Memory stored with ID: {}", record.id)))
    }

    #[tool(description = "Search memories by text, semantic similarity, or both. Returns a token-budgeted digest.")]
    async fn recall(&self, Parameters(req): Parameters<RecallRequest>) -> Result<CallToolResult, McpError> {
        let search_type = parse_search_type(req.search_type)?;

        let results = self
            .service
            .recall(req.query, req.tags, req.limit, search_type)
            .await
            .map_err(to_mcp_error)?;
        self.maintainer.schedule();

        let digest = compose(results, &self.composer_config, &self.counter);
        Ok(text_result(format_digest(&digest)))
    }

    #[tool(description = "Fetch a single memory by id. Bumps its access count and last-accessed time.")]
    async fn get_memory(&self, Parameters(req): Parameters<IdRequest>) -> Result<CallToolResult, McpError> {
        let record = self.service.get_memory(&req.id).await.map_err(to_mcp_error)?;
        self.maintainer.schedule();

        match record {
            Some(record) => Ok(text_result(serde_json::to_string_pretty(&record).unwrap_or_default())),
            None => Ok(text_result(format!("No memory found with ID: {}", req.id))),
        }
    }

    #[tool(description = "List memories filtered by tags, sorted and paginated.")]
    async fn list_memories(&self, Parameters(req): Parameters<ListMemoriesRequest>) -> Result<CallToolResult, McpError> {
        let sort_by = parse_sort_by(req.sort_by)?;

        let records = self
            .service
            .list_memories(req.tags, req.limit, sort_by, req.offset)
            .await
            .map_err(to_mcp_error)?;
        self.maintainer.schedule();

        let as_results: Vec<CleanSearchResult> = records.into_iter().map(with_no_similarity).collect();
        let digest = compose(as_results, &self.composer_config, &self.counter);
        Ok(text_result(format_digest(&digest)))
    }

    #[tool(description = "Update a memory's content, importance, and/or tags. Tags are replaced, not merged.")]
    async fn update_memory(&self, Parameters(req): Parameters<UpdateMemoryRequest>) -> Result<CallToolResult, McpError> {
        if let Some(content) = &req.content {
            validate_content_length(content).map_err(invalid_params)?;
        }

        let updated = self
            .service
            .update_memory(&req.id, req.content, req.importance, req.tags)
            .await
            .map_err(to_mcp_error)?;
        self.maintainer.schedule();

        match updated {
            Some(record) => Ok(text_result(serde_json::to_string_pretty(&record).unwrap_or_default())),
            None => Ok(text_result(format!("No memory found with ID: {}", req.id))),
        }
    }

    #[tool(description = "Delete a memory by id.")]
    async fn forget(&self, Parameters(req): Parameters<IdRequest>) -> Result<CallToolResult, McpError> {
        let deleted = self.service.forget(&req.id).await.map_err(to_mcp_error)?;
        self.maintainer.schedule();

        if deleted {
            Ok(text_result(format!("Memory {} forgotten.", req.id)))
        } else {
            Ok(text_result(format!("No memory found with ID: {}", req.id)))
        }
    }

    #[tool(description = "Backfill embeddings for memories that don't have one yet.")]
    async fn generate_embeddings_for_existing(
        &self,
        Parameters(req): Parameters<BackfillRequest>,
    ) -> Result<CallToolResult, McpError> {
        let report = self.service.generate_embeddings_for_existing(req.batch_size).await;
        self.maintainer.schedule();

        Ok(text_result(format!(
            "Processed {} memories, updated {}. Errors: {}",
            report.processed,
            report.updated,
            report.errors.len()
        )))
    }

    #[tool(description = "Consolidate two or more memories into a single summarized memory, linking the sources to it.")]
    async fn consolidate_memories(&self, Parameters(req): Parameters<ConsolidateRequest>) -> Result<CallToolResult, McpError> {
        validate_min_array_size(&req.ids, 2, "ids").map_err(invalid_params)?;

        let consolidated = self
            .service
            .consolidate_memories(req.ids, req.prompt)
            .await
            .map_err(to_mcp_error)?;
        self.maintainer.schedule();

        Ok(text_result(format_consolidation(&consolidated)))
    }

    #[tool(description = "Get memories related to a given one: consolidation ancestry/descendants, vector-similar, and tag-overlapping.")]
    async fn get_related_memories(&self, Parameters(req): Parameters<RelatedRequest>) -> Result<CallToolResult, McpError> {
        let related = self
            .service
            .get_related_memories(&req.id, req.include_consolidated)
            .await
            .map_err(to_mcp_error)?;
        self.maintainer.schedule();

        Ok(text_result(format_related(&related)))
    }

    #[tool(description = "Find memories similar to a given one by vector similarity, without returning similarity scores.")]
    async fn find_similar_memories(&self, Parameters(req): Parameters<SimilarRequest>) -> Result<CallToolResult, McpError> {
        let threshold = req.threshold.unwrap_or_else(|| self.service.similarity_threshold());
        validate_threshold(threshold).map_err(invalid_params)?;

        let results = self
            .service
            .find_similar_memories_with_scores(&req.id, threshold, req.limit)
            .await
            .map_err(to_mcp_error)?;
        self.maintainer.schedule();

        Ok(text_result(format_ranked_listing(&results, false)))
    }

    #[tool(description = "Find memories similar to a given one by vector similarity, including similarity scores.")]
    async fn find_similar_memories_with_scores(
        &self,
        Parameters(req): Parameters<SimilarRequest>,
    ) -> Result<CallToolResult, McpError> {
        let threshold = req.threshold.unwrap_or_else(|| self.service.similarity_threshold());
        validate_threshold(threshold).map_err(invalid_params)?;

        let results = self
            .service
            .find_similar_memories_with_scores(&req.id, threshold, req.limit)
            .await
            .map_err(to_mcp_error)?;
        self.maintainer.schedule();

        Ok(text_result(format_ranked_listing(&results, true)))
    }

    #[tool(description = "Manually link two memories as related, in both directions.")]
    async fn link_memories(&self, Parameters(req): Parameters<LinkRequest>) -> Result<CallToolResult, McpError> {
        self.service.link_memories(&req.a, &req.b).await.map_err(to_mcp_error)?;
        self.maintainer.schedule();

        Ok(text_result(format!("Linked {} and {}.", req.a, req.b)))
    }

    #[tool(description = "Remove a manual link between two memories, in both directions.")]
    async fn unlink_memories(&self, Parameters(req): Parameters<LinkRequest>) -> Result<CallToolResult, McpError> {
        let changed = self.service.unlink_memories(&req.a, &req.b).await.map_err(to_mcp_error)?;
        self.maintainer.schedule();

        if changed {
            Ok(text_result(format!("Unlinked {} and {}.", req.a, req.b)))
        } else {
            Ok(text_result(format!("{} and {} were not linked.", req.a, req.b)))
        }
    }

    #[tool(description = "Scan the collection and automatically link similar memories to each other, up to a per-memory cap.")]
    async fn auto_link_similar_memories(&self, Parameters(req): Parameters<AutoLinkRequest>) -> Result<CallToolResult, McpError> {
        let threshold = req.threshold.unwrap_or_else(|| self.service.similarity_threshold());
        validate_threshold(threshold).map_err(invalid_params)?;

        let report = self
            .service
            .auto_link_similar_memories(threshold, req.max_per_memory)
            .await;
        self.maintainer.schedule();

        Ok(text_result(format!(
            "Linked {} pairs. Errors: {}",
            report.linked,
            report.errors.len()
        )))
    }

    #[tool(description = "Report whether the background maintainer is currently running a maintenance pass.")]
    async fn get_background_status(&self) -> Result<CallToolResult, McpError> {
        Ok(text_result(format!("Background maintainer running: {}", self.maintainer.is_running())))
    }
}

#[tool_handler]
impl ServerHandler for MemoriaToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Memoria gives you persistent memory across sessions. Use `remember` to store \
                 durable facts, decisions, and preferences worth recalling later. Use `recall` at \
                 the start of a task to surface relevant prior context — prefer hybrid search when \
                 unsure. Use `consolidate_memories` to merge several related memories into one once \
                 they accumulate around a topic. Maintenance (embedding backfill, importance decay, \
                 orphan cleanup) runs automatically between calls; you don't need to trigger it."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn format_consolidation(record: &MemoryRecord) -> String {
    format!(
        "Consolidated {} source memories into [{}] (importance: {}): {}",
        record.consolidated_from_or_empty().len(),
        record.id,
        record.importance,
        record.content
    )
}

fn format_related(related: &memoria_service::RelatedMemories) -> String {
    let mut out = String::new();
    if !related.consolidated_from.is_empty() {
        out.push_str("Consolidated From:\n");
        for record in &related.consolidated_from {
            out.push_str(&format!("- [{}] {}\n", record.id, record.content));
        }
    }
    if !related.consolidated_into.is_empty() {
        out.push_str("Consolidated Into:\n");
        for record in &related.consolidated_into {
            out.push_str(&format!("- [{}] {}\n", record.id, record.content));
        }
    }
    if !related.similar.is_empty() {
        out.push_str("Similar:\n");
        out.push_str(&format_ranked_listing(&related.similar, true));
    }
    if !related.related_by_tags.is_empty() {
        out.push_str("Related By Tags:\n");
        for record in &related.related_by_tags {
            out.push_str(&format!("- [{}] {}\n", record.id, record.content));
        }
    }
    if out.is_empty() {
        out.push_str("No related memories found.\n");
    }
    out
}

fn format_ranked_listing(results: &[CleanSearchResult], with_scores: bool) -> String {
    if results.is_empty() {
        return "No similar memories found.\n".to_string();
    }
    let mut out = String::new();
    for result in results {
        let tags = result.record.tags.join(", ");
        if with_scores {
            let similarity = result.similarity.unwrap_or(0.0) * 100.0;
            out.push_str(&format!(
                "- [{}] similarity: {:.1}% (importance: {}, tags: [{}]) {}\n",
                result.record.id, similarity, result.record.importance, tags, result.record.content
            ));
        } else {
            out.push_str(&format!(
                "- [{}] (importance: {}, tags: [{}]) {}\n",
                result.record.id, result.record.importance, tags, result.record.content
            ));
        }
    }
    out
}
