use memoria_core::errors::MemoriaResult;
use memoria_core::query::SortBy;
use memoria_core::traits::EmbeddingTaskType;
use memoria_core::{CleanSearchResult, Query, SearchStrategy};

use crate::service::MemoryService;
use crate::types::SearchType;

impl MemoryService {
    /// `recall` (spec §4.5.2). Text search matches substrings; semantic
    /// search embeds the query text and ranks by cosine similarity;
    /// hybrid runs both and fuses with RRF. A `limit` of zero is not
    /// special-cased — pagination naturally returns nothing.
    pub async fn recall(
        &self,
        query_text: Option<String>,
        tags: Vec<String>,
        limit: usize,
        search_type: SearchType,
    ) -> MemoriaResult<Vec<CleanSearchResult>> {
        let mut query = Query::new();
        query.tags = tags;
        query.limit = limit;
        query.sort_by = SortBy::Relevance;
        query.include_similarity_scores = true;

        match search_type {
            SearchType::Text => {
                query.text_query = query_text;
                query.search_strategy = SearchStrategy::Text;
            }
            SearchType::Semantic => {
                if let Some(text) = &query_text {
                    let embedding = self.embedder.embed(text, EmbeddingTaskType::Query).await;
                    query.vector_query = Some(embedding);
                }
                query.search_strategy = SearchStrategy::Vector;
            }
            SearchType::Hybrid => {
                query.text_query = query_text.clone();
                if let Some(text) = &query_text {
                    let embedding = self.embedder.embed(text, EmbeddingTaskType::Query).await;
                    query.vector_query = Some(embedding);
                }
                query.search_strategy = SearchStrategy::Hybrid;
            }
        }

        let ranked = self.repo.find(&query).await?;
        Ok(ranked
            .into_iter()
            .map(|r| CleanSearchResult {
                record: r.record.clean(),
                similarity: r.similarity,
            })
            .collect())
    }
}
