use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::{CleanSearchResult, Query, SearchStrategy};

use crate::service::MemoryService;

impl MemoryService {
    /// `findSimilarMemoriesWithScores` (spec §4.5.9). Requires the
    /// source record to already carry an embedding — callers that pass
    /// an id whose record predates embedding backfill get `NoEmbedding`,
    /// not a silently empty result.
    pub async fn find_similar_memories_with_scores(
        &self,
        id: &str,
        threshold: f64,
        limit: usize,
    ) -> MemoriaResult<Vec<CleanSearchResult>> {
        let Some(source) = self.repo.get(id).await? else {
            return Err(MemoriaError::not_found(id));
        };
        let Some(embedding) = source.embedding.clone() else {
            return Err(MemoriaError::NoEmbedding { id: id.to_string() });
        };

        let mut query = Query::new();
        query.search_strategy = SearchStrategy::Vector;
        query.vector_query = Some(embedding);
        query.include_similarity_scores = true;
        query.limit = limit + 1;

        let ranked = self.repo.find(&query).await?;
        Ok(ranked
            .into_iter()
            .filter(|r| r.record.id != id)
            .filter(|r| r.similarity.unwrap_or(0.0) >= threshold)
            .take(limit)
            .map(|r| CleanSearchResult {
                record: r.record.clean(),
                similarity: r.similarity,
            })
            .collect())
    }
}
