use std::collections::HashSet;

use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::{CleanSearchResult, Query, SearchStrategy};

use crate::service::MemoryService;
use crate::types::RelatedMemories;

const RELATED_BY_TAGS_LIMIT: usize = 10;
const SIMILAR_LIMIT: usize = 5;
/// Fixed threshold for the `similar` bucket, independent of this
/// service's configurable default (spec §4.5.8 hardcodes 0.7 here).
const SIMILAR_THRESHOLD: f64 = 0.7;

impl MemoryService {
    /// `getRelatedMemories` (spec §4.5.8): the union of four buckets —
    /// consolidation ancestry, consolidation descendants, vector
    /// similarity above a fixed 0.7 threshold, and tag-overlap. Manual
    /// `relatedMemories` links are folded into the `similar` bucket
    /// (with no similarity score) when not already present there.
    pub async fn get_related_memories(&self, id: &str, include_consolidated: bool) -> MemoriaResult<RelatedMemories> {
        let Some(source) = self.repo.get(id).await? else {
            return Err(MemoriaError::not_found(id));
        };

        let mut out = RelatedMemories::default();

        if include_consolidated {
            if !source.consolidated_from_or_empty().is_empty() {
                let records = self.repo.get_many(source.consolidated_from_or_empty()).await?;
                out.consolidated_from = records.into_iter().map(|r| r.clean()).collect();
            }
            if !source.consolidated_into_or_empty().is_empty() {
                let records = self.repo.get_many(source.consolidated_into_or_empty()).await?;
                out.consolidated_into = records.into_iter().map(|r| r.clean()).collect();
            }
        }

        let mut similar = if source.embedding.is_some() {
            self.find_similar_memories_with_scores(id, SIMILAR_THRESHOLD, SIMILAR_LIMIT)
                .await?
        } else {
            Vec::new()
        };

        let mut present: HashSet<String> = similar.iter().map(|r| r.record.id.clone()).collect();
        present.insert(id.to_string());

        for related_id in source.related_memories_or_empty() {
            if present.contains(related_id) {
                continue;
            }
            if let Some(record) = self.repo.get(related_id).await? {
                present.insert(record.id.clone());
                similar.push(CleanSearchResult {
                    record: record.clean(),
                    similarity: None,
                });
            }
        }
        out.similar = similar;

        let mut tag_query = Query::new();
        tag_query.tags = source.tags.clone();
        tag_query.text_query = Some(source.tags.join(" "));
        tag_query.search_strategy = SearchStrategy::Text;
        tag_query.limit = RELATED_BY_TAGS_LIMIT;
        let ranked = self.repo.find(&tag_query).await?;
        out.related_by_tags = ranked
            .into_iter()
            .map(|r| r.record)
            .filter(|r| r.id != id)
            .map(|r| r.clean())
            .collect();

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;

    #[tokio::test]
    async fn related_requires_source_to_exist() {
        let service = test_service();
        assert!(service.get_related_memories("missing", true).await.is_err());
    }

    #[tokio::test]
    async fn related_merges_manual_links_into_similar() {
        let service = test_service();
        let a = service.remember("alpha one".to_string(), 5, vec![]).await.unwrap();
        let b = service.remember("totally unrelated text".to_string(), 5, vec![]).await.unwrap();
        service.link_memories(&a.id, &b.id).await.unwrap();

        let related = service.get_related_memories(&a.id, false).await.unwrap();
        assert!(related.similar.iter().any(|r| r.record.id == b.id));
    }

    #[tokio::test]
    async fn related_by_tags_excludes_the_source_itself() {
        let service = test_service();
        let a = service.remember("x".to_string(), 5, vec!["shared".to_string()]).await.unwrap();
        let related = service.get_related_memories(&a.id, false).await.unwrap();
        assert!(related.related_by_tags.iter().all(|r| r.id != a.id));
    }
}
