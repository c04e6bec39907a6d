use memoria_core::errors::MemoriaResult;
use memoria_core::query::{SortBy, SortOrder};
use memoria_core::{CleanRecord, Query};

use crate::service::MemoryService;

impl MemoryService {
    /// `listMemories` (spec §4.5.6): a plain filtered, sorted, paginated
    /// listing with no ranking involved — always the text strategy with
    /// no text query, which matches everything.
    pub async fn list_memories(
        &self,
        tags: Vec<String>,
        limit: usize,
        sort_by: SortBy,
        offset: usize,
    ) -> MemoriaResult<Vec<CleanRecord>> {
        let mut query = Query::new();
        query.tags = tags;
        query.limit = limit;
        query.offset = offset;
        query.sort_by = sort_by;
        query.sort_order = SortOrder::Descending;

        let ranked = self.repo.find(&query).await?;
        Ok(ranked.into_iter().map(|r| r.record.clean()).collect())
    }

    /// Shared helper for the background sweeps (auto-link, backfill,
    /// orphan cleanup): every record, unpaged at the repository level
    /// but walked page by page by the caller via `offset`/`limit`.
    pub(crate) async fn list_page(&self, offset: usize, limit: usize) -> MemoriaResult<Vec<CleanRecordOrDirty>> {
        let mut query = Query::new();
        query.limit = limit;
        query.offset = offset;
        query.sort_by = SortBy::CreatedAt;
        query.sort_order = SortOrder::Ascending;

        let ranked = self.repo.find(&query).await?;
        Ok(ranked.into_iter().map(|r| r.record).collect())
    }
}

/// Alias kept distinct from `CleanRecord` — the maintenance sweeps need
/// the dirty (internal) record, embedding included, not the clean one.
pub(crate) type CleanRecordOrDirty = memoria_core::MemoryRecord;

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;
    use memoria_core::query::SortBy;

    #[tokio::test]
    async fn list_sorts_by_importance_descending() {
        let service = test_service();
        service.remember("a".to_string(), 2, vec![]).await.unwrap();
        service.remember("b".to_string(), 8, vec![]).await.unwrap();
        let results = service
            .list_memories(vec![], 10, SortBy::Importance, 0)
            .await
            .unwrap();
        assert_eq!(results[0].importance, 8);
        assert_eq!(results[1].importance, 2);
    }

    #[tokio::test]
    async fn list_filters_by_tags() {
        let service = test_service();
        service.remember("a".to_string(), 5, vec!["x".to_string()]).await.unwrap();
        service.remember("b".to_string(), 5, vec!["y".to_string()]).await.unwrap();
        let results = service
            .list_memories(vec!["x".to_string()], 10, SortBy::CreatedAt, 0)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tags, vec!["x".to_string()]);
    }
}
