use std::collections::HashMap;
use std::sync::Arc;

use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::query::{SearchStrategy, SortBy, SortOrder};
use memoria_core::traits::StoreAdapter;
use memoria_core::{MemoryRecord, Query};
use serde_json::Value;
use tracing::trace;

use crate::cosine::cosine_similarity;
use crate::filter::{matches_non_text, matches_text};
use crate::rrf::reciprocal_rank_fusion;

const RRF_K: f64 = 60.0;

/// A record plus the similarity score that earned it its rank, when the
/// query asked for one (spec §4.4 `includeSimilarityScores`).
#[derive(Debug, Clone)]
pub struct RankedRecord {
    pub record: MemoryRecord,
    pub similarity: Option<f64>,
}

/// The repository (C4): owns the query pipeline over a `StoreAdapter`.
/// Every query re-scans the full collection — the acknowledged ceiling
/// of spec §9 — and filters/ranks/paginates in memory.
pub struct Repository {
    store: Arc<dyn StoreAdapter>,
}

impl Repository {
    pub fn new(store: Arc<dyn StoreAdapter>) -> Self {
        Self { store }
    }

    /// Filter → rank → paginate (spec §4.4).
    pub async fn find(&self, query: &Query) -> MemoriaResult<Vec<RankedRecord>> {
        let ranked = self.rank_all(query).await?;
        Ok(paginate(ranked, query.offset, query.limit))
    }

    /// Count of records matching filter + strategy, before pagination.
    pub async fn count(&self, query: &Query) -> MemoriaResult<usize> {
        Ok(self.rank_all(query).await?.len())
    }

    async fn rank_all(&self, query: &Query) -> MemoriaResult<Vec<RankedRecord>> {
        let all = self.store.scan().await?;
        trace!(scanned = all.len(), strategy = ?query.search_strategy, "repository scan");

        let mut ranked = match query.search_strategy {
            SearchStrategy::Text => rank_text(all, query),
            SearchStrategy::Vector => rank_vector(all, query)?,
            SearchStrategy::Hybrid => rank_hybrid(all, query)?,
        };

        if !query.include_similarity_scores {
            for r in &mut ranked {
                r.similarity = None;
            }
        }

        Ok(ranked)
    }

    pub async fn add(&self, record: MemoryRecord) -> MemoriaResult<MemoryRecord> {
        self.store.create(record).await
    }

    pub async fn get(&self, id: &str) -> MemoriaResult<Option<MemoryRecord>> {
        self.store.read(id).await
    }

    /// Best-effort batch read: ids with no matching record are silently
    /// omitted; callers that need to detect missing ids compare lengths.
    pub async fn get_many(&self, ids: &[String]) -> MemoriaResult<Vec<MemoryRecord>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.store.read(id).await? {
                out.push(record);
            }
        }
        Ok(out)
    }

    pub async fn update(&self, id: &str, partial: Value) -> MemoriaResult<Option<MemoryRecord>> {
        self.store.update(id, partial).await
    }

    pub async fn delete(&self, id: &str) -> MemoriaResult<bool> {
        self.store.delete(id).await
    }

    pub async fn exists(&self, id: &str) -> MemoriaResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

fn paginate(ranked: Vec<RankedRecord>, offset: usize, limit: usize) -> Vec<RankedRecord> {
    ranked.into_iter().skip(offset).take(limit).collect()
}

fn sort_key_value(record: &MemoryRecord, sort_by: SortBy) -> i64 {
    match sort_by {
        SortBy::CreatedAt => record.created_at.timestamp_millis(),
        SortBy::Importance | SortBy::Relevance => record.importance as i64,
        SortBy::LastAccessed => record.last_accessed.timestamp_millis(),
    }
}

fn sort_records(records: &mut [MemoryRecord], sort_by: SortBy, order: SortOrder) {
    records.sort_by(|a, b| {
        let ka = sort_key_value(a, sort_by);
        let kb = sort_key_value(b, sort_by);
        match order {
            SortOrder::Ascending => ka.cmp(&kb),
            SortOrder::Descending => kb.cmp(&ka),
        }
    });
}

fn rank_text(mut records: Vec<MemoryRecord>, query: &Query) -> Vec<RankedRecord> {
    records.retain(|r| matches_non_text(r, query));
    if let Some(text_query) = &query.text_query {
        records.retain(|r| matches_text(r, text_query));
    }
    sort_records(&mut records, query.sort_by, query.sort_order);
    records
        .into_iter()
        .map(|record| RankedRecord { record, similarity: None })
        .collect()
}

fn rank_vector(records: Vec<MemoryRecord>, query: &Query) -> MemoriaResult<Vec<RankedRecord>> {
    let Some(vector_query) = &query.vector_query else {
        return Err(MemoriaError::validation(
            "vector search strategy requires a vectorQuery",
        ));
    };

    let mut scored: Vec<(MemoryRecord, f64)> = Vec::new();
    for record in records {
        if matches_non_text(&record, query) {
            if let Some(embedding) = &record.embedding {
                if embedding.len() == vector_query.len() {
                    let sim = cosine_similarity(embedding, vector_query)?;
                    scored.push((record, sim));
                }
            }
        }
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(scored
        .into_iter()
        .map(|(record, similarity)| RankedRecord {
            record,
            similarity: Some(similarity),
        })
        .collect())
}

fn rank_hybrid(records: Vec<MemoryRecord>, query: &Query) -> MemoriaResult<Vec<RankedRecord>> {
    if query.vector_query.is_none() {
        return Err(MemoriaError::validation(
            "hybrid search strategy requires a vectorQuery",
        ));
    }

    let text_ranked = rank_text(records.clone(), query);
    let vector_ranked = rank_vector(records, query)?;

    let similarity_by_id: HashMap<String, f64> = vector_ranked
        .iter()
        .filter_map(|r| r.similarity.map(|s| (r.record.id.clone(), s)))
        .collect();

    let mut record_by_id: HashMap<String, MemoryRecord> = HashMap::new();
    for r in text_ranked.iter().chain(vector_ranked.iter()) {
        record_by_id.entry(r.record.id.clone()).or_insert_with(|| r.record.clone());
    }

    let text_ids: Vec<String> = text_ranked.iter().map(|r| r.record.id.clone()).collect();
    let vector_ids: Vec<String> = vector_ranked.iter().map(|r| r.record.id.clone()).collect();

    let fused = reciprocal_rank_fusion(&[text_ids, vector_ids], RRF_K);

    Ok(fused
        .into_iter()
        .filter_map(|(id, _score)| {
            record_by_id.get(&id).cloned().map(|record| RankedRecord {
                similarity: similarity_by_id.get(&id).copied(),
                record,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use memoria_storage_test_support::*;

    // Minimal local support module to avoid a cyclic dev-dependency on
    // memoria-storage: a tiny in-memory StoreAdapter for repository tests.
    mod memoria_storage_test_support {
        use async_trait::async_trait;
        use memoria_core::errors::{MemoriaError, MemoriaResult};
        use memoria_core::memory::MemoryRecord;
        use memoria_core::traits::StoreAdapter;
        use serde_json::Value;
        use std::sync::RwLock;

        #[derive(Default)]
        pub struct TestStore(RwLock<Vec<MemoryRecord>>);

        impl TestStore {
            pub fn new(records: Vec<MemoryRecord>) -> Self {
                Self(RwLock::new(records))
            }
        }

        #[async_trait]
        impl StoreAdapter for TestStore {
            async fn create(&self, doc: MemoryRecord) -> MemoriaResult<MemoryRecord> {
                self.0.write().unwrap().push(doc.clone());
                Ok(doc)
            }
            async fn read(&self, id: &str) -> MemoriaResult<Option<MemoryRecord>> {
                Ok(self.0.read().unwrap().iter().find(|r| r.id == id).cloned())
            }
            async fn update(&self, _id: &str, _partial: Value) -> MemoriaResult<Option<MemoryRecord>> {
                Err(MemoriaError::store("not supported in test store"))
            }
            async fn delete(&self, id: &str) -> MemoriaResult<bool> {
                let mut guard = self.0.write().unwrap();
                let before = guard.len();
                guard.retain(|r| r.id != id);
                Ok(guard.len() != before)
            }
            async fn scan(&self) -> MemoriaResult<Vec<MemoryRecord>> {
                Ok(self.0.read().unwrap().clone())
            }
        }
    }

    fn record(id: &str, content: &str, importance: i32, tags: &[&str], embedding: Option<Vec<f32>>) -> MemoryRecord {
        MemoryRecord {
            id: id.to_string(),
            content: content.to_string(),
            importance,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            embedding,
            created_at: Utc::now(),
            last_accessed: Utc::now(),
            access_count: 1,
            version: 1,
            consolidated_from: None,
            consolidated_into: None,
            is_consolidated: None,
            consolidation_status: None,
            related_memories: None,
        }
    }

    #[tokio::test]
    async fn text_strategy_filters_by_substring() {
        let store = Arc::new(TestStore::new(vec![
            record("a", "Dogs are loyal", 5, &["animals"], None),
            record("b", "Cats are independent", 5, &["animals"], None),
        ]));
        let repo = Repository::new(store);
        let mut q = Query::new();
        q.text_query = Some("Dogs".to_string());
        let results = repo.find(&q).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.id, "a");
    }

    #[tokio::test]
    async fn vector_strategy_requires_vector_query() {
        let store = Arc::new(TestStore::new(vec![]));
        let repo = Repository::new(store);
        let mut q = Query::new();
        q.search_strategy = SearchStrategy::Vector;
        assert!(repo.find(&q).await.is_err());
    }

    #[tokio::test]
    async fn vector_strategy_excludes_records_without_embedding() {
        let store = Arc::new(TestStore::new(vec![
            record("a", "has embedding", 5, &[], Some(vec![1.0, 0.0])),
            record("b", "no embedding", 5, &[], None),
        ]));
        let repo = Repository::new(store);
        let mut q = Query::new();
        q.search_strategy = SearchStrategy::Vector;
        q.vector_query = Some(vec![1.0, 0.0]);
        let results = repo.find(&q).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.id, "a");
    }

    #[tokio::test]
    async fn pagination_applies_after_ranking() {
        let records: Vec<_> = (0..5)
            .map(|i| record(&format!("id{i}"), "x", i, &[], None))
            .collect();
        let store = Arc::new(TestStore::new(records));
        let repo = Repository::new(store);
        let mut q = Query::new();
        q.sort_by = SortBy::Importance;
        q.sort_order = SortOrder::Descending;
        q.offset = 1;
        q.limit = 2;
        let results = repo.find(&q).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.importance, 3);
        assert_eq!(results[1].record.importance, 2);
    }

    #[tokio::test]
    async fn date_range_filter_is_inclusive() {
        let now = Utc::now();
        let mut r = record("a", "x", 5, &[], None);
        r.created_at = now;
        let store = Arc::new(TestStore::new(vec![r]));
        let repo = Repository::new(store);
        let mut q = Query::new();
        q.date_from = Some(now - Duration::seconds(1));
        q.date_to = Some(now + Duration::seconds(1));
        assert_eq!(repo.find(&q).await.unwrap().len(), 1);
    }
}
