use std::time::Duration;

use memoria_core::constants::MAINTENANCE_PAGE_SIZE;
use memoria_core::traits::EmbeddingTaskType;
use serde_json::json;

use crate::service::MemoryService;
use crate::types::{AutoLinkReport, BackfillReport};

/// Minimum gap between successive provider calls inside a backfill
/// sub-batch, and between sub-batches, so a pathological collection
/// doesn't hammer the embedding provider in a tight loop.
const INTER_CALL_DELAY_MS: u64 = 50;
const INTER_BATCH_DELAY_MS: u64 = 100;

impl MemoryService {
    /// `autoLinkSimilarMemories` (spec §4.5.11). Walks every record page
    /// by page; for each one under its per-record link cap, finds
    /// similar candidates and links them. Yields between pages so a
    /// large collection doesn't monopolize the scheduler.
    pub async fn auto_link_similar_memories(&self, threshold: f64, max_per_memory: usize) -> AutoLinkReport {
        let mut report = AutoLinkReport::default();
        let mut offset = 0usize;

        loop {
            let page = match self.list_page(offset, MAINTENANCE_PAGE_SIZE).await {
                Ok(page) => page,
                Err(err) => {
                    report.errors.push(format!("page read at offset {offset} failed: {err}"));
                    break;
                }
            };
            if page.is_empty() {
                break;
            }
            let page_len = page.len();

            for record in &page {
                if record.embedding.is_none() {
                    continue;
                }
                let existing = record.related_memories_or_empty().len();
                if existing >= max_per_memory {
                    continue;
                }
                let remaining = max_per_memory - existing;

                let candidates = match self
                    .find_similar_memories_with_scores(&record.id, threshold, remaining)
                    .await
                {
                    Ok(candidates) => candidates,
                    Err(err) => {
                        report.errors.push(format!("{}: {err}", record.id));
                        continue;
                    }
                };

                for candidate in candidates {
                    if record.related_memories_or_empty().contains(&candidate.record.id) {
                        continue;
                    }
                    match self.link_memories(&record.id, &candidate.record.id).await {
                        Ok(()) => report.linked += 1,
                        Err(err) => report.errors.push(format!(
                            "link {} <-> {} failed: {err}",
                            record.id, candidate.record.id
                        )),
                    }
                }
            }

            if page_len < MAINTENANCE_PAGE_SIZE {
                break;
            }
            offset += MAINTENANCE_PAGE_SIZE;
            tokio::task::yield_now().await;
        }

        report
    }

    /// `generateEmbeddingsForExisting` (spec §4.5.12). Idempotent: a
    /// second call finds nothing missing an embedding and updates
    /// nothing. Processes in `batch_size` chunks with a short sleep
    /// between individual embeds and between chunks.
    pub async fn generate_embeddings_for_existing(&self, batch_size: usize) -> BackfillReport {
        let batch_size = batch_size.max(1);
        let mut report = BackfillReport::default();
        let mut offset = 0usize;
        let mut pending = Vec::new();

        loop {
            let page = match self.list_page(offset, MAINTENANCE_PAGE_SIZE).await {
                Ok(page) => page,
                Err(err) => {
                    report.errors.push(format!("page read at offset {offset} failed: {err}"));
                    break;
                }
            };
            if page.is_empty() {
                break;
            }
            let page_len = page.len();
            pending.extend(page.into_iter().filter(|r| r.embedding.is_none()));

            if page_len < MAINTENANCE_PAGE_SIZE {
                break;
            }
            offset += MAINTENANCE_PAGE_SIZE;
        }

        for chunk in pending.chunks(batch_size) {
            for record in chunk {
                report.processed += 1;
                let embedding = self.embedder.embed(&record.content, EmbeddingTaskType::Document).await;
                let partial = json!({
                    "embedding": embedding,
                    "version": record.version + 1,
                });
                match self.repo.update(&record.id, partial).await {
                    Ok(Some(_)) => report.updated += 1,
                    Ok(None) => report.errors.push(format!("{}: disappeared before update", record.id)),
                    Err(err) => report.errors.push(format!("{}: {err}", record.id)),
                }
                tokio::time::sleep(Duration::from_millis(INTER_CALL_DELAY_MS)).await;
            }
            tokio::time::sleep(Duration::from_millis(INTER_BATCH_DELAY_MS)).await;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;

    #[tokio::test]
    async fn auto_link_links_similar_records_within_cap() {
        let service = test_service();
        let a = service.remember("shared content alpha".to_string(), 5, vec![]).await.unwrap();
        let b = service.remember("shared content beta".to_string(), 5, vec![]).await.unwrap();
        let report = service.auto_link_similar_memories(0.0, 5).await;
        assert!(report.errors.is_empty());
        let a_after = service.get_memory(&a.id).await.unwrap().unwrap();
        assert!(a_after.related_memories.unwrap_or_default().contains(&b.id));
    }

    #[tokio::test]
    async fn backfill_is_idempotent() {
        let service = test_service();
        service.remember("x".to_string(), 5, vec![]).await.unwrap();
        let first = service.generate_embeddings_for_existing(10).await;
        assert_eq!(first.processed, 0);
        assert_eq!(first.updated, 0);
    }
}
