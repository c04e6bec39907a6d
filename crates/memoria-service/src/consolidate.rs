use std::collections::BTreeSet;

use chrono::Utc;
use memoria_core::constants::MAX_IMPORTANCE;
use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::memory::ConsolidationStatus;
use memoria_core::MemoryRecord;
use serde_json::json;
use tracing::warn;

use crate::service::MemoryService;

impl MemoryService {
    /// `consolidateMemories` (spec §4.5.7): the multi-step saga that
    /// summarizes several source records into one new one and links
    /// them. The new record is written first with `consolidationStatus
    /// = pending` as a write-ahead marker; only once every source has
    /// recorded the back-reference does it flip to `completed`. A
    /// failure partway through leaves the marker at `pending` for the
    /// cleanup sweep to find, rather than silently losing the link.
    pub async fn consolidate_memories(&self, ids: Vec<String>, prompt: Option<String>) -> MemoriaResult<MemoryRecord> {
        if ids.len() < 2 {
            return Err(MemoriaError::validation(
                "consolidation requires at least two source memories",
            ));
        }

        let sources = self.repo.get_many(&ids).await?;
        if sources.len() != ids.len() {
            let found: BTreeSet<&str> = sources.iter().map(|s| s.id.as_str()).collect();
            let missing = ids.iter().find(|id| !found.contains(id.as_str())).unwrap();
            return Err(MemoriaError::not_found(missing.clone()));
        }

        let summary_prompt = prompt.unwrap_or_else(|| default_consolidation_prompt(&sources));
        let summary = match self.summarizer.summarize(&summary_prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "summarization provider failed, falling back to concatenation");
                concatenate_fallback(&sources)
            }
        };

        let importance = (sources.iter().map(|s| s.importance).max().unwrap_or(0) + 1).min(MAX_IMPORTANCE);
        let mut tags: BTreeSet<String> = sources.iter().flat_map(|s| s.tags.iter().cloned()).collect();
        tags.insert("consolidated".to_string());

        let consolidated = self
            .remember(summary, importance, tags.into_iter().collect())
            .await?;

        let mark_pending = json!({
            "consolidated_from": ids,
            "is_consolidated": true,
            "consolidation_status": "pending",
            "version": 2,
        });
        if let Err(err) = self.repo.update(&consolidated.id, mark_pending).await {
            self.mark_failed(&consolidated.id).await;
            return Err(err);
        }

        for source_id in &ids {
            if let Err(err) = self.append_consolidated_into(source_id, &consolidated.id).await {
                warn!(error = %err, source_id, "failed to record consolidation back-reference");
                self.mark_failed(&consolidated.id).await;
                return Err(MemoriaError::store(format!(
                    "consolidation back-reference failed for {source_id}: {err}"
                )));
            }
        }

        let completed = json!({ "consolidation_status": "completed" });
        let final_record = self.repo.update(&consolidated.id, completed).await?;
        final_record.ok_or_else(|| MemoriaError::not_found(consolidated.id.clone()))
    }

    /// `cleanupOrphanedConsolidations`: sweeps records stuck at
    /// `consolidationStatus = pending` past `max_age_ms`, marking them
    /// `failed` and stripping the dangling back-reference from their
    /// sources. Wired into the maintainer as its lowest-priority task.
    pub async fn cleanup_orphaned_consolidations(&self, max_age_ms: i64) -> MemoriaResult<usize> {
        let now = Utc::now();
        let mut swept = 0usize;
        let mut offset = 0usize;
        const PAGE: usize = memoria_core::constants::MAINTENANCE_PAGE_SIZE;

        loop {
            let page = self.list_page(offset, PAGE).await?;
            if page.is_empty() {
                break;
            }
            let page_len = page.len();

            for record in page {
                if record.consolidation_status != Some(ConsolidationStatus::Pending) {
                    continue;
                }
                let age_ms = (now - record.created_at).num_milliseconds();
                if age_ms < max_age_ms {
                    continue;
                }

                self.mark_failed(&record.id).await;
                for source_id in record.consolidated_from_or_empty() {
                    self.strip_back_reference(source_id, &record.id).await;
                }
                swept += 1;
            }

            if page_len < PAGE {
                break;
            }
            offset += PAGE;
            tokio::task::yield_now().await;
        }

        Ok(swept)
    }

    async fn mark_failed(&self, id: &str) {
        let partial = json!({ "consolidation_status": "failed" });
        if let Err(err) = self.repo.update(id, partial).await {
            warn!(error = %err, id, "failed to mark consolidation as failed");
        }
    }

    async fn append_consolidated_into(&self, source_id: &str, new_id: &str) -> MemoriaResult<()> {
        let Some(source) = self.repo.get(source_id).await? else {
            return Err(MemoriaError::not_found(source_id));
        };
        let mut into = source.consolidated_into_or_empty().to_vec();
        if !into.iter().any(|id| id == new_id) {
            into.push(new_id.to_string());
        }
        let partial = json!({
            "consolidated_into": into,
            "version": source.version + 1,
        });
        self.repo.update(source_id, partial).await?;
        Ok(())
    }

    async fn strip_back_reference(&self, source_id: &str, new_id: &str) {
        let Ok(Some(source)) = self.repo.get(source_id).await else {
            return;
        };
        let mut into = source.consolidated_into_or_empty().to_vec();
        let before = into.len();
        into.retain(|id| id != new_id);
        if into.len() == before {
            return;
        }
        let partial = json!({
            "consolidated_into": into,
            "version": source.version + 1,
        });
        let _ = self.repo.update(source_id, partial).await;
    }
}

fn default_consolidation_prompt(sources: &[MemoryRecord]) -> String {
    let mut prompt = String::from("Summarize the following related memories into one concise memory:\n\n");
    for source in sources {
        prompt.push_str("- ");
        prompt.push_str(&source.content);
        prompt.push('\n');
    }
    prompt
}

fn concatenate_fallback(sources: &[MemoryRecord]) -> String {
    sources
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;
    use memoria_core::memory::ConsolidationStatus;

    #[tokio::test]
    async fn consolidate_requires_at_least_two_sources() {
        let service = test_service();
        let a = service.remember("a".to_string(), 5, vec![]).await.unwrap();
        assert!(service.consolidate_memories(vec![a.id], None).await.is_err());
    }

    #[tokio::test]
    async fn consolidate_rejects_missing_source_without_mutating_state() {
        let service = test_service();
        let a = service.remember("a".to_string(), 5, vec![]).await.unwrap();
        let result = service
            .consolidate_memories(vec![a.id.clone(), "missing".to_string()], None)
            .await;
        assert!(result.is_err());
        let still_there = service.get_memory(&a.id).await.unwrap().unwrap();
        assert_eq!(still_there.content, "a");
    }

    #[tokio::test]
    async fn consolidate_falls_back_to_concatenation_on_provider_failure() {
        let service = test_service();
        let a = service.remember("alpha".to_string(), 3, vec!["x".to_string()]).await.unwrap();
        let b = service.remember("beta".to_string(), 7, vec!["y".to_string()]).await.unwrap();

        let consolidated = service
            .consolidate_memories(vec![a.id.clone(), b.id.clone()], None)
            .await
            .unwrap();

        assert!(consolidated.content.contains("alpha"));
        assert!(consolidated.content.contains("beta"));
        assert_eq!(consolidated.importance, 8);
        assert!(consolidated.tags.contains(&"consolidated".to_string()));
        assert_eq!(consolidated.consolidation_status, Some(ConsolidationStatus::Completed));

        let source_a = service.get_memory(&a.id).await.unwrap().unwrap();
        assert_eq!(
            source_a.consolidated_into.unwrap(),
            vec![consolidated.id.clone()]
        );
    }

    #[tokio::test]
    async fn orphan_cleanup_sweeps_nothing_when_none_are_pending() {
        let service = test_service();
        let swept = service.cleanup_orphaned_consolidations(0).await.unwrap();
        assert_eq!(swept, 0);
    }
}
