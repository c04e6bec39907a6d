use chrono::Utc;
use memoria_core::errors::MemoriaResult;
use memoria_core::traits::EmbeddingTaskType;
use memoria_core::{CleanRecord, MemoryRecord};
use tracing::info;
use uuid::Uuid;

use crate::service::MemoryService;

impl MemoryService {
    /// `remember` (spec §4.5.1). Clamps importance, defaults tags,
    /// requests a best-effort document embedding, and writes a fresh
    /// record with `accessCount = version = 1`.
    pub async fn remember(
        &self,
        content: String,
        importance: i32,
        tags: Vec<String>,
    ) -> MemoriaResult<CleanRecord> {
        let importance = MemoryRecord::clamp_importance(importance);
        let embedding = self.embedder.embed(&content, EmbeddingTaskType::Document).await;
        let now = Utc::now();

        let record = MemoryRecord {
            id: Uuid::new_v4().to_string(),
            content,
            importance,
            tags,
            embedding: Some(embedding),
            created_at: now,
            last_accessed: now,
            access_count: 1,
            version: 1,
            consolidated_from: None,
            consolidated_into: None,
            is_consolidated: None,
            consolidation_status: None,
            related_memories: None,
        };

        let stored = self.repo.add(record).await?;
        info!(id = %stored.id, "memory stored");
        Ok(stored.clean())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;

    #[tokio::test]
    async fn remember_clamps_importance_and_initializes_bookkeeping() {
        let service = test_service();
        let record = service
            .remember("hello".to_string(), 99, vec!["tag".to_string()])
            .await
            .unwrap();
        assert_eq!(record.importance, 10);
        assert_eq!(record.access_count, 1);
    }

    #[tokio::test]
    async fn remember_then_get_round_trips_content_and_tags() {
        let service = test_service();
        let created = service
            .remember("hello world".to_string(), 5, vec!["a".to_string()])
            .await
            .unwrap();
        let fetched = service.get_memory(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "hello world");
        assert_eq!(fetched.tags, vec!["a".to_string()]);
    }
}
