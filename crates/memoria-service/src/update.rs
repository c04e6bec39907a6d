use chrono::Utc;
use memoria_core::errors::MemoriaResult;
use memoria_core::traits::EmbeddingTaskType;
use memoria_core::{CleanRecord, MemoryRecord};
use serde_json::{json, Map, Value};

use crate::service::MemoryService;

impl MemoryService {
    /// `updateMemory` (spec §4.5.4). Always refreshes `lastAccessed`.
    /// Re-embeds on content change (best-effort: the embedding client
    /// never errors outward, so this always succeeds one way or
    /// another — either a real embedding or the deterministic
    /// fallback). Tags are overwritten wholesale, never merged.
    pub async fn update_memory(
        &self,
        id: &str,
        content: Option<String>,
        importance: Option<i32>,
        tags: Option<Vec<String>>,
    ) -> MemoriaResult<Option<CleanRecord>> {
        let Some(current) = self.repo.get(id).await? else {
            return Ok(None);
        };

        let mut partial = Map::new();
        partial.insert("last_accessed".to_string(), json!(Utc::now()));
        partial.insert("version".to_string(), json!(current.version + 1));

        if let Some(new_content) = &content {
            let embedding = self.embedder.embed(new_content, EmbeddingTaskType::Document).await;
            partial.insert("content".to_string(), json!(new_content));
            partial.insert("embedding".to_string(), json!(embedding));
        }
        if let Some(importance) = importance {
            partial.insert(
                "importance".to_string(),
                json!(MemoryRecord::clamp_importance(importance)),
            );
        }
        if let Some(tags) = tags {
            partial.insert("tags".to_string(), json!(tags));
        }

        let updated = self.repo.update(id, Value::Object(partial)).await?;
        Ok(updated.map(|r| r.clean()))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;

    #[tokio::test]
    async fn update_overwrites_tags_without_merging() {
        let service = test_service();
        let created = service
            .remember("x".to_string(), 5, vec!["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        let updated = service
            .update_memory(&created.id, None, None, Some(vec!["c".to_string()]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.tags, vec!["c".to_string()]);
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let service = test_service();
        let result = service.update_memory("missing", None, None, None).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_clamps_importance() {
        let service = test_service();
        let created = service.remember("x".to_string(), 5, vec![]).await.unwrap();
        let updated = service
            .update_memory(&created.id, None, Some(-5), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.importance, 0);
    }
}
