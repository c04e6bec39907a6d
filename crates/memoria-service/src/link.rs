use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::MemoryRecord;
use serde_json::json;

use crate::service::MemoryService;

impl MemoryService {
    /// `linkMemories` (spec §4.5.10). Writes both sides independently —
    /// there is no transaction, so invariant (3) (links are symmetric)
    /// may be transiently violated if the second write fails after the
    /// first succeeds.
    pub async fn link_memories(&self, a: &str, b: &str) -> MemoriaResult<()> {
        let record_a = self.repo.get(a).await?.ok_or_else(|| MemoriaError::not_found(a))?;
        let record_b = self.repo.get(b).await?.ok_or_else(|| MemoriaError::not_found(b))?;

        self.add_related(&record_a, b).await?;
        self.add_related(&record_b, a).await?;
        Ok(())
    }

    /// `unlinkMemories`. Returns whether anything actually changed —
    /// unlinking a pair that was never linked is a no-op, not an error.
    pub async fn unlink_memories(&self, a: &str, b: &str) -> MemoriaResult<bool> {
        let Some(record_a) = self.repo.get(a).await? else {
            return Ok(false);
        };
        let Some(record_b) = self.repo.get(b).await? else {
            return Ok(false);
        };

        let changed_a = self.remove_related(&record_a, b).await?;
        let changed_b = self.remove_related(&record_b, a).await?;
        Ok(changed_a || changed_b)
    }

    async fn add_related(&self, record: &MemoryRecord, other_id: &str) -> MemoriaResult<()> {
        let mut related = record.related_memories_or_empty().to_vec();
        if related.iter().any(|id| id == other_id) {
            return Ok(());
        }
        related.push(other_id.to_string());
        let partial = json!({
            "related_memories": related,
            "version": record.version + 1,
        });
        self.repo.update(&record.id, partial).await?;
        Ok(())
    }

    async fn remove_related(&self, record: &MemoryRecord, other_id: &str) -> MemoriaResult<bool> {
        let mut related = record.related_memories_or_empty().to_vec();
        let before = related.len();
        related.retain(|id| id != other_id);
        if related.len() == before {
            return Ok(false);
        }
        let partial = json!({
            "related_memories": related,
            "version": record.version + 1,
        });
        self.repo.update(&record.id, partial).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;

    #[tokio::test]
    async fn link_is_bidirectional() {
        let service = test_service();
        let a = service.remember("a".to_string(), 5, vec![]).await.unwrap();
        let b = service.remember("b".to_string(), 5, vec![]).await.unwrap();
        service.link_memories(&a.id, &b.id).await.unwrap();

        let a_after = service.get_memory(&a.id).await.unwrap().unwrap();
        let b_after = service.get_memory(&b.id).await.unwrap().unwrap();
        assert_eq!(a_after.related_memories.unwrap(), vec![b.id.clone()]);
        assert_eq!(b_after.related_memories.unwrap(), vec![a.id.clone()]);
    }

    #[tokio::test]
    async fn link_missing_returns_not_found() {
        let service = test_service();
        let a = service.remember("a".to_string(), 5, vec![]).await.unwrap();
        assert!(service.link_memories(&a.id, "missing").await.is_err());
    }

    #[tokio::test]
    async fn unlink_reports_whether_anything_changed() {
        let service = test_service();
        let a = service.remember("a".to_string(), 5, vec![]).await.unwrap();
        let b = service.remember("b".to_string(), 5, vec![]).await.unwrap();

        assert!(!service.unlink_memories(&a.id, &b.id).await.unwrap());

        service.link_memories(&a.id, &b.id).await.unwrap();
        assert!(service.unlink_memories(&a.id, &b.id).await.unwrap());
        assert!(!service.unlink_memories(&a.id, &b.id).await.unwrap());
    }
}
