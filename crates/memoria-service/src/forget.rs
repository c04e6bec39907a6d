use memoria_core::errors::MemoriaResult;

use crate::service::MemoryService;

impl MemoryService {
    /// `forget` (spec §4.5.5). A plain delete: peer references left
    /// behind in other records' `relatedMemories`/`consolidatedFrom`/
    /// `consolidatedInto` lists are tolerated as dangling and cleaned
    /// up opportunistically by the maintainer, not here.
    pub async fn forget(&self, id: &str) -> MemoriaResult<bool> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;

    #[tokio::test]
    async fn forget_removes_the_record() {
        let service = test_service();
        let created = service.remember("x".to_string(), 5, vec![]).await.unwrap();
        assert!(service.forget(&created.id).await.unwrap());
        assert!(service.get_memory(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn forget_missing_returns_false() {
        let service = test_service();
        assert!(!service.forget("missing").await.unwrap());
    }
}
