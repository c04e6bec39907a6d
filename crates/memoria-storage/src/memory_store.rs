use std::collections::HashMap;

use async_trait::async_trait;
use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::memory::MemoryRecord;
use memoria_core::traits::StoreAdapter;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::merge::apply_partial;

/// A plain in-process store, keyed by id. Used by tests and by any
/// deployment that trades durability for zero setup. Every suspension
/// point (spec §5) is represented honestly by an `.await` even though
/// nothing here actually performs I/O, so callers can't distinguish it
/// from a real backend by timing behavior alone.
#[derive(Default)]
pub struct InMemoryStore {
    docs: RwLock<HashMap<String, MemoryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StoreAdapter for InMemoryStore {
    async fn create(&self, doc: MemoryRecord) -> MemoriaResult<MemoryRecord> {
        let mut docs = self.docs.write().await;
        if docs.contains_key(&doc.id) {
            return Err(MemoriaError::AlreadyExists { id: doc.id });
        }
        docs.insert(doc.id.clone(), doc.clone());
        debug!(id = %doc.id, "record created in in-memory store");
        Ok(doc)
    }

    async fn read(&self, id: &str) -> MemoriaResult<Option<MemoryRecord>> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn update(&self, id: &str, partial: Value) -> MemoriaResult<Option<MemoryRecord>> {
        let mut docs = self.docs.write().await;
        let Some(existing) = docs.get(id) else {
            return Ok(None);
        };
        let updated = apply_partial(existing, partial)?;
        docs.insert(id.to_string(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> MemoriaResult<bool> {
        Ok(self.docs.write().await.remove(id).is_some())
    }

    async fn scan(&self) -> MemoriaResult<Vec<MemoryRecord>> {
        Ok(self.docs.read().await.values().cloned().collect())
    }
}
