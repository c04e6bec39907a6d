use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::memory::MemoryRecord;
use memoria_core::traits::StoreAdapter;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::merge::apply_partial;

/// File-backed store for the single `memories` collection (spec §6,
/// `DATABASE_TYPE=json-file`). The whole collection lives as one JSON
/// array on disk; every operation takes an exclusive lock, loads the
/// full array, mutates it in memory, and writes it back via a
/// write-to-temp-then-rename so a crash mid-write never corrupts the
/// live file.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub async fn new(dir: impl AsRef<Path>) -> MemoriaResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(|e| MemoriaError::store(format!("failed to create {}: {e}", dir.display())))?;
        Ok(Self {
            path: dir.join("memories.json"),
            lock: Mutex::new(()),
        })
    }

    async fn load(&self) -> MemoriaResult<Vec<MemoryRecord>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| MemoriaError::store(format!("corrupt store file: {e}"))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read store file");
                Err(MemoriaError::store(format!("failed to read store file: {e}")))
            }
        }
    }

    async fn save(&self, records: &[MemoryRecord]) -> MemoriaResult<()> {
        let data = serde_json::to_vec_pretty(records)
            .map_err(|e| MemoriaError::store(format!("failed to serialize store: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &data)
            .await
            .map_err(|e| MemoriaError::store(format!("failed to write store file: {e}")))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| MemoriaError::store(format!("failed to commit store file: {e}")))
    }
}

#[async_trait]
impl StoreAdapter for JsonFileStore {
    async fn create(&self, doc: MemoryRecord) -> MemoriaResult<MemoryRecord> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        if records.iter().any(|r| r.id == doc.id) {
            return Err(MemoriaError::AlreadyExists { id: doc.id });
        }
        records.push(doc.clone());
        self.save(&records).await?;
        debug!(id = %doc.id, "record created in json-file store");
        Ok(doc)
    }

    async fn read(&self, id: &str) -> MemoriaResult<Option<MemoryRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_iter().find(|r| r.id == id))
    }

    async fn update(&self, id: &str, partial: Value) -> MemoriaResult<Option<MemoryRecord>> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let Some(index) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let updated = apply_partial(&records[index], partial)?;
        records[index] = updated.clone();
        self.save(&records).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> MemoriaResult<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;
        if removed {
            self.save(&records).await?;
        }
        Ok(removed)
    }

    async fn scan(&self) -> MemoriaResult<Vec<MemoryRecord>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }
}
