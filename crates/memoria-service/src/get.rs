use chrono::Utc;
use memoria_core::constants::MAX_OPTIMISTIC_RETRIES;
use memoria_core::errors::MemoriaResult;
use memoria_core::CleanRecord;
use rand::Rng;
use serde_json::json;
use tracing::warn;

use crate::service::MemoryService;

impl MemoryService {
    /// `getMemory` (spec §4.5.3): the optimistic access-count increment
    /// protocol. The store offers no conditional write, so this is a
    /// bounded read-compare-write loop: read, re-read to check the
    /// version hasn't moved, then write. On persistent contention it
    /// gives up after 3 attempts and returns the last-observed record
    /// without bumping the counter — callers must still see a valid
    /// record, never an error.
    pub async fn get_memory(&self, id: &str) -> MemoriaResult<Option<CleanRecord>> {
        let mut last_seen = None;

        for attempt in 0..MAX_OPTIMISTIC_RETRIES {
            let Some(observed) = self.repo.get(id).await? else {
                return Ok(None);
            };
            last_seen = Some(observed.clone());

            let Some(recheck) = self.repo.get(id).await? else {
                return Ok(None);
            };

            if recheck.version != observed.version {
                warn!(id, attempt, "version moved between read and write, retrying");
                backoff().await;
                continue;
            }

            let partial = json!({
                "last_accessed": Utc::now(),
                "access_count": observed.access_count + 1,
                "version": observed.version + 1,
            });

            match self.repo.update(id, partial).await? {
                Some(updated) => return Ok(Some(updated.clean())),
                None => return Ok(None),
            }
        }

        warn!(
            id,
            attempts = MAX_OPTIMISTIC_RETRIES,
            "access-count update gave up after max retries; returning last observed record unbumped"
        );
        Ok(last_seen.map(|r| r.clean()))
    }
}

async fn backoff() {
    let jitter_ms = rand::thread_rng().gen_range(5..=25);
    tokio::time::sleep(std::time::Duration::from_millis(jitter_ms)).await;
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_service;

    #[tokio::test]
    async fn get_memory_bumps_access_count() {
        let service = test_service();
        let created = service.remember("x".to_string(), 5, vec![]).await.unwrap();
        assert_eq!(created.access_count, 1);
        let fetched = service.get_memory(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.access_count, 2);
        let fetched_again = service.get_memory(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched_again.access_count, 3);
    }

    #[tokio::test]
    async fn get_memory_missing_returns_none() {
        let service = test_service();
        assert!(service.get_memory("missing").await.unwrap().is_none());
    }
}
