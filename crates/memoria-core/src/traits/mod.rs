//! Narrow capability traits for the store adapter and the two external
//! providers (spec §4.1, §4.3, §9 "Dynamic dispatch over backends").
//!
//! Every suspension point in the system (spec §5) is one of these trait
//! methods: a store call, an embed call, or a summarize call. Keeping
//! them behind `async_trait` objects rather than concrete types is what
//! lets `memoria-service` stay oblivious to whether it's talking to a
//! json-file store or an in-memory one built for tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MemoriaResult;
use crate::memory::MemoryRecord;

/// Thin contract over the external key-document store (C1). No
/// transactional or conditional-write guarantees; all concurrency
/// control lives in the service layer (spec §4.1).
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Insert a new document. Fails with `AlreadyExists`-flavored
    /// `MemoriaError::Store` when `doc.id` collides with an existing one.
    async fn create(&self, doc: MemoryRecord) -> MemoriaResult<MemoryRecord>;

    /// Read a document by id, or `None` if absent.
    async fn read(&self, id: &str) -> MemoriaResult<Option<MemoryRecord>>;

    /// Merge `partial` over the stored document and persist it. Returns
    /// `None` if no document with that id exists.
    async fn update(&self, id: &str, partial: Value) -> MemoriaResult<Option<MemoryRecord>>;

    /// Remove a document. Returns `true` iff a record was actually removed.
    async fn delete(&self, id: &str) -> MemoriaResult<bool>;

    /// A restartable scan of every document in the collection. Filtering
    /// happens in the repository, not here.
    async fn scan(&self) -> MemoriaResult<Vec<MemoryRecord>>;
}

/// Biases the embedding provider toward retrieval-query or
/// retrieval-document encoding (spec §4.3). Some providers ignore this;
/// it must always be forwarded regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTaskType {
    Query,
    Document,
}

/// Wraps the external embedding provider (C3). Implementations must
/// never propagate a provider failure to the caller: on error, log and
/// return a deterministic fallback vector so callers can proceed (spec
/// §4.3, §7 ProviderError).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str, task_type: EmbeddingTaskType) -> Vec<f32>;

    /// Dimensionality of vectors this provider produces, used by the
    /// repository to exclude mismatched embeddings from vector ranking.
    fn dimensions(&self) -> usize;
}

/// Wraps the external summarization provider used by consolidation
/// (spec §4.5.7). Implementations absorb provider failure internally;
/// the caller decides the concatenation fallback when `None` is
/// returned.
#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    async fn summarize(&self, prompt: &str) -> MemoriaResult<String>;
}
