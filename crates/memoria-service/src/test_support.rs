//! Shared test doubles used by this crate's unit tests: a fake embedder
//! (deterministic, dimension-stable, never fails) and a fake summarizer
//! (configurable to succeed or to exercise the concatenation fallback).

use std::sync::Arc;

use async_trait::async_trait;
use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::traits::{EmbeddingProvider, EmbeddingTaskType, SummarizationProvider};
use memoria_retrieval::Repository;
use memoria_storage::InMemoryStore;

use crate::service::MemoryService;

const TEST_DIMENSIONS: usize = 8;

pub struct FakeEmbedder;

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str, _task_type: EmbeddingTaskType) -> Vec<f32> {
        let hash = blake3::hash(text.as_bytes());
        hash.as_bytes()[..TEST_DIMENSIONS]
            .iter()
            .map(|b| *b as f32 / 255.0)
            .collect()
    }

    fn dimensions(&self) -> usize {
        TEST_DIMENSIONS
    }
}

/// Always fails, to exercise the consolidation concatenation fallback.
pub struct FailingSummarizer;

#[async_trait]
impl SummarizationProvider for FailingSummarizer {
    async fn summarize(&self, _prompt: &str) -> MemoriaResult<String> {
        Err(MemoriaError::Provider("test provider unavailable".to_string()))
    }
}

pub fn test_service() -> MemoryService {
    let store = Arc::new(InMemoryStore::new());
    let repo = Repository::new(store);
    MemoryService::new(repo, Arc::new(FakeEmbedder), Arc::new(FailingSummarizer), 0.7)
}
