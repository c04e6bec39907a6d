use std::sync::Arc;

use memoria_core::traits::{EmbeddingProvider, SummarizationProvider};
use memoria_retrieval::Repository;

/// Business logic layer (C5). Holds the repository and the two
/// external provider handles; every method is a suspension point at
/// every store or provider call it makes (spec §5).
pub struct MemoryService {
    pub(crate) repo: Repository,
    pub(crate) embedder: Arc<dyn EmbeddingProvider>,
    pub(crate) summarizer: Arc<dyn SummarizationProvider>,
    pub(crate) similarity_threshold: f64,
}

impl MemoryService {
    pub fn new(
        repo: Repository,
        embedder: Arc<dyn EmbeddingProvider>,
        summarizer: Arc<dyn SummarizationProvider>,
        similarity_threshold: f64,
    ) -> Self {
        Self {
            repo,
            embedder,
            summarizer,
            similarity_threshold,
        }
    }

    /// Configured default similarity cutoff (`SIMILARITY_THRESHOLD`,
    /// spec §6), used by the tool facade when a caller omits an explicit
    /// `threshold` on a similarity-based tool.
    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }
}
