//! Query shape for the repository (C4), spec §4.4.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    Text,
    Vector,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    CreatedAt,
    Importance,
    /// Synonym for `Importance` in text-strategy ranking (Phase-1 proxy,
    /// spec §4.4); in vector/hybrid ranking the strategy's own scoring
    /// already determines order and this acts as a no-op tie-breaker.
    Relevance,
    /// Internal-only: used by the importance-decay maintenance task
    /// (spec §4.7 task 2), which ranks candidates by `lastAccessed`
    /// rather than any sort the tool facade exposes externally.
    LastAccessed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Orthogonal query parts, assembled by callers (mainly `memoria-service`)
/// and consumed by the repository's `find`/`count`.
#[derive(Debug, Clone)]
pub struct Query {
    pub text_query: Option<String>,
    pub vector_query: Option<Vec<f32>>,
    pub tags: Vec<String>,
    pub importance_min: Option<i32>,
    pub importance_max: Option<i32>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub offset: usize,
    pub limit: usize,
    pub search_strategy: SearchStrategy,
    pub include_similarity_scores: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            text_query: None,
            vector_query: None,
            tags: Vec::new(),
            importance_min: None,
            importance_max: None,
            date_from: None,
            date_to: None,
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Descending,
            offset: 0,
            limit: 20,
            search_strategy: SearchStrategy::Text,
            include_similarity_scores: false,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }
}
