//! # memoria-core
//!
//! Foundation crate for the Memoria memory engine.
//! Defines the memory record, the query/search types, the error
//! taxonomy, configuration, constants, and the narrow capability
//! traits (store adapter, embedding provider, summarization provider)
//! that every other crate in the workspace builds on.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod query;
pub mod traits;

pub use config::MemoriaConfig;
pub use errors::{MemoriaError, MemoriaResult};
pub use memory::{CleanRecord, CleanSearchResult, MemoryRecord};
pub use query::{Query, SearchStrategy, SortBy, SortOrder};
pub use traits::{EmbeddingProvider, EmbeddingTaskType, StoreAdapter, SummarizationProvider};
