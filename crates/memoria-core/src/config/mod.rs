//! Configuration, loaded entirely from the environment (see spec §6).
//!
//! Each subsystem gets its own sub-struct, the way the teacher composes
//! `CortexConfig` from `DecayConfig`/`ConsolidationConfig`/etc. Parsing is
//! best-effort: an absent or unparsable variable falls back to the
//! documented default rather than failing startup, except
//! `GEMINI_API_KEY`, which is required.

mod env_helpers;

use env_helpers::{env_bool, env_f64, env_string, env_u64};

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub model: String,
    pub batch_size: usize,
    pub dimensions: usize,
}

impl EmbeddingConfig {
    fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: env_string("EMBEDDING_MODEL", "text-embedding-004"),
            batch_size: env_u64("EMBEDDING_BATCH_SIZE", 10) as usize,
            dimensions: 768,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_type: String,
    pub json_file_directory: String,
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            database_type: env_string("DATABASE_TYPE", "json-file"),
            json_file_directory: env_string("DATABASE_JSON_FILE_DIRECTORY", "./data"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackgroundConfig {
    pub max_operations: u32,
    pub max_time_ms: u64,
    pub enable_embedding_backfill: bool,
    pub enable_importance_decay: bool,
    pub orphan_cleanup_max_age_ms: i64,
}

impl BackgroundConfig {
    fn from_env() -> Self {
        Self {
            max_operations: env_u64("BG_MAX_OPERATIONS", 5) as u32,
            max_time_ms: env_u64("BG_MAX_TIME_MS", 2000),
            enable_embedding_backfill: env_bool("BG_ENABLE_EMBEDDING_BACKFILL", true),
            enable_importance_decay: env_bool("BG_ENABLE_IMPORTANCE_DECAY", true),
            orphan_cleanup_max_age_ms: crate::constants::DEFAULT_ORPHAN_MAX_AGE_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComposerConfig {
    pub token_limit: usize,
    pub token_buffer: usize,
    pub full_memory_token_threshold: f64,
}

impl ComposerConfig {
    fn from_env() -> Self {
        Self {
            token_limit: env_u64("MCP_TOKEN_LIMIT", 25_000) as usize,
            token_buffer: env_u64("MCP_TOKEN_BUFFER", 2_000) as usize,
            full_memory_token_threshold: env_f64("MCP_FULL_MEMORY_TOKEN_THRESHOLD", 0.7),
        }
    }

    pub fn effective_limit(&self) -> usize {
        self.token_limit.saturating_sub(self.token_buffer)
    }
}

#[derive(Debug, Clone)]
pub struct MemoriaConfig {
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
    pub background: BackgroundConfig,
    pub composer: ComposerConfig,
    pub similarity_threshold: f64,
}

impl MemoriaConfig {
    /// Load configuration from the process environment, applying spec
    /// defaults for anything unset or malformed.
    pub fn from_env() -> Self {
        Self {
            embedding: EmbeddingConfig::from_env(),
            storage: StorageConfig::from_env(),
            background: BackgroundConfig::from_env(),
            composer: ComposerConfig::from_env(),
            similarity_threshold: env_f64("SIMILARITY_THRESHOLD", 0.7),
        }
    }
}
