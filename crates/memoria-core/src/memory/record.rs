use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_IMPORTANCE, MIN_IMPORTANCE};

/// Status of a consolidation record's multi-step write (spec §4.5.7).
///
/// `Pending` is the write-ahead marker set as soon as the consolidated
/// record exists but before its source back-references have all been
/// written; `Completed` marks a consolidation whose protocol ran to the
/// end; `Failed` marks one the cleanup sweep gave up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationStatus {
    Pending,
    Completed,
    Failed,
}

/// The only durable entity in this core (spec §3).
///
/// `version` and `access_count` are monotonically non-decreasing for a
/// given id; every mutation goes through a service method that upholds
/// that invariant, never through a direct field write from outside
/// `memoria-service`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub content: String,
    pub importance: i32,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidated_from: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidated_into: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_consolidated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_status: Option<ConsolidationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_memories: Option<Vec<String>>,
}

impl MemoryRecord {
    /// Clamp importance to `[MIN_IMPORTANCE, MAX_IMPORTANCE]`, per the
    /// invariant that importance is never rejected, only clamped.
    pub fn clamp_importance(value: i32) -> i32 {
        value.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE)
    }

    /// A record stripped of its embedding and internal bookkeeping, the
    /// shape every external-facing service method returns (spec §4.5).
    pub fn clean(&self) -> CleanRecord {
        CleanRecord {
            id: self.id.clone(),
            content: self.content.clone(),
            importance: self.importance,
            tags: self.tags.clone(),
            created_at: self.created_at,
            last_accessed: self.last_accessed,
            access_count: self.access_count,
            consolidated_from: self.consolidated_from.clone(),
            consolidated_into: self.consolidated_into.clone(),
            is_consolidated: self.is_consolidated,
            related_memories: self.related_memories.clone(),
        }
    }

    pub fn related_memories_or_empty(&self) -> &[String] {
        self.related_memories.as_deref().unwrap_or(&[])
    }

    pub fn consolidated_from_or_empty(&self) -> &[String] {
        self.consolidated_from.as_deref().unwrap_or(&[])
    }

    pub fn consolidated_into_or_empty(&self) -> &[String] {
        self.consolidated_into.as_deref().unwrap_or(&[])
    }
}

/// External projection of a `MemoryRecord`: no `embedding`, `version`, or
/// `consolidation_status` — those are internal bookkeeping (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanRecord {
    pub id: String,
    pub content: String,
    pub importance: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidated_from: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidated_into: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_consolidated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_memories: Option<Vec<String>>,
}

/// A clean record plus an optional similarity score, produced by
/// searches that rank (spec §4.4's `includeSimilarityScores`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanSearchResult {
    #[serde(flatten)]
    pub record: CleanRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}
