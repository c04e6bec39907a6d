use chrono::Utc;
use memoria_core::query::{SortBy, SortOrder};
use memoria_core::Query;
use serde_json::json;

use crate::service::MemoryService;

const CANDIDATE_LIMIT: usize = 20;
const MAX_UPDATES: usize = 5;
const STALE_DAYS: i64 = 30;
const AGING_DAYS: i64 = 7;
const ACTIVE_ACCESS_COUNT: u64 = 5;

/// Report of an importance-decay sweep: ids actually rewritten.
#[derive(Debug, Clone, Default)]
pub struct DecayReport {
    pub updated: Vec<String>,
    pub errors: Vec<String>,
}

impl MemoryService {
    /// Background maintainer task 2 (spec §4.7): ages importance down
    /// for records nobody has touched recently, and nudges it back up
    /// for records accessed often. Not exposed as a tool — this is
    /// maintenance-only, invoked by `memoria-maintenance`.
    pub async fn decay_importance(&self) -> DecayReport {
        let mut report = DecayReport::default();

        let mut query = Query::new();
        query.limit = CANDIDATE_LIMIT;
        query.sort_by = SortBy::LastAccessed;
        query.sort_order = SortOrder::Descending;
        let candidates = match self.repo.find(&query).await {
            Ok(ranked) => ranked,
            Err(err) => {
                report.errors.push(format!("candidate scan failed: {err}"));
                return report;
            }
        };

        let now = Utc::now();
        for candidate in candidates {
            if report.updated.len() >= MAX_UPDATES {
                break;
            }
            let record = candidate.record;
            let days_since_access = (now - record.last_accessed).num_days();

            let mut delta = 0.0;
            if days_since_access > STALE_DAYS {
                delta -= 0.5;
            } else if days_since_access > AGING_DAYS {
                delta -= 0.2;
            }
            if record.access_count > ACTIVE_ACCESS_COUNT {
                delta += 0.3;
            }
            if delta == 0.0 {
                continue;
            }

            let current = record.importance as f64;
            let shifted = (current + delta).clamp(1.0, 10.0);
            // Round toward the direction of travel, not to nearest: a
            // `-0.5` delta off an integer importance rounds-to-nearest
            // right back to itself, silently no-opping the decay.
            let new_importance = if delta < 0.0 {
                shifted.floor() as i32
            } else {
                shifted.ceil() as i32
            };
            if new_importance == record.importance {
                continue;
            }

            let partial = json!({
                "importance": new_importance,
                "version": record.version + 1,
            });
            match self.repo.update(&record.id, partial).await {
                Ok(Some(_)) => report.updated.push(record.id.clone()),
                Ok(None) => report.errors.push(format!("{}: disappeared before update", record.id)),
                Err(err) => report.errors.push(format!("{}: {err}", record.id)),
            }
        }

        report
    }
}
