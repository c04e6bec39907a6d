use std::collections::BTreeMap;

use memoria_core::errors::MemoriaResult;
use memoria_core::query::{SortBy, SortOrder};
use memoria_core::Query;

use crate::service::MemoryService;

const CANDIDATE_LIMIT: usize = 50;
const MIN_GROUP_SIZE: usize = 3;

impl MemoryService {
    /// Background maintainer task 3 (spec §4.7): groups up to 50
    /// records by tag and reports (log-only; never mutates state) tags
    /// that appear on at least three records, excluding the
    /// `consolidated` tag itself.
    pub async fn scan_consolidation_candidates(&self) -> MemoriaResult<Vec<(String, usize)>> {
        let mut query = Query::new();
        query.limit = CANDIDATE_LIMIT;
        query.sort_by = SortBy::CreatedAt;
        query.sort_order = SortOrder::Descending;

        let ranked = self.repo.find(&query).await?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in &ranked {
            for tag in &record.record.tags {
                if tag == "consolidated" {
                    continue;
                }
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        Ok(counts
            .into_iter()
            .filter(|(_, count)| *count >= MIN_GROUP_SIZE)
            .collect())
    }
}
