use memoria_core::{MemoryRecord, Query};

/// Tags (AND), importance range, and date range — applied regardless of
/// search strategy, including pure vector (spec §4.4).
pub fn matches_non_text(record: &MemoryRecord, query: &Query) -> bool {
    if !query.tags.is_empty() {
        let has_all = query.tags.iter().all(|t| record.tags.contains(t));
        if !has_all {
            return false;
        }
    }

    if let Some(min) = query.importance_min {
        if record.importance < min {
            return false;
        }
    }
    if let Some(max) = query.importance_max {
        if record.importance > max {
            return false;
        }
    }

    if let Some(from) = query.date_from {
        if record.created_at < from {
            return false;
        }
    }
    if let Some(to) = query.date_to {
        if record.created_at > to {
            return false;
        }
    }

    true
}

/// Case-insensitive substring match against `content` OR any tag (spec §4.4).
pub fn matches_text(record: &MemoryRecord, text_query: &str) -> bool {
    let needle = text_query.to_lowercase();
    if record.content.to_lowercase().contains(&needle) {
        return true;
    }
    record.tags.iter().any(|t| t.to_lowercase().contains(&needle))
}
