use std::fmt::Write as _;

use crate::digest::Digest;

/// Render a `Digest` as the textual form a tool caller reads directly
/// (spec §4.6): an opening count, a full-memories section, a
/// summaries section, and a truncation footer when applicable.
pub fn format_digest(digest: &Digest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {} memories", digest.total_found);

    if !digest.full_memories.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Full Memories (High Relevance)");
        for record in &digest.full_memories {
            let tags = record.tags.join(", ");
            let _ = writeln!(
                out,
                "- [{}] (importance: {}, tags: [{}]) {}",
                record.id, record.importance, tags, record.content
            );
        }
    }

    if !digest.summaries.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Memory Summaries");
        for summary in &digest.summaries {
            let tags = summary.tags.join(", ");
            let similarity = summary
                .similarity
                .map(|s| format!(", similarity: {:.1}%", s * 100.0))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "- [{}] importance: {}{} tags: [{}] \"{}\"",
                summary.id, summary.importance, similarity, tags, summary.snippet
            );
        }
    }

    if digest.truncated {
        let omitted = digest
            .total_found
            .saturating_sub(digest.full_memories.len() + digest.summaries.len());
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "(truncated: {omitted} further memories omitted to fit the token budget)"
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{compose, MemorySummary};
    use chrono::Utc;
    use memoria_core::config::ComposerConfig;
    use memoria_core::{CleanRecord, CleanSearchResult};
    use memoria_tokens::TokenCounter;

    fn record(id: &str, importance: i32, content: &str, tags: Vec<String>) -> CleanRecord {
        CleanRecord {
            id: id.to_string(),
            content: content.to_string(),
            importance,
            tags,
            created_at: Utc::now(),
            last_accessed: Utc::now(),
            access_count: 1,
            consolidated_from: None,
            consolidated_into: None,
            is_consolidated: None,
            related_memories: None,
        }
    }

    #[test]
    fn header_reports_total_found() {
        let counter = TokenCounter::new();
        let config = ComposerConfig {
            token_limit: 25_000,
            token_buffer: 2_000,
            full_memory_token_threshold: 0.7,
        };
        let candidates = vec![
            CleanSearchResult { record: record("a", 7, "Dogs are loyal companions", vec!["animals".to_string()]), similarity: None },
            CleanSearchResult { record: record("b", 6, "Cats are independent", vec!["animals".to_string()]), similarity: None },
        ];
        let digest = compose(candidates, &config, &counter);
        let text = format_digest(&digest);
        assert!(text.starts_with("Found 2 memories"));
        assert!(text.contains("Dogs"));
        assert!(text.contains("Cats"));
    }

    #[test]
    fn truncation_footer_appears_only_when_truncated() {
        let digest = crate::digest::Digest {
            full_memories: vec![],
            summaries: vec![MemorySummary {
                id: "a".to_string(),
                importance: 1,
                tags: vec![],
                similarity: Some(0.42),
                snippet: "hi".to_string(),
                original_token_count: 1,
            }],
            total_found: 1,
            truncated: false,
            token_count: 10,
        };
        assert!(!format_digest(&digest).contains("truncated:"));
    }

    #[test]
    fn similarity_is_rendered_as_a_percentage() {
        let digest = crate::digest::Digest {
            full_memories: vec![],
            summaries: vec![MemorySummary {
                id: "a".to_string(),
                importance: 1,
                tags: vec![],
                similarity: Some(0.4567),
                snippet: "hi".to_string(),
                original_token_count: 1,
            }],
            total_found: 1,
            truncated: false,
            token_count: 10,
        };
        assert!(format_digest(&digest).contains("45.7%"));
    }
}
