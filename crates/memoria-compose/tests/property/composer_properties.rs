use chrono::Utc;
use memoria_compose::{compose, format_digest};
use memoria_core::config::ComposerConfig;
use memoria_core::{CleanRecord, CleanSearchResult};
use memoria_tokens::TokenCounter;
use proptest::prelude::*;

fn record(id: usize, importance: i32, content: String) -> CleanRecord {
    CleanRecord {
        id: format!("id-{id}"),
        content,
        importance,
        tags: vec!["t".to_string()],
        created_at: Utc::now(),
        last_accessed: Utc::now(),
        access_count: 1,
        consolidated_from: None,
        consolidated_into: None,
        is_consolidated: None,
        related_memories: None,
    }
}

proptest! {
    /// §8 #17: whenever the composer reports `truncated`, the measured
    /// object-token count still fits the effective limit, and the
    /// rendered text does not blow past it by more than the reserved
    /// buffer (the known divergence the spec documents).
    #[test]
    fn truncated_digests_respect_the_effective_limit(
        count in 1usize..60,
        content_len in 500usize..2000,
    ) {
        let counter = TokenCounter::new();
        let config = ComposerConfig {
            token_limit: 3_000,
            token_buffer: 500,
            full_memory_token_threshold: 0.7,
        };
        let candidates: Vec<CleanSearchResult> = (0..count)
            .map(|i| CleanSearchResult {
                record: record(i, 3, "x".repeat(content_len)),
                similarity: None,
            })
            .collect();

        let digest = compose(candidates, &config, &counter);
        prop_assert!(digest.token_count <= config.effective_limit());

        let text = format_digest(&digest);
        let rendered_tokens = counter.count_text(&text);
        prop_assert!(rendered_tokens <= config.token_limit);
    }

    /// full_memories + summaries + omitted always accounts for every
    /// candidate found.
    #[test]
    fn admitted_and_omitted_always_sum_to_total_found(
        count in 1usize..40,
    ) {
        let counter = TokenCounter::new();
        let config = ComposerConfig {
            token_limit: 25_000,
            token_buffer: 2_000,
            full_memory_token_threshold: 0.7,
        };
        let candidates: Vec<CleanSearchResult> = (0..count)
            .map(|i| CleanSearchResult {
                record: record(i, (i % 10) as i32, format!("memory number {i}")),
                similarity: None,
            })
            .collect();

        let digest = compose(candidates, &config, &counter);
        prop_assert!(digest.full_memories.len() + digest.summaries.len() <= digest.total_found);
    }
}
