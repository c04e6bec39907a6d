use memoria_core::config::ComposerConfig;
use memoria_core::{CleanRecord, CleanSearchResult};
use memoria_tokens::{snippet, TokenCounter};
use serde::Serialize;

/// A candidate admitted as a summary rather than a full record: enough
/// to identify and skim it, not enough to reconstruct it.
#[derive(Debug, Clone, Serialize)]
pub struct MemorySummary {
    pub id: String,
    pub importance: i32,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    pub snippet: String,
    pub original_token_count: usize,
}

const SNIPPET_MAX_CHARS: usize = 200;
const HIGH_VALUE_IMPORTANCE: i32 = 8;
const HIGH_VALUE_SIMILARITY: f64 = 0.85;

/// The composer's output (spec §4.6 step 5).
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub full_memories: Vec<CleanRecord>,
    pub summaries: Vec<MemorySummary>,
    pub total_found: usize,
    pub truncated: bool,
    pub token_count: usize,
}

/// A minimal envelope used only to seed the running token count with
/// the overhead of the digest's own wrapper object (spec §4.6 step 2).
#[derive(Serialize)]
struct EmptyEnvelope {
    full_memories: [(); 0],
    summaries: [(); 0],
    total_found: usize,
    truncated: bool,
    token_count: usize,
}

/// Pack `candidates` into a `Digest` that fits `config`'s effective
/// token limit (spec §4.6 steps 1-5).
pub fn compose(candidates: Vec<CleanSearchResult>, config: &ComposerConfig, counter: &TokenCounter) -> Digest {
    let total_found = candidates.len();
    let effective_limit = config.effective_limit();
    let full_memory_ceiling = (effective_limit as f64 * config.full_memory_token_threshold) as usize;

    let mut ordered = candidates;
    sort_by_salience(&mut ordered);

    let mut full_memories = Vec::new();
    let mut summaries = Vec::new();
    let mut truncated = false;
    let mut running = counter.count_object(&EmptyEnvelope {
        full_memories: [],
        summaries: [],
        total_found: 0,
        truncated: false,
        token_count: 0,
    });

    for candidate in ordered {
        let is_high_value =
            candidate.record.importance >= HIGH_VALUE_IMPORTANCE || candidate.similarity.unwrap_or(0.0) >= HIGH_VALUE_SIMILARITY;

        if is_high_value {
            let cost = counter.count_object(&candidate.record);
            if running + cost < full_memory_ceiling {
                running += cost;
                full_memories.push(candidate.record);
                continue;
            }
        }

        let summary = MemorySummary {
            id: candidate.record.id.clone(),
            importance: candidate.record.importance,
            tags: candidate.record.tags.clone(),
            similarity: candidate.similarity,
            snippet: snippet(&candidate.record.content, SNIPPET_MAX_CHARS),
            original_token_count: counter.count_text(&candidate.record.content),
        };
        let cost = counter.count_object(&summary);
        if running + cost <= effective_limit {
            running += cost;
            summaries.push(summary);
        } else {
            truncated = true;
            break;
        }
    }

    Digest {
        full_memories,
        summaries,
        total_found,
        truncated,
        token_count: running,
    }
}

fn sort_by_salience(candidates: &mut [CleanSearchResult]) {
    let any_similarity = candidates.iter().any(|c| c.similarity.is_some());
    candidates.sort_by(|a, b| {
        if any_similarity {
            let sa = a.similarity.unwrap_or(f64::NEG_INFINITY);
            let sb = b.similarity.unwrap_or(f64::NEG_INFINITY);
            sb.partial_cmp(&sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.record.importance.cmp(&a.record.importance))
        } else {
            b.record.importance.cmp(&a.record.importance)
        }
    });
}
