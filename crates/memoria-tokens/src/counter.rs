use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::canonical::canonical_string;

/// Conservative character-per-token ratio used when no exact tokenizer
/// applies (spec §4.2).
const CHARS_PER_TOKEN_ESTIMATE: f64 = 3.5;

/// Counts tokens of strings and of serialized values, caching results
/// by content hash so repeated measurements of the same candidate (the
/// composer re-measures candidates across salience passes) are cheap.
pub struct TokenCounter {
    cache: RwLock<HashMap<blake3::Hash, usize>>,
}

impl TokenCounter {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Token count of raw text (spec §4.2 `countText`).
    ///
    /// Plain ASCII text is counted exactly by a simple word/punctuation
    /// tokenizer, the one tokenization scheme this core has built in;
    /// anything containing non-ASCII bytes (multi-byte UTF-8, the
    /// common case for content a generic tokenizer would split
    /// differently than ASCII whitespace) falls back to the
    /// conservative `ceil(len / 3.5)` character estimate.
    pub fn count_text(&self, s: &str) -> usize {
        let hash = blake3::hash(s.as_bytes());
        if let Some(count) = self.cache.read().unwrap().get(&hash) {
            return *count;
        }
        let count = if s.is_ascii() {
            count_ascii_tokens(s)
        } else {
            estimate_by_length(s)
        };
        self.cache.write().unwrap().insert(hash, count);
        count
    }

    /// Token count of the canonical serialized form of a value (spec
    /// §4.2 `countObject`).
    pub fn count_object<T: Serialize>(&self, value: &T) -> usize {
        self.count_text(&canonical_string(value))
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimate token count from character length; never zero for non-empty input.
fn estimate_by_length(s: &str) -> usize {
    if s.is_empty() {
        return 0;
    }
    (s.chars().count() as f64 / CHARS_PER_TOKEN_ESTIMATE).ceil() as usize
}

/// Exact-ish tokenizer for plain ASCII: splits on whitespace runs and
/// treats each run of punctuation as its own token, mirroring how BPE
/// tokenizers typically separate punctuation from words.
fn count_ascii_tokens(s: &str) -> usize {
    let mut count = 0usize;
    let mut in_word = false;
    let mut prev_punct: Option<char> = None;

    for c in s.chars() {
        if c.is_whitespace() {
            in_word = false;
            prev_punct = None;
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            if !in_word {
                count += 1;
                in_word = true;
            }
            prev_punct = None;
        } else {
            // Each distinct punctuation character starts a new token;
            // runs of the *same* punctuation character (e.g. "...") count once.
            if prev_punct != Some(c) {
                count += 1;
            }
            in_word = false;
            prev_punct = Some(c);
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_counts_zero() {
        let counter = TokenCounter::new();
        assert_eq!(counter.count_text(""), 0);
    }

    #[test]
    fn ascii_word_count_matches_naive_split() {
        let counter = TokenCounter::new();
        assert_eq!(counter.count_text("hello world"), 2);
    }

    #[test]
    fn punctuation_is_its_own_token() {
        let counter = TokenCounter::new();
        assert_eq!(counter.count_text("hello, world!"), 4);
    }

    #[test]
    fn non_ascii_falls_back_to_estimate() {
        let counter = TokenCounter::new();
        let s = "日本語のテキスト";
        let expected = (s.chars().count() as f64 / CHARS_PER_TOKEN_ESTIMATE).ceil() as usize;
        assert_eq!(counter.count_text(s), expected);
    }

    #[test]
    fn caching_is_transparent() {
        let counter = TokenCounter::new();
        let a = counter.count_text("repeat this text");
        let b = counter.count_text("repeat this text");
        assert_eq!(a, b);
    }

    #[test]
    fn count_object_sorts_keys_deterministically() {
        let counter = TokenCounter::new();
        let a = serde_json::json!({"b": 1, "a": 2});
        let b = serde_json::json!({"a": 2, "b": 1});
        assert_eq!(counter.count_object(&a), counter.count_object(&b));
    }
}
