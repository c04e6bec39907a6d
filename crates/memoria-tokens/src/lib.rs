//! # memoria-tokens
//!
//! The token meter (spec §4.2 / C2). Counts tokens of raw text and of
//! serialized values, and cuts bounded snippets at sentence or word
//! boundaries. Caches counts per blake3 content hash, the same caching
//! shape the teacher's token counter uses, but estimates rather than
//! tokenizing exactly — this core has no bundled tokenizer, so every
//! count is the conservative `ceil(len / 3.5)` estimate described in
//! the spec.

mod canonical;
mod counter;
mod snippet;

pub use counter::TokenCounter;
pub use snippet::snippet;
