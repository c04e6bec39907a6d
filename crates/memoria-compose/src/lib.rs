//! # memoria-compose
//!
//! The response composer (C6, spec §4.6): packs a list of candidate
//! search results into a token-budgeted digest, preferring full
//! records for high-salience candidates and snippet summaries
//! otherwise, then renders the result as a textual digest a tool
//! caller can read directly.
//!
//! Measurement happens on the *object* token count (the cheap,
//! cacheable path); the digest that is actually emitted is textual and
//! therefore slightly larger. Callers must budget `tokenBuffer`
//! generously — this crate does not loop-until-fit against the
//! rendered text, it trusts the configured buffer, the same trade-off
//! the spec documents as a known divergence.

mod digest;
mod format;

pub use digest::{compose, Digest, MemorySummary};
pub use format::format_digest;
