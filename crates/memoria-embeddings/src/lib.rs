//! # memoria-embeddings
//!
//! The embedding client (C3, spec §4.3): wraps the Gemini embedding API
//! and absorbs every provider failure behind a deterministic fallback
//! vector, so callers higher up never have to special-case "embedding
//! unavailable" — they always get a vector back, just one that won't
//! yield meaningful semantic matches until the record is re-embedded.

mod fallback;
mod gemini;
mod gemini_summarizer;

pub use fallback::fallback_vector;
pub use gemini::GeminiEmbeddingClient;
pub use gemini_summarizer::GeminiSummarizer;
