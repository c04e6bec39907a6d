//! The memory record and its externally visible projections (spec §3).

mod record;

pub use record::{CleanRecord, CleanSearchResult, ConsolidationStatus, MemoryRecord};
