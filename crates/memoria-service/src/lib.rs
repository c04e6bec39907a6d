//! # memoria-service
//!
//! The memory service (C5, spec §4.5): the business logic layer sitting
//! between the tool facade and the repository. Owns the access-count
//! optimistic-lock protocol, the consolidation saga, bidirectional
//! linking, similarity search, auto-linking, and embedding backfill.
//! Every public method returns *clean* records — no embedding, no
//! version, no consolidation status — except where the spec calls for
//! an internal (dirty) record, namely `consolidate_memories`'s return
//! value, which the tool facade formats directly.

mod consolidate;
mod decay;
mod forget;
mod get;
mod link;
mod list;
mod maintenance_ops;
mod recall;
mod related;
mod remember;
mod scan;
mod service;
mod similar;
mod types;
mod update;

pub use decay::DecayReport;
pub use service::MemoryService;
pub use types::{AutoLinkReport, BackfillReport, RelatedMemories, SearchType};

#[cfg(test)]
mod test_support;
