//! # memoria-storage
//!
//! Store adapter implementations over `memoria_core::StoreAdapter` (C1,
//! spec §4.1): an in-memory backend (used by tests and as a drop-in for
//! any deployment that doesn't need durability across restarts) and a
//! json-file backend (the `DATABASE_TYPE=json-file` default, spec §6).
//! Neither gives transactional or conditional-write guarantees — all
//! concurrency control lives in `memoria-service`.

mod json_file_store;
mod memory_store;
mod merge;

pub use json_file_store::JsonFileStore;
pub use memory_store::InMemoryStore;
