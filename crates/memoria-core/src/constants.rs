//! System-wide constants.

/// Memoria system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hard upper bound on memory content length, enforced at the tool boundary.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Inclusive bounds on `importance`.
pub const MIN_IMPORTANCE: i32 = 0;
pub const MAX_IMPORTANCE: i32 = 10;

/// Maximum attempts for the optimistic access-count increment loop.
pub const MAX_OPTIMISTIC_RETRIES: u32 = 3;

/// Reciprocal Rank Fusion smoothing constant.
pub const RRF_K: f64 = 60.0;

/// Page size used by paginating background sweeps (auto-link, embedding backfill).
pub const MAINTENANCE_PAGE_SIZE: usize = 50;

/// Default age after which a `pending` consolidation is considered orphaned.
pub const DEFAULT_ORPHAN_MAX_AGE_MS: i64 = 60 * 60 * 1000;

/// The single collection name the store adapter operates on.
pub const MEMORIES_COLLECTION: &str = "memories";
