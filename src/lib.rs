//! Concurrent, ordered, rank-indexable set built on a skip list.
//!
//! Values are kept unique and sorted ascending or descending. Every level link
//! carries a span (the number of level-0 steps it covers), which gives
//! `O(log n)` access by rank. Readers are lock-free under epoch-based
//! reclamation; writers lock only the predecessors of the affected position.

/// Instance configuration: sort order, maximum height, branching factor.
pub mod config;
/// Optional `tracing` subscriber setup (filters, formats).
pub mod logging;
/// The skip set, its nodes, validation, statistics and contention counters.
pub mod skipset;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Configuration types.
pub use self::config::{SkipSetConfig, SortOrder};
/// Logging setup.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Error types shared with the `skipset-error` crate.
pub use skipset_error::{ErrorExt, SkipSetError, SkipSetResult, StatusCode};
/// The set and its diagnostics.
pub use skipset::{
    ContentionMetrics, ContentionSnapshot, Iter, SkipSet, SkipSetStatistics, ValidationError,
    DEFAULT_BRANCHING, MAX_LEVEL,
};
