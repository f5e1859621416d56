//! Interval indexing for ribodep.
//!
//! The index stores intervals per chromosome in start order and answers two kinds
//! of question: does a point fall inside a nearby interval, and which intervals
//! start inside a window. It is not a general overlap structure; see
//! [`ChromIntervals`] for the exact semantics of each query.

/// Sorted per-chromosome storage and the genome-wide index.
pub mod index;

/// Core traits for lookups.
pub mod traits;

// re-exports
pub use self::index::{ChromIntervals, IntervalIndex};
pub use self::traits::{Interval, PointLookup};
