pub use ribodep_core::models::Interval;

/// Read-only queries over a per-chromosome interval store.
///
/// Implementors must be shareable across worker threads once built.
pub trait PointLookup: Send + Sync {
    /// True if `pos` lies strictly inside a stored interval near it.
    fn contains_point(&self, chrom: &str, pos: u32) -> bool;

    /// True if any stored interval satisfies `start <= pos <= end`.
    fn covers_closed(&self, chrom: &str, pos: u32) -> bool;

    /// Intervals whose start lies strictly inside `(window_start, window_end)`.
    fn overlapping(&self, chrom: &str, window_start: u32, window_end: u32) -> Vec<Interval>;
}
