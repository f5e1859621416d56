//! Sorted per-chromosome interval storage.
//!
//! [`ChromIntervals`] keeps one chromosome's intervals ordered by start using
//! ordered insertion, and [`IntervalIndex`] maps chromosome names to them.
//! Nothing is merged: overlapping or duplicate intervals are stored as given.
//!
//! # Examples
//!
//! ```
//! use ribodep_overlaprs::{IntervalIndex, PointLookup};
//!
//! let mut index = IntervalIndex::new();
//! index.insert("chr1", 100, 200).unwrap();
//! index.insert("chr1", 300, 400).unwrap();
//!
//! assert!(index.contains_point("chr1", 150));
//! assert!(!index.contains_point("chr1", 100));
//! assert!(!index.contains_point("chrX", 150));
//!
//! let hits = index.overlapping("chr1", 250, 350);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].start, 300);
//! ```

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use ribodep_core::errors::{AnnotationError, IntervalError};
use ribodep_core::models::{Interval, Region};
use ribodep_core::utils::{AnnotationLayout, read_annotation_file};

use crate::traits::PointLookup;

/// Intervals of a single chromosome, sorted by `start`.
///
/// Intervals sharing a start keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromIntervals {
    intervals: Vec<Interval>,
    /// Widest interval stored, bounds how far left a covering interval can start.
    max_width: u32,
}

impl ChromIntervals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, interval: Interval) {
        self.max_width = self.max_width.max(interval.end.saturating_sub(interval.start));
        let idx = self
            .intervals
            .partition_point(|iv| iv.start <= interval.start);
        self.intervals.insert(idx, interval);
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    ///
    /// Strict point containment.
    ///
    /// Only the interval just before the insertion point of `pos` and the one at
    /// it are inspected. An interval further left that also spans `pos` is not
    /// consulted.
    ///
    pub fn contains_point(&self, pos: u32) -> bool {
        let idx = self.intervals.partition_point(|iv| iv.start < pos);

        let before = idx
            .checked_sub(1)
            .and_then(|i| self.intervals.get(i))
            .is_some_and(|iv| iv.contains(pos));
        let at = self.intervals.get(idx).is_some_and(|iv| iv.contains(pos));

        before || at
    }

    ///
    /// Closed-bound membership over every interval that can reach `pos`.
    ///
    /// Only starts in `[pos - max_width, pos]` are scanned; an interval starting
    /// further left ends before `pos`.
    ///
    pub fn covers_closed(&self, pos: u32) -> bool {
        let lowest = pos.saturating_sub(self.max_width);
        let first = self.intervals.partition_point(|iv| iv.start < lowest);
        let last = self.intervals.partition_point(|iv| iv.start <= pos);
        self.intervals[first..last]
            .iter()
            .any(|iv| iv.contains_closed(pos))
    }

    ///
    /// Intervals whose start lies strictly inside the window.
    ///
    /// The candidate slice is bracketed by the first start greater than
    /// `window_start` (stepping one back) and the first start greater than
    /// `window_end`, then filtered on the start coordinate only.
    ///
    pub fn overlapping(&self, window_start: u32, window_end: u32) -> Vec<Interval> {
        let first = self
            .intervals
            .partition_point(|iv| iv.start <= window_start);
        let last = self.intervals.partition_point(|iv| iv.start <= window_end);

        self.intervals[first.saturating_sub(1)..last]
            .iter()
            .filter(|iv| window_start < iv.start && iv.start < window_end)
            .copied()
            .collect()
    }
}

///
/// Chromosome name to sorted intervals.
///
/// Built once (single-threaded) and then shared read-only, e.g. as `&IntervalIndex`
/// across scan workers.
///
#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    chroms: HashMap<String, ChromIntervals>,
}

impl IntervalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chrom: &str, start: u32, end: u32) -> Result<(), IntervalError> {
        let interval = Interval::new(start, end)?;
        self.insert_interval(chrom, interval);
        Ok(())
    }

    pub fn insert_interval(&mut self, chrom: &str, interval: Interval) {
        match self.chroms.get_mut(chrom) {
            Some(intervals) => intervals.insert(interval),
            None => {
                let mut intervals = ChromIntervals::new();
                intervals.insert(interval);
                self.chroms.insert(chrom.to_string(), intervals);
            }
        }
    }

    pub fn from_regions<I>(regions: I) -> Self
    where
        I: IntoIterator<Item = Region>,
    {
        let mut index = IntervalIndex::new();
        for region in regions {
            let interval = region.interval();
            index.insert_interval(&region.chr, interval);
        }
        index
    }

    ///
    /// Build an index from a BED-like or GTF annotation file.
    ///
    /// # Arguments
    ///
    /// - path: annotation file, optionally gzipped
    /// - layout: which columns hold the coordinates
    ///
    pub fn from_annotation_file(
        path: &Path,
        layout: AnnotationLayout,
    ) -> Result<Self, AnnotationError> {
        let regions = read_annotation_file(path, layout)?;
        let index = IntervalIndex::from_regions(regions);
        debug!(
            "Indexed {} intervals over {} chromosomes from {}",
            index.len(),
            index.chroms.len(),
            path.display()
        );
        Ok(index)
    }

    pub fn get(&self, chrom: &str) -> Option<&ChromIntervals> {
        self.chroms.get(chrom)
    }

    /// Chromosome names, sorted.
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.chroms.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Total number of stored intervals.
    pub fn len(&self) -> usize {
        self.chroms.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PointLookup for IntervalIndex {
    fn contains_point(&self, chrom: &str, pos: u32) -> bool {
        self.chroms
            .get(chrom)
            .is_some_and(|c| c.contains_point(pos))
    }

    fn covers_closed(&self, chrom: &str, pos: u32) -> bool {
        self.chroms
            .get(chrom)
            .is_some_and(|c| c.covers_closed(pos))
    }

    fn overlapping(&self, chrom: &str, window_start: u32, window_end: u32) -> Vec<Interval> {
        match self.chroms.get(chrom) {
            Some(c) => c.overlapping(window_start, window_end),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn index() -> IntervalIndex {
        let mut index = IntervalIndex::new();
        index.insert("chr1", 100, 200).unwrap();
        index.insert("chr1", 300, 400).unwrap();
        index
    }

    #[rstest]
    #[case(150, true)]
    #[case(100, false)]
    #[case(200, false)]
    #[case(250, false)]
    #[case(399, true)]
    fn test_contains_point(index: IntervalIndex, #[case] pos: u32, #[case] expected: bool) {
        assert_eq!(index.contains_point("chr1", pos), expected);
    }

    #[rstest]
    fn test_unknown_chromosome(index: IntervalIndex) {
        assert!(!index.contains_point("chrX", 150));
        assert!(!index.covers_closed("chrX", 150));
        assert!(index.overlapping("chrX", 0, 1000).is_empty());
    }

    #[rstest]
    fn test_overlapping_uses_start_only(index: IntervalIndex) {
        let hits = index.overlapping("chr1", 250, 350);
        assert_eq!(hits, vec![Interval::new(300, 400).unwrap()]);

        // starts on the window edges are excluded
        assert!(index.overlapping("chr1", 100, 300).is_empty());

        // an interval spanning the window but starting before it is not reported
        assert!(index.overlapping("chr1", 120, 180).is_empty());
    }

    #[rstest]
    fn test_ordered_insertion() {
        let mut intervals = ChromIntervals::new();
        intervals.insert(Interval::new(300, 400).unwrap());
        intervals.insert(Interval::new(100, 200).unwrap());
        intervals.insert(Interval::new(100, 150).unwrap());
        intervals.insert(Interval::new(200, 250).unwrap());

        let starts: Vec<(u32, u32)> = intervals.iter().map(|iv| (iv.start, iv.end)).collect();
        assert_eq!(starts, vec![(100, 200), (100, 150), (200, 250), (300, 400)]);
    }

    #[rstest]
    fn test_contains_point_misses_far_left_interval() {
        let mut intervals = ChromIntervals::new();
        intervals.insert(Interval::new(0, 1000).unwrap());
        intervals.insert(Interval::new(10, 20).unwrap());
        intervals.insert(Interval::new(30, 40).unwrap());

        assert!(!intervals.contains_point(500));
        assert!(intervals.covers_closed(500));
    }

    #[rstest]
    #[case(0, true)]
    #[case(5000, true)]
    #[case(5001, false)]
    #[case(9990, true)]
    #[case(9995, true)]
    #[case(9996, false)]
    fn test_covers_closed_with_mixed_widths(#[case] pos: u32, #[case] expected: bool) {
        let mut intervals = ChromIntervals::new();
        intervals.insert(Interval::new(0, 5000).unwrap());
        for start in (6000..10_000).step_by(10) {
            intervals.insert(Interval::new(start, start + 5).unwrap());
        }
        assert_eq!(intervals.covers_closed(pos), expected);
    }

    #[rstest]
    fn test_covers_closed_bounds(index: IntervalIndex) {
        assert!(index.covers_closed("chr1", 100));
        assert!(index.covers_closed("chr1", 400));
        assert!(!index.covers_closed("chr1", 401));
        assert!(!index.covers_closed("chr1", 99));
    }

    #[rstest]
    fn test_zero_width_points() {
        let mut index = IntervalIndex::new();
        index.insert("chr2", 50, 50).unwrap();
        index.insert("chr2", 70, 70).unwrap();

        assert!(!index.contains_point("chr2", 50));
        assert!(index.covers_closed("chr2", 50));
        assert_eq!(index.overlapping("chr2", 40, 60).len(), 1);
        assert_eq!(index.overlapping("chr2", 40, 80).len(), 2);
    }

    #[rstest]
    fn test_inverted_insert_is_rejected() {
        let mut index = IntervalIndex::new();
        assert!(index.insert("chr1", 10, 5).is_err());
        assert!(index.is_empty());
    }

    #[rstest]
    fn test_chromosomes_are_sorted() {
        let regions = vec![
            Region::new("chr2", 1, 2).unwrap(),
            Region::new("chr1", 1, 2).unwrap(),
            Region::new("chr1", 5, 9).unwrap(),
        ];
        let index = IntervalIndex::from_regions(regions);
        assert_eq!(index.chromosomes(), vec!["chr1", "chr2"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("chr1").map(|c| c.len()), Some(2));
    }
}
