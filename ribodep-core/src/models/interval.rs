use std::fmt::{self, Display};

use crate::errors::IntervalError;

/// A genomic span `(start, end)` on an implicit chromosome.
///
/// Membership is tested with open bounds ([`Interval::contains`]) by the index and
/// with closed bounds ([`Interval::contains_closed`]) by off-target classification.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Result<Self, IntervalError> {
        if end < start {
            return Err(IntervalError::InvertedInterval { start, end });
        }
        Ok(Interval { start, end })
    }

    /// A zero-width interval, used to store point sets (e.g. SNP positions).
    pub fn point(pos: u32) -> Self {
        Interval {
            start: pos,
            end: pos,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    /// `start < pos < end`
    #[inline]
    pub fn contains(&self, pos: u32) -> bool {
        self.start < pos && pos < self.end
    }

    /// `start <= pos <= end`
    #[inline]
    pub fn contains_closed(&self, pos: u32) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_inverted_interval_is_rejected() {
        assert_eq!(
            Interval::new(20, 10),
            Err(IntervalError::InvertedInterval { start: 20, end: 10 })
        );
        assert!(Interval::new(10, 10).is_ok());
    }

    #[rstest]
    #[case(100, false)]
    #[case(101, true)]
    #[case(199, true)]
    #[case(200, false)]
    fn test_open_containment(#[case] pos: u32, #[case] expected: bool) {
        let iv = Interval::new(100, 200).unwrap();
        assert_eq!(iv.contains(pos), expected);
    }

    #[rstest]
    fn test_closed_containment_includes_bounds() {
        let iv = Interval::new(100, 200).unwrap();
        assert!(iv.contains_closed(100));
        assert!(iv.contains_closed(200));
        assert!(!iv.contains_closed(201));
    }
}
