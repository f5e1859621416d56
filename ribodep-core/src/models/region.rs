use std::fmt::{self, Display};

use crate::errors::IntervalError;
use crate::models::Interval;

///
/// Region struct, one annotation record or genomic window: `(chr, start, end)`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

/// A window produced by tiling or sampling. Bins carry no identity beyond
/// their coordinates, so they share the [`Region`] representation.
pub type Bin = Region;

impl Region {
    pub fn new(chr: impl Into<String>, start: u32, end: u32) -> Result<Self, IntervalError> {
        if end < start {
            return Err(IntervalError::InvertedInterval { start, end });
        }
        Ok(Region {
            chr: chr.into(),
            start,
            end,
        })
    }

    ///
    /// Get length of the region
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    ///
    /// Get the tab separated representation of the region
    ///
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}", self.chr, self.start, self.end)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
