use std::fmt::{self, Display};

use crate::models::Interval;

///
/// Region struct, representation of one line of a BED file.
/// Coordinates are 0-based, half-open, exactly as written in the file.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl Region {
    ///
    /// Get length of the region
    ///
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}", self.chr, self.start, self.end)
    }

    ///
    /// Does the 1-based position `pos` on `chr` fall inside this region
    ///
    pub fn contains_one_based(&self, chr: &str, pos: u32) -> bool {
        self.chr == chr && pos > self.start && pos <= self.end
    }
}

impl From<&Region> for Interval<u32> {
    fn from(value: &Region) -> Self {
        Interval {
            start: value.start,
            end: value.end,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
