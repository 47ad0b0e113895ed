use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::RegionSetError;

///
/// A region as typed by a user: `chrom`, `chrom:pos` or `chrom:start-end`.
/// Coordinates are 1-based and inclusive. Thousands separators (`,`) are accepted.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RegionString {
    pub chr: String,
    /// `None` means the whole chromosome
    pub range: Option<(u32, u32)>,
}

impl RegionString {
    /// Convert to a 0-based, half-open `(start, end)` pair given the chromosome length.
    pub fn to_zero_based(&self, chrom_len: u32) -> (u32, u32) {
        match self.range {
            Some((start, end)) => (start - 1, end.min(chrom_len)),
            None => (0, chrom_len),
        }
    }
}

fn parse_coordinate(value: &str, whole: &str) -> Result<u32, RegionSetError> {
    value
        .trim()
        .replace(',', "")
        .parse::<u32>()
        .map_err(|_| RegionSetError::RegionParseError(format!("bad position in {}", whole)))
}

impl FromStr for RegionString {
    type Err = RegionSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chr, rest) = match s.find(':') {
            Some(colon) => (&s[..colon], Some(&s[colon + 1..])),
            None => (s, None),
        };

        if chr.is_empty() {
            return Err(RegionSetError::RegionParseError(format!(
                "missing chromosome in {:?}",
                s
            )));
        }

        let range = match rest {
            None => None,
            Some(rest) => {
                let (start, end) = match rest.find('-') {
                    Some(hyphen) => (
                        parse_coordinate(&rest[..hyphen], s)?,
                        parse_coordinate(&rest[hyphen + 1..], s)?,
                    ),
                    None => {
                        let pos = parse_coordinate(rest, s)?;
                        (pos, pos)
                    }
                };
                if start < 1 || end < start {
                    return Err(RegionSetError::RegionParseError(format!(
                        "bad position in {}",
                        s
                    )));
                }
                Some((start, end))
            }
        };

        Ok(RegionString {
            chr: chr.to_string(),
            range,
        })
    }
}

impl Display for RegionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some((start, end)) => write!(f, "{}:{}-{}", self.chr, start, end),
            None => write!(f, "{}", self.chr),
        }
    }
}
