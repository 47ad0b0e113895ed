//! Restricting the scan to part of the genome.
//!
//! A region string only pre-filters records: reads whose aligned span misses it are dropped,
//! but every base of a kept read is counted. A BED set additionally gates every single
//! position, so depth is never recorded outside its intervals.

use cmpcov_core::models::{Interval, RegionSet, RegionString};
use cmpcov_overlaprs::MultiChromOverlapper;

use crate::dictionary::ReferenceDictionary;
use crate::errors::{CmpCovError, Result};
use crate::record::AlignedRead;

pub struct Restriction {
    /// 0-based half-open intervals keyed by reference id
    index: MultiChromOverlapper<usize, u32>,
    per_position: bool,
}

impl Restriction {
    /// A single `chrom[:start-end]` region, resolved against `dict`.
    pub fn from_region(region: &RegionString, dict: &ReferenceDictionary) -> Result<Self> {
        let reference_id = dict.index_of(&region.chr).ok_or_else(|| {
            CmpCovError::InputConsistency(format!(
                "chromosome {} is missing from the sequence dictionary",
                region.chr
            ))
        })?;
        let length = dict.get(reference_id).map_or(0, |seq| seq.length);
        let (start, end) = region.to_zero_based(length);
        if start >= end {
            return Err(CmpCovError::Configuration(format!(
                "region {} lies past the end of {} ({} bp)",
                region, region.chr, length
            )));
        }

        Ok(Restriction {
            index: MultiChromOverlapper::from_intervals([(reference_id, Interval { start, end })]),
            per_position: false,
        })
    }

    /// Every interval of a BED file. Each contig has to exist in `dict`.
    pub fn from_region_set(region_set: RegionSet, dict: &ReferenceDictionary) -> Result<Self> {
        let intervals = region_set.regions.into_iter().map(|region| {
            let interval = Interval::from(&region);
            (region.chr, interval)
        });

        let index = MultiChromOverlapper::from_intervals(intervals).try_rekey(|chr| {
            dict.index_of(chr).ok_or_else(|| {
                CmpCovError::InputConsistency(format!(
                    "BED chromosome {} is missing from the sequence dictionary",
                    chr
                ))
            })
        })?;

        Ok(Restriction {
            index,
            per_position: true,
        })
    }

    /// Does the aligned span of `read` touch any interval
    pub fn overlaps_read(&self, read: &AlignedRead) -> bool {
        match (read.reference_id, read.start, read.alignment_end()) {
            (Some(reference_id), Some(start), Some(end)) => {
                self.index.overlaps(&reference_id, start.saturating_sub(1), end)
            }
            _ => false,
        }
    }

    /// May depth be recorded at the 1-based `position`
    pub fn allows_position(&self, reference_id: usize, position: u32) -> bool {
        !self.per_position || self.index.contains(&reference_id, position.saturating_sub(1))
    }

    /// `true` for BED restrictions, where positions between intervals are left out
    pub fn restricts_positions(&self) -> bool {
        self.per_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::ReferenceSequence;
    use crate::record::SpanOp;
    use cmpcov_core::models::Region;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dict() -> ReferenceDictionary {
        ReferenceDictionary::from(vec![
            ReferenceSequence {
                name: "chr1".to_string(),
                length: 1000,
            },
            ReferenceSequence {
                name: "chr2".to_string(),
                length: 500,
            },
        ])
    }

    fn read(reference_id: usize, start: u32, len: u32) -> AlignedRead {
        AlignedRead::new(reference_id, start, vec![SpanOp::aligned(len)], Some(0))
    }

    #[rstest]
    fn test_region_prefilters_reads_only(dict: ReferenceDictionary) {
        let region: RegionString = "chr1:100-200".parse().unwrap();
        let restriction = Restriction::from_region(&region, &dict).unwrap();

        assert!(restriction.overlaps_read(&read(0, 90, 11)));
        assert!(!restriction.overlaps_read(&read(0, 89, 11)));
        assert!(restriction.overlaps_read(&read(0, 200, 5)));
        assert!(!restriction.overlaps_read(&read(0, 201, 5)));
        assert!(!restriction.overlaps_read(&read(1, 150, 5)));
        // kept reads count everywhere
        assert!(!restriction.restricts_positions());
        assert!(restriction.allows_position(0, 5));
    }

    #[rstest]
    fn test_whole_chromosome_region(dict: ReferenceDictionary) {
        let region: RegionString = "chr2".parse().unwrap();
        let restriction = Restriction::from_region(&region, &dict).unwrap();
        assert!(restriction.overlaps_read(&read(1, 1, 1)));
        assert!(restriction.overlaps_read(&read(1, 500, 1)));
        assert!(!restriction.overlaps_read(&read(0, 1, 1)));
    }

    #[rstest]
    fn test_unknown_region_chromosome(dict: ReferenceDictionary) {
        let region: RegionString = "chrX:1-10".parse().unwrap();
        let result = Restriction::from_region(&region, &dict);
        assert!(matches!(result, Err(CmpCovError::InputConsistency(_))));
    }

    #[rstest]
    fn test_region_past_chromosome_end(dict: ReferenceDictionary) {
        let region: RegionString = "chr2:600-700".parse().unwrap();
        let result = Restriction::from_region(&region, &dict);
        assert!(matches!(result, Err(CmpCovError::Configuration(_))));
    }

    #[rstest]
    fn test_bed_gates_positions(dict: ReferenceDictionary) {
        // 1-based 100..=105 and 201..=210 on chr1
        let bed = RegionSet::from(vec![
            Region {
                chr: "chr1".to_string(),
                start: 99,
                end: 105,
            },
            Region {
                chr: "chr1".to_string(),
                start: 200,
                end: 210,
            },
        ]);
        let restriction = Restriction::from_region_set(bed, &dict).unwrap();

        assert!(restriction.restricts_positions());
        assert!(!restriction.allows_position(0, 99));
        assert!(restriction.allows_position(0, 100));
        assert!(restriction.allows_position(0, 105));
        assert!(!restriction.allows_position(0, 106));
        assert!(restriction.allows_position(0, 201));
        assert!(!restriction.allows_position(1, 100));

        assert!(restriction.overlaps_read(&read(0, 104, 50)));
        assert!(!restriction.overlaps_read(&read(0, 106, 50)));
    }

    #[rstest]
    fn test_bed_chromosome_must_be_in_dictionary(dict: ReferenceDictionary) {
        let bed = RegionSet::from(vec![Region {
            chr: "chrUn".to_string(),
            start: 0,
            end: 10,
        }]);
        let result = Restriction::from_region_set(bed, &dict);
        assert!(matches!(result, Err(CmpCovError::InputConsistency(_))));
    }
}
