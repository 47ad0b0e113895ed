use crate::consts::DEFAULT_MIN_MAPPING_QUALITY;
use crate::record::AlignedRead;

/// Decides which records may contribute depth.
///
/// Reads passing the filter but without a sample are dropped later by the scan, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFilter {
    pub min_mapping_quality: u8,
}

impl Default for ReadFilter {
    fn default() -> Self {
        ReadFilter {
            min_mapping_quality: DEFAULT_MIN_MAPPING_QUALITY,
        }
    }
}

impl ReadFilter {
    pub fn new(min_mapping_quality: u8) -> Self {
        ReadFilter {
            min_mapping_quality,
        }
    }

    /// `true` when the read must be discarded
    pub fn filter_out(&self, read: &AlignedRead) -> bool {
        let flags = &read.flags;
        flags.unmapped
            || flags.secondary
            || flags.supplementary
            || flags.duplicate
            || flags.qc_fail
            || read.mapping_quality == 0
            || read.mapping_quality < self.min_mapping_quality
    }
}
