//! The alignment record as seen by the scan.
//!
//! BAM records are converted into [`AlignedRead`] at the edge of the crate (see
//! [`crate::reading`]), so everything downstream of the reader works on plain data and can be
//! fed from memory in tests.

/// One CIGAR-like span of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanOp {
    pub len: u32,
    pub consumes_reference: bool,
    pub consumes_read: bool,
}

impl SpanOp {
    /// `M`, `=` or `X`
    pub fn aligned(len: u32) -> Self {
        SpanOp {
            len,
            consumes_reference: true,
            consumes_read: true,
        }
    }

    /// `D` or `N`
    pub fn deletion(len: u32) -> Self {
        SpanOp {
            len,
            consumes_reference: true,
            consumes_read: false,
        }
    }

    /// `I` or `S`
    pub fn insertion(len: u32) -> Self {
        SpanOp {
            len,
            consumes_reference: false,
            consumes_read: true,
        }
    }

    /// Only spans consuming both reference and read bases add depth.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.consumes_reference && self.consumes_read
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadFlags {
    pub unmapped: bool,
    pub secondary: bool,
    pub supplementary: bool,
    pub duplicate: bool,
    pub qc_fail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    /// Index into the sequence dictionary, `None` when unplaced
    pub reference_id: Option<usize>,
    /// 1-based alignment start
    pub start: Option<u32>,
    pub spans: Vec<SpanOp>,
    pub flags: ReadFlags,
    pub mapping_quality: u8,
    /// Column of the sample in the [`crate::samples::SampleRegistry`]
    pub sample: Option<usize>,
}

impl AlignedRead {
    /// A mapped, primary read with a good mapping quality.
    pub fn new(reference_id: usize, start: u32, spans: Vec<SpanOp>, sample: Option<usize>) -> Self {
        AlignedRead {
            reference_id: Some(reference_id),
            start: Some(start),
            spans,
            flags: ReadFlags::default(),
            mapping_quality: 60,
            sample,
        }
    }

    /// Number of reference bases covered from start to end, deletions included
    pub fn reference_span(&self) -> u32 {
        self.spans
            .iter()
            .filter(|op| op.consumes_reference)
            .map(|op| op.len)
            .sum()
    }

    /// 1-based inclusive end, `None` for unplaced reads or reads without reference bases
    pub fn alignment_end(&self) -> Option<u32> {
        let span = self.reference_span();
        match (self.start, span) {
            (Some(start), span) if span > 0 => Some(start + span - 1),
            _ => None,
        }
    }

    /// Every 1-based reference position covered by an aligned base, in increasing order.
    pub fn aligned_positions(&self) -> impl Iterator<Item = u32> + '_ {
        let start = self.start.unwrap_or(0);
        self.spans
            .iter()
            .scan(start, |ref_pos, op| {
                let op_start = *ref_pos;
                if op.consumes_reference {
                    *ref_pos += op.len;
                }
                Some((op_start, *op))
            })
            .filter(|(_, op)| op.is_aligned())
            .flat_map(|(op_start, op)| op_start..op_start + op.len)
    }
}
