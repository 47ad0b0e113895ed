//! K-way merge of coordinate-sorted record sources.
//!
//! Each source contributes at most one pending record to a min-heap keyed on
//! [`SortKey`]; popping the smallest record pulls the next one from the same source.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::errors::{CmpCovError, Result};
use crate::record::AlignedRead;

/// Genomic sort order. Unplaced records sort after every placed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub reference_id: Option<usize>,
    pub start: u32,
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.reference_id, other.reference_id) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.start.cmp(&other.start)),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&AlignedRead> for SortKey {
    fn from(read: &AlignedRead) -> Self {
        SortKey {
            reference_id: read.reference_id,
            start: read.start.unwrap_or(0),
        }
    }
}

/// A record waiting in the heap, ordered smallest first.
#[derive(Debug)]
struct Pending {
    key: SortKey,
    source: usize,
    read: AlignedRead,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed so the max-heap pops the smallest key; ties go to the earlier source
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.source.cmp(&self.source))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.source == other.source
    }
}

impl Eq for Pending {}

/// One named input of the merge.
pub struct MergeSource<S> {
    pub name: String,
    pub records: S,
    last: Option<SortKey>,
}

impl<S> MergeSource<S> {
    pub fn new(name: impl Into<String>, records: S) -> Self {
        MergeSource {
            name: name.into(),
            records,
            last: None,
        }
    }
}

/// Merges sources of `Result<AlignedRead>` into one stream in [`SortKey`] order.
///
/// A source that goes backwards yields an [`CmpCovError::InputConsistency`] error, after
/// which the merger is exhausted.
pub struct SortedMerger<S> {
    sources: Vec<MergeSource<S>>,
    heap: BinaryHeap<Pending>,
    deferred: Option<CmpCovError>,
    failed: bool,
}

impl<S> SortedMerger<S>
where
    S: Iterator<Item = Result<AlignedRead>>,
{
    pub fn new(sources: Vec<MergeSource<S>>) -> Result<Self> {
        let mut merger = SortedMerger {
            heap: BinaryHeap::with_capacity(sources.len()),
            sources,
            deferred: None,
            failed: false,
        };
        for source in 0..merger.sources.len() {
            merger.refill(source)?;
        }
        Ok(merger)
    }

    /// Pull the next record of `source` into the heap, checking its order.
    fn refill(&mut self, source: usize) -> Result<()> {
        let input = &mut self.sources[source];
        let Some(read) = input.records.next().transpose()? else {
            return Ok(());
        };

        let key = SortKey::from(&read);
        if let Some(last) = input.last {
            if key < last {
                return Err(CmpCovError::InputConsistency(format!(
                    "{} is not coordinate-sorted: {:?}:{} comes after {:?}:{}",
                    input.name, key.reference_id, key.start, last.reference_id, last.start
                )));
            }
        }
        input.last = Some(key);
        self.heap.push(Pending { key, source, read });
        Ok(())
    }
}

impl<S> Iterator for SortedMerger<S>
where
    S: Iterator<Item = Result<AlignedRead>>,
{
    type Item = Result<AlignedRead>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(e) = self.deferred.take() {
            self.failed = true;
            return Some(Err(e));
        }
        let Pending { source, read, .. } = self.heap.pop()?;
        // the popped record is still good, report the failure on the next call
        if let Err(e) = self.refill(source) {
            self.deferred = Some(e);
        }
        Some(Ok(read))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::record::SpanOp;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    type Source = std::vec::IntoIter<Result<AlignedRead>>;

    fn source(name: &str, keys: &[(Option<usize>, u32)]) -> MergeSource<Source> {
        let reads: Vec<Result<AlignedRead>> = keys
            .iter()
            .map(|&(reference_id, start)| {
                let mut read = AlignedRead::new(0, start, vec![SpanOp::aligned(1)], Some(0));
                read.reference_id = reference_id;
                Ok(read)
            })
            .collect();
        MergeSource::new(name, reads.into_iter())
    }

    fn keys(merger: SortedMerger<Source>) -> Vec<(Option<usize>, u32)> {
        merger
            .map(|r| r.map(|read| (read.reference_id, read.start.unwrap_or(0))))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[rstest]
    fn test_merge_order_across_references() {
        let merger = SortedMerger::new(vec![
            source("a", &[(Some(0), 5), (Some(1), 1)]),
            source("b", &[(Some(0), 3)]),
        ])
        .unwrap();

        assert_eq!(
            keys(merger),
            vec![(Some(0), 3), (Some(0), 5), (Some(1), 1)]
        );
    }

    #[rstest]
    fn test_unplaced_records_come_last() {
        let merger = SortedMerger::new(vec![
            source("a", &[(Some(2), 50), (None, 0)]),
            source("b", &[(Some(0), 7), (Some(3), 1)]),
        ])
        .unwrap();

        assert_eq!(
            keys(merger),
            vec![(Some(0), 7), (Some(2), 50), (Some(3), 1), (None, 0)]
        );
    }

    #[rstest]
    fn test_ties_are_stable_by_source() {
        let tagged = |name: &str, sample: usize| {
            let read = AlignedRead::new(0, 10, vec![SpanOp::aligned(1)], Some(sample));
            MergeSource::new(name, vec![Ok::<_, CmpCovError>(read)].into_iter())
        };

        let samples: Vec<_> = SortedMerger::new(vec![tagged("b", 1), tagged("a", 0)])
            .unwrap()
            .map(|r| r.unwrap().sample)
            .collect();
        assert_eq!(samples, vec![Some(1), Some(0)]);
    }

    #[rstest]
    fn test_unsorted_source_is_rejected() {
        let merger =
            SortedMerger::new(vec![source("broken.bam", &[(Some(1), 5), (Some(0), 9)])]).unwrap();

        let results: Vec<_> = merger.collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(CmpCovError::InputConsistency(msg)) => assert!(msg.contains("broken.bam")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[rstest]
    fn test_empty_sources() {
        let merger = SortedMerger::new(vec![source("a", &[]), source("b", &[])]).unwrap();
        assert_eq!(keys(merger), vec![]);
    }
}
