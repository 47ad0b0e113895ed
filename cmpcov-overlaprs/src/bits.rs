use num_traits::{
    PrimInt, Unsigned,
    identities::{one, zero},
};

use super::Overlapper;
use cmpcov_core::models::Interval;

/// A Binary Interval Search data structure for fast genomic interval overlap queries.
///
/// From the journal article: <https://academic.oup.com/bioinformatics/article/29/1/1/273289>
///
/// Intervals are kept sorted by start, alongside sorted copies of every start and end.
/// The length of the longest interval bounds how far back a query has to look, so a single
/// binary search finds the first candidate and a short forward scan collects the hits.
///
/// # Examples
///
/// ```
/// use cmpcov_overlaprs::{Bits, Overlapper, Interval};
///
/// let targets = vec![
///     Interval { start: 100u32, end: 150 },
///     Interval { start: 200, end: 250 },
///     Interval { start: 225, end: 275 },
/// ];
///
/// let bits = Bits::build(targets);
///
/// assert_eq!(bits.find(210, 240).len(), 2);
/// assert_eq!(bits.count(210, 240), 2);
/// assert!(bits.contains(149));
/// assert!(!bits.contains(150));
/// ```
#[derive(Debug, Clone)]
pub struct Bits<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    /// List of intervals, sorted
    pub intervals: Vec<Interval<I>>,
    /// Sorted list of start positions,
    starts: Vec<I>,
    /// Sorted list of end positions,
    ends: Vec<I>,
    /// The length of the longest interval
    max_len: I,
}

impl<I> Overlapper<I> for Bits<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    fn build(mut intervals: Vec<Interval<I>>) -> Self
    where
        Self: Sized,
    {
        intervals.sort();
        let (mut starts, mut ends): (Vec<_>, Vec<_>) =
            intervals.iter().map(|x| (x.start, x.end)).unzip();
        starts.sort();
        ends.sort();
        let max_len = intervals
            .iter()
            .map(|iv| iv.len())
            .max()
            .unwrap_or_else(zero::<I>);

        Bits {
            intervals,
            starts,
            ends,
            max_len,
        }
    }

    #[inline]
    fn find(&self, start: I, stop: I) -> Vec<Interval<I>> {
        self.iter_find(start, stop).copied().collect()
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        stop: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I>> + 'a> {
        Box::new(self.iter_find(start, stop))
    }
}

impl<I> Bits<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    fn iter_find(&self, start: I, stop: I) -> IterFind<'_, I> {
        IterFind {
            inner: self,
            off: Self::lower_bound(
                start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>),
                &self.intervals,
            ),
            start,
            stop,
        }
    }

    /// Get the number over intervals in Bits
    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Interval<I>> {
        self.intervals.iter()
    }

    /// First index whose interval start is not below `start`.
    /// Assumes that the maximum interval length has been subtracted from `start`
    #[inline]
    pub fn lower_bound(start: I, intervals: &[Interval<I>]) -> usize {
        let mut size = intervals.len();
        let mut low = 0;

        while size > 0 {
            let half = size / 2;
            let other_half = size - half;
            let probe = low + half;
            let other_low = low + other_half;
            let v = &intervals[probe];
            size = half;
            low = if v.start < start { other_low } else { low }
        }
        low
    }

    /// Insertion index of `key` in the sorted slice `elems`
    #[inline]
    pub fn bsearch_seq(key: I, elems: &[I]) -> usize {
        if elems.is_empty() || elems[0] >= key {
            return 0;
        } else if elems[elems.len() - 1] < key {
            return elems.len();
        }

        let mut cursor = 0;
        let mut length = elems.len();
        while length > 1 {
            let half = length >> 1;
            length -= half;
            cursor += (usize::from(elems[cursor + half - 1] < key)) * half;
        }
        cursor
    }

    /// Count all intervals that overlap start .. stop with two binary searches, without
    /// visiting the intervals themselves.
    #[inline]
    pub fn count(&self, start: I, stop: I) -> usize {
        let len = self.intervals.len();
        // Plus one to account for half-openness of intervals compared to BITS paper
        let first = Self::bsearch_seq(start + one::<I>(), &self.ends);
        let last = Self::bsearch_seq(stop, &self.starts);
        let num_cant_after = len - last;
        len.saturating_sub(first + num_cant_after)
    }
}

/// Iterator over the intervals of a [`Bits`] that overlap a query range.
#[derive(Debug)]
pub struct IterFind<'a, I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a Bits<I>,
    off: usize,
    start: I,
    stop: I,
}

impl<'a, I> Iterator for IterFind<'a, I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Interval<I>;

    #[inline]
    // interval.start < stop && interval.end > start
    fn next(&mut self) -> Option<Self::Item> {
        while self.off < self.inner.intervals.len() {
            let interval = &self.inner.intervals[self.off];
            self.off += 1;
            if interval.overlap(self.start, self.stop) {
                return Some(interval);
            } else if interval.start >= self.stop {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn intervals() -> Vec<Interval<u32>> {
        vec![
            Interval { start: 1, end: 5 },
            Interval { start: 3, end: 7 },
            Interval { start: 6, end: 10 },
            Interval { start: 8, end: 12 },
            Interval { start: 100, end: 1000 },
        ]
    }

    #[rstest]
    fn test_build_and_len(intervals: Vec<Interval<u32>>) {
        let bits = Bits::build(intervals.clone());
        assert_eq!(bits.len(), intervals.len());
        assert!(!bits.is_empty());
    }

    #[rstest]
    fn test_find_overlapping_intervals(intervals: Vec<Interval<u32>>) {
        let bits = Bits::build(intervals);

        let results = bits.find(2, 4);
        assert_eq!(
            results,
            vec![Interval { start: 1, end: 5 }, Interval { start: 3, end: 7 }]
        );

        let results = bits.find(9, 11);
        assert_eq!(
            results,
            vec![Interval { start: 6, end: 10 }, Interval { start: 8, end: 12 }]
        );
    }

    #[rstest]
    fn test_long_interval_found_behind_short_ones(intervals: Vec<Interval<u32>>) {
        let bits = Bits::build(intervals);
        // the long interval starts far before the query
        assert_eq!(bits.find(500, 501), vec![Interval { start: 100, end: 1000 }]);
        assert!(bits.contains(999));
        assert!(!bits.contains(1000));
    }

    #[rstest]
    fn test_count_matches_find(intervals: Vec<Interval<u32>>) {
        let bits = Bits::build(intervals);
        for (start, stop) in [(0, 2), (2, 4), (4, 9), (12, 99), (0, 2000)] {
            assert_eq!(bits.count(start, stop), bits.find(start, stop).len());
        }
    }

    #[rstest]
    fn test_empty_bits() {
        let bits: Bits<u32> = Bits::build(vec![]);

        assert_eq!(bits.len(), 0);
        assert!(bits.is_empty());
        assert!(bits.find(1, 2).is_empty());
        assert!(!bits.contains(1));
    }
}
