use num_traits::{PrimInt, Unsigned, identities::zero};
use std::cmp::Ordering;

/// Represent a range from [start, end)
/// Inclusive start, exclusive of end
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Interval<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    pub start: I,
    pub end: I,
}

impl<I> Ord for Interval<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    #[inline]
    fn cmp(&self, other: &Interval<I>) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl<I> PartialOrd for Interval<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I> Interval<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    /// Number of positions covered
    #[inline]
    pub fn len(&self) -> I {
        self.end.checked_sub(&self.start).unwrap_or_else(zero::<I>)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if this interval overlaps the half-open range `start..end`
    #[inline]
    pub fn overlap(&self, start: I, end: I) -> bool {
        self.start < end && self.end > start
    }

    /// Check if a single (0-based) position falls inside this interval
    #[inline]
    pub fn contains(&self, pos: I) -> bool {
        self.start <= pos && pos < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, true)]
    #[case(9, 11, true)]
    #[case(10, 12, false)]
    #[case(0, 1, false)]
    fn test_overlap(#[case] start: u32, #[case] end: u32, #[case] expected: bool) {
        let iv = Interval { start: 1u32, end: 10 };
        assert_eq!(iv.overlap(start, end), expected);
    }

    #[rstest]
    fn test_contains_is_half_open() {
        let iv = Interval { start: 5u32, end: 8 };
        assert!(!iv.contains(4));
        assert!(iv.contains(5));
        assert!(iv.contains(7));
        assert!(!iv.contains(8));
        assert_eq!(iv.len(), 3);
    }

    #[rstest]
    fn test_ordering_by_start_then_end() {
        let mut ivs = vec![
            Interval { start: 5u32, end: 9 },
            Interval { start: 1, end: 4 },
            Interval { start: 5, end: 6 },
        ];
        ivs.sort();
        assert_eq!(
            ivs,
            vec![
                Interval { start: 1, end: 4 },
                Interval { start: 5, end: 6 },
                Interval { start: 5, end: 9 },
            ]
        );
    }
}
