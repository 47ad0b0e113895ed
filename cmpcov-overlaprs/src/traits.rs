use num_traits::{PrimInt, Unsigned};

pub use cmpcov_core::models::Interval;

pub trait Overlapper<I>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
{
    fn build(intervals: Vec<Interval<I>>) -> Self
    where
        Self: Sized;

    fn find(&self, start: I, end: I) -> Vec<Interval<I>>;

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Interval<I>> + 'a>;

    /// Does any interval contain the single 0-based position `pos`
    fn contains(&self, pos: I) -> bool {
        self.find_iter(pos, pos + I::one()).next().is_some()
    }
}
