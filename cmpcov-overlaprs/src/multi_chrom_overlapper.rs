//! Genome-wide interval indexing for multi-chromosome overlap queries.
//!
//! [`MultiChromOverlapper`] keeps one single-chromosome structure ([`Bits`]) per chromosome key.
//! Regions read from a BED file are keyed by chromosome name; once a sequence dictionary is
//! known they can be re-keyed to reference indices with [`MultiChromOverlapper::try_rekey`], so
//! hot loops look chromosomes up by integer id instead of by string.
//!
//! # Examples
//!
//! ```
//! use cmpcov_overlaprs::multi_chrom_overlapper::IntoMultiChromOverlapper;
//! use cmpcov_core::models::{Region, RegionSet};
//!
//! let targets = RegionSet::from(vec![
//!     Region { chr: "chr1".to_string(), start: 1000, end: 2000 },
//!     Region { chr: "chr2".to_string(), start: 1000, end: 3000 },
//! ]);
//!
//! let index = targets.into_multi_chrom_overlapper();
//! assert!(index.overlaps(&"chr1".to_string(), 1500, 2500));
//! assert!(!index.overlaps(&"chr3".to_string(), 1500, 2500));
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use cmpcov_core::models::{Interval, RegionSet};
use num_traits::{PrimInt, Unsigned};

use crate::{Bits, Overlapper};

/// A genome-wide index for overlap queries across multiple chromosomes.
pub struct MultiChromOverlapper<K, I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    index_maps: HashMap<K, Box<dyn Overlapper<I>>>,
}

impl<K, I> MultiChromOverlapper<K, I>
where
    K: Eq + Hash,
    I: PrimInt + Unsigned + Send + Sync + 'static,
{
    /// Build from `(chromosome, interval)` pairs in any order.
    pub fn from_intervals<It>(intervals: It) -> Self
    where
        It: IntoIterator<Item = (K, Interval<I>)>,
    {
        // STEP 1: organize intervals into vectors, one for each chrom
        let mut grouped: HashMap<K, Vec<Interval<I>>> = HashMap::new();
        for (chr, interval) in intervals {
            grouped.entry(chr).or_default().push(interval);
        }

        // STEP 2: build one overlapper per chrom
        let index_maps = grouped
            .into_iter()
            .map(|(chr, chr_intervals)| {
                let lapper: Box<dyn Overlapper<I>> = Box::new(Bits::build(chr_intervals));
                (chr, lapper)
            })
            .collect();

        MultiChromOverlapper { index_maps }
    }

    /// Replace every chromosome key, failing on the first key that `f` rejects.
    pub fn try_rekey<K2, E, F>(self, mut f: F) -> Result<MultiChromOverlapper<K2, I>, E>
    where
        K2: Eq + Hash,
        F: FnMut(&K) -> Result<K2, E>,
    {
        let mut index_maps = HashMap::with_capacity(self.index_maps.len());
        for (chr, lapper) in self.index_maps {
            index_maps.insert(f(&chr)?, lapper);
        }
        Ok(MultiChromOverlapper { index_maps })
    }

    /// Iterator over the intervals on `chr` overlapping `start..end`.
    pub fn find_iter<'a>(
        &'a self,
        chr: &K,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I>> + 'a> {
        match self.index_maps.get(chr) {
            Some(lapper) => lapper.find_iter(start, end),
            None => Box::new(std::iter::empty()),
        }
    }

    /// Does anything on `chr` overlap `start..end`
    pub fn overlaps(&self, chr: &K, start: I, end: I) -> bool {
        self.find_iter(chr, start, end).next().is_some()
    }

    /// Does anything on `chr` contain the 0-based position `pos`
    pub fn contains(&self, chr: &K, pos: I) -> bool {
        self.index_maps
            .get(chr)
            .is_some_and(|lapper| lapper.contains(pos))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.index_maps.keys()
    }

    /// Number of chromosomes with at least one interval
    pub fn len(&self) -> usize {
        self.index_maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_maps.is_empty()
    }
}

/// A trait for converting region-based data into a [`MultiChromOverlapper`].
pub trait IntoMultiChromOverlapper {
    fn into_multi_chrom_overlapper(self) -> MultiChromOverlapper<String, u32>;
}

impl IntoMultiChromOverlapper for RegionSet {
    fn into_multi_chrom_overlapper(self) -> MultiChromOverlapper<String, u32> {
        MultiChromOverlapper::from_intervals(self.regions.into_iter().map(|region| {
            let interval = Interval::from(&region);
            (region.chr, interval)
        }))
    }
}
