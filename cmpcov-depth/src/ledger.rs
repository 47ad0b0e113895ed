//! Sliding window of per-position depth counters.
//!
//! Reads arrive sorted by start. Every base a read aligns adds one to the counter of its
//! sample at that position. Once a read starting at `s` has been seen, nothing later can touch
//! a position below `s`, so those entries are complete and get flushed to a [`DepthSink`].
//! The window is therefore only as wide as the reads currently in flight.

use std::collections::VecDeque;

use crate::errors::{CmpCovError, Result};
use crate::record::AlignedRead;
use crate::restrict::Restriction;

/// Depth of every sample at one 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthEntry {
    pub reference_id: usize,
    pub position: u32,
    pub depths: Vec<u32>,
}

impl DepthEntry {
    pub fn new(reference_id: usize, position: u32, n_samples: usize) -> Self {
        DepthEntry {
            reference_id,
            position,
            depths: vec![0; n_samples],
        }
    }
}

/// Receives entries as they leave the window.
pub trait DepthSink {
    fn flush(&mut self, entry: &DepthEntry);
}

impl DepthSink for Vec<DepthEntry> {
    fn flush(&mut self, entry: &DepthEntry) {
        self.push(entry.clone());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// Entries handed to the sink
    pub flushed: u64,
    /// Increments dropped because their position could not be found in a gapped window
    pub skipped: u64,
    /// Largest number of entries held at once
    pub max_window: usize,
}

/// Position-ordered queue of [`DepthEntry`] for a single reference.
///
/// Entries are addressed by `position - front.position`. Without a per-position restriction
/// the window has no gaps, so that offset always lands on the right entry.
#[derive(Debug)]
pub struct DepthLedger {
    window: VecDeque<DepthEntry>,
    n_samples: usize,
    stats: LedgerStats,
}

impl DepthLedger {
    pub fn new(n_samples: usize) -> Self {
        DepthLedger {
            window: VecDeque::new(),
            n_samples,
            stats: LedgerStats::default(),
        }
    }

    /// Flush every entry that a read starting at `start` on `reference_id` can no longer reach.
    pub fn advance<S: DepthSink + ?Sized>(&mut self, reference_id: usize, start: u32, sink: &mut S) {
        while let Some(front) = self.window.front() {
            if front.reference_id == reference_id && front.position >= start {
                break;
            }
            if let Some(entry) = self.window.pop_front() {
                sink.flush(&entry);
                self.stats.flushed += 1;
            }
        }
    }

    /// Add the aligned bases of `read` to the `sample` column.
    ///
    /// With a BED restriction, positions outside its intervals are neither counted nor created.
    /// Call [`DepthLedger::advance`] for the read first.
    pub fn accumulate(
        &mut self,
        read: &AlignedRead,
        sample: usize,
        restriction: Option<&Restriction>,
    ) -> Result<()> {
        let Some(reference_id) = read.reference_id else {
            return Ok(());
        };
        let restriction = restriction.filter(|r| r.restricts_positions());

        for position in read.aligned_positions() {
            if restriction.is_some_and(|r| !r.allows_position(reference_id, position)) {
                continue;
            }
            match self.locate(reference_id, position, restriction)? {
                Some(index) => self.window[index].depths[sample] += 1,
                None => self.stats.skipped += 1,
            }
        }

        self.stats.max_window = self.stats.max_window.max(self.window.len());
        Ok(())
    }

    /// Index of the entry for `position`, creating it and any fillers it needs.
    fn locate(
        &mut self,
        reference_id: usize,
        position: u32,
        restriction: Option<&Restriction>,
    ) -> Result<Option<usize>> {
        let (front, back) = match (self.window.front(), self.window.back()) {
            (Some(front), Some(back)) => (front.position, back.position),
            _ => {
                self.window
                    .push_back(DepthEntry::new(reference_id, position, self.n_samples));
                return Ok(Some(0));
            }
        };
        let allowed = |p: u32| restriction.is_none_or(|r| r.allows_position(reference_id, p));

        if position > back {
            for p in (back + 1..=position).filter(|&p| allowed(p)) {
                self.window
                    .push_back(DepthEntry::new(reference_id, p, self.n_samples));
            }
            return Ok(Some(self.window.len() - 1));
        }

        // a read whose first aligned base lies past its start (leading deletion)
        if position < front {
            for p in (position..front).rev().filter(|&p| allowed(p)) {
                self.window
                    .push_front(DepthEntry::new(reference_id, p, self.n_samples));
            }
            return Ok(Some(0));
        }

        let index = (position - front) as usize;
        if self.window.get(index).is_some_and(|e| e.position == position) {
            return Ok(Some(index));
        }

        match restriction {
            Some(_) => Ok(self
                .window
                .binary_search_by_key(&position, |e| e.position)
                .ok()),
            None => Err(CmpCovError::InternalInvariant {
                expected: position,
                found: self.window.get(index).map_or(0, |e| e.position),
                index,
                front,
                back,
            }),
        }
    }

    /// Flush everything left, in position order.
    pub fn drain<S: DepthSink + ?Sized>(&mut self, sink: &mut S) {
        while let Some(entry) = self.window.pop_front() {
            sink.flush(&entry);
            self.stats.flushed += 1;
        }
    }

    pub fn stats(&self) -> LedgerStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Positions currently held, front to back
    pub fn positions(&self) -> impl Iterator<Item = u32> + '_ {
        self.window.iter().map(|e| e.position)
    }
}
