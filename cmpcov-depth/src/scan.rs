use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::consts::PROGRESS_INTERVAL;
use crate::dictionary::ReferenceDictionary;
use crate::errors::Result;
use crate::filter::ReadFilter;
use crate::ledger::{DepthLedger, DepthSink};
use crate::record::AlignedRead;
use crate::restrict::Restriction;

/// Counters reported at the end of a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Records pulled from the merged inputs
    pub records: u64,
    /// Records rejected by the [`ReadFilter`] or lacking a placement
    pub filtered: u64,
    /// Records whose read group does not resolve to a sample
    pub without_sample: u64,
    /// Records missing the region or BED intervals
    pub outside_restriction: u64,
    pub positions_flushed: u64,
    /// Increments dropped on a gapped window
    pub increments_skipped: u64,
    pub max_window: usize,
}

/// A spinner in the style used across the workspace, hidden when `enabled` is false.
pub fn progress_spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["-", "\\", "|", "/"]),
    );
    spinner.set_message("Scanning BAMs...");
    spinner
}

/// Drives merged records through filter, restriction and ledger into a [`DepthSink`].
pub struct Scanner<'a> {
    filter: ReadFilter,
    restriction: Option<&'a Restriction>,
    dictionary: &'a ReferenceDictionary,
    progress: ProgressBar,
}

impl<'a> Scanner<'a> {
    pub fn new(
        filter: ReadFilter,
        restriction: Option<&'a Restriction>,
        dictionary: &'a ReferenceDictionary,
        progress: ProgressBar,
    ) -> Self {
        Scanner {
            filter,
            restriction,
            dictionary,
            progress,
        }
    }

    /// Consume `records`, which must already be in genomic order, and flush every position to
    /// `sink`. The first error aborts the scan.
    pub fn run<I, S>(&self, records: I, n_samples: usize, sink: &mut S) -> Result<ScanStats>
    where
        I: IntoIterator<Item = Result<AlignedRead>>,
        S: DepthSink + ?Sized,
    {
        let mut stats = ScanStats::default();
        let mut ledger = DepthLedger::new(n_samples);

        for read in records {
            let read = read?;
            stats.records += 1;
            self.progress.inc(1);
            if stats.records % PROGRESS_INTERVAL == 0 {
                self.progress.set_message(format!(
                    "{}:{}",
                    self.dictionary.name(read.reference_id),
                    read.start.unwrap_or(0)
                ));
            }

            if self.filter.filter_out(&read) {
                stats.filtered += 1;
                continue;
            }
            let Some(sample) = read.sample else {
                stats.without_sample += 1;
                continue;
            };
            let (Some(reference_id), Some(start)) = (read.reference_id, read.start) else {
                stats.filtered += 1;
                continue;
            };
            if self.restriction.is_some_and(|r| !r.overlaps_read(&read)) {
                stats.outside_restriction += 1;
                continue;
            }

            ledger.advance(reference_id, start, sink);
            ledger.accumulate(&read, sample, self.restriction)?;
        }

        ledger.drain(sink);
        let ledger_stats = ledger.stats();
        stats.positions_flushed = ledger_stats.flushed;
        stats.increments_skipped = ledger_stats.skipped;
        stats.max_window = ledger_stats.max_window;

        self.progress
            .finish_with_message(format!("Scanned {} records", stats.records));
        info!(
            "Scanned {} records: {} filtered, {} without sample, {} outside restriction, {} positions",
            stats.records,
            stats.filtered,
            stats.without_sample,
            stats.outside_restriction,
            stats.positions_flushed
        );

        Ok(stats)
    }
}
