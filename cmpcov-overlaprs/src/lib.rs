//! Interval overlap queries for restricting a coverage scan to a set of genomic regions.
//!
//! The scan asks one question very often: "is this base inside any target region?". This crate
//! answers it with a binary interval search ([`Bits`]) per chromosome, wrapped in a genome-wide
//! [`MultiChromOverlapper`](multi_chrom_overlapper::MultiChromOverlapper).
//!
//! ## Quick Start
//!
//! ```rust
//! use cmpcov_overlaprs::{Bits, Overlapper, Interval};
//!
//! let targets = vec![
//!     Interval { start: 100u32, end: 200 },
//!     Interval { start: 150, end: 300 },
//!     Interval { start: 400, end: 500 },
//! ];
//!
//! let bits = Bits::build(targets);
//!
//! assert_eq!(bits.find(180, 250).len(), 2);
//! assert!(bits.contains(450));
//! assert!(!bits.contains(350));
//! ```

/// Binary Interval Search implementation.
///
/// See [`Bits`] for details.
pub mod bits;

/// Genome-wide interval indexing.
pub mod multi_chrom_overlapper;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

// re-exports
pub use self::bits::Bits;
pub use self::multi_chrom_overlapper::{IntoMultiChromOverlapper, MultiChromOverlapper};
pub use self::traits::{Interval, Overlapper};
