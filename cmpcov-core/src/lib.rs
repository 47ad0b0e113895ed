//! # Core models for cmpcov
//!
//! Small, shared building blocks used by the rest of the workspace: genomic [`Interval`]s and
//! [`Region`]s, [`RegionSet`]s read from BED files, and [`RegionString`]s such as `chr1:100-200`
//! as typed on the command line.
//!
//! [`Interval`]: models::Interval
//! [`Region`]: models::Region
//! [`RegionSet`]: models::RegionSet
//! [`RegionString`]: models::RegionString
pub mod errors;
pub mod models;
pub mod utils;
