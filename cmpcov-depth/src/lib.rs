//! # cmpcov-depth
//!
//! Compare per-base sequencing depth between samples. For every pair of samples and every
//! covered position, the depth of one sample is plotted against the depth of the other; the
//! result is an N x N grid of scatter plots rendered to a PNG or JPEG image.
//!
//! The pipeline:
//!
//! 1. coordinate-sorted BAM inputs are merged into one stream ([`merge::SortedMerger`]),
//! 2. unusable reads are dropped ([`filter::ReadFilter`]), optionally restricted to a region or
//!    BED file ([`restrict::Restriction`]),
//! 3. a sliding window sums the depth of each sample per position ([`ledger::DepthLedger`]),
//! 4. completed positions are painted into a bit matrix ([`matrix::BitSampleMatrix`]),
//! 5. the matrix is drawn ([`render::Renderer`]) and written out ([`writing::write_image`]).
//!
//! ```no_run
//! use std::path::PathBuf;
//! use cmpcov_depth::{CmpCovConfig, plot};
//!
//! let config = CmpCovConfig {
//!     inputs: vec![PathBuf::from("tumor.bam"), PathBuf::from("normal.bam")],
//!     output: Some(PathBuf::from("depth.png")),
//!     max_depth: 200,
//!     ..Default::default()
//! };
//! let comparison = plot(&config).unwrap();
//! println!("{} samples, {} positions", comparison.samples.len(), comparison.stats.positions_flushed);
//! ```
pub mod config;
pub mod consts;
pub mod dictionary;
pub mod errors;
pub mod filter;
pub mod font;
pub mod ledger;
pub mod matrix;
pub mod merge;
pub mod reading;
pub mod record;
pub mod render;
pub mod restrict;
pub mod samples;
pub mod scan;
pub mod writing;

use cmpcov_core::models::RegionSet;
use image::RgbImage;
use log::info;

pub use config::CmpCovConfig;
pub use errors::{CmpCovError, Result};
pub use scan::ScanStats;

use filter::ReadFilter;
use matrix::{BitSampleMatrix, compute_bit_size};
use merge::{MergeSource, SortedMerger};
use reading::{OpenedInputs, open_inputs};
use render::{Layout, Renderer};
use restrict::Restriction;
use scan::{Scanner, progress_spinner};

/// Outcome of [`compare_coverage`].
pub struct CoverageComparison {
    pub image: RgbImage,
    /// Sample names in column order
    pub samples: Vec<String>,
    pub bit_size: usize,
    pub stats: ScanStats,
}

/// Scan the inputs of `config` and render the depth comparison, without writing it.
pub fn compare_coverage(config: &CmpCovConfig) -> Result<CoverageComparison> {
    config.validate()?;
    let region = config.parsed_region()?;
    let bed = config
        .bed
        .as_deref()
        .map(RegionSet::try_from)
        .transpose()?;
    let paths = config.expand_inputs()?;

    let OpenedInputs {
        inputs,
        dictionary,
        registry,
    } = open_inputs(&paths)?;
    info!(
        "{} BAM file(s), {} sample(s): {}",
        inputs.len(),
        registry.len(),
        registry.names().join(", ")
    );

    let restriction = match (region, bed) {
        (Some(region), _) => Some(Restriction::from_region(&region, &dictionary)?),
        (None, Some(bed)) => {
            info!("Restricting to {} BED interval(s)", bed.len());
            Some(Restriction::from_region_set(bed, &dictionary)?)
        }
        (None, None) => None,
    };

    let n_samples = registry.len();
    let layout = Layout::new(config.image_size, config.margin_fraction, n_samples);
    let bit_size = compute_bit_size(config.min_depth, config.max_depth, layout.sample_width);
    let mut matrix = BitSampleMatrix::new(n_samples, bit_size, config.min_depth, config.max_depth);
    info!(
        "Bit size {}: allocating {} bytes for a {}x{} bit matrix",
        bit_size,
        matrix.byte_size(),
        matrix.width(),
        matrix.width()
    );

    let sources = inputs
        .into_iter()
        .map(|input| {
            let name = input.path.display().to_string();
            MergeSource::new(name, input.into_source(&registry))
        })
        .collect();
    let merger = SortedMerger::new(sources)?;

    let scanner = Scanner::new(
        ReadFilter::new(config.min_mapping_quality),
        restriction.as_ref(),
        &dictionary,
        progress_spinner(config.progress),
    );
    let stats = scanner.run(merger, n_samples, &mut matrix)?;
    if stats.increments_skipped > 0 {
        info!(
            "{} depth increment(s) fell in BED gaps and were skipped",
            stats.increments_skipped
        );
    }

    info!("Creating image {}x{}", config.image_size, config.image_size);
    let image = Renderer::new(layout).render(&matrix, registry.names());

    Ok(CoverageComparison {
        image,
        samples: registry.names().to_vec(),
        bit_size,
        stats,
    })
}

/// [`compare_coverage`], then write the image to the configured output.
pub fn plot(config: &CmpCovConfig) -> Result<CoverageComparison> {
    let comparison = compare_coverage(config)?;
    writing::write_image(&comparison.image, config.output_path()?)?;
    Ok(comparison)
}
