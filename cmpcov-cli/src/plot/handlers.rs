use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cmpcov_depth::{CmpCovConfig, plot};

/// Turn parsed arguments into a [`CmpCovConfig`].
pub fn config_from_matches(matches: &ArgMatches) -> Result<CmpCovConfig> {
    let inputs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("inputs")
        .context("At least one input BAM is required.")?
        .cloned()
        .collect();

    let defaults = CmpCovConfig::default();
    Ok(CmpCovConfig {
        inputs,
        output: matches.get_one::<PathBuf>("output").cloned(),
        min_depth: matches
            .get_one::<u32>("min-depth")
            .copied()
            .unwrap_or(defaults.min_depth),
        max_depth: matches
            .get_one::<u32>("max-depth")
            .copied()
            .unwrap_or(defaults.max_depth),
        image_size: matches
            .get_one::<u32>("width")
            .copied()
            .unwrap_or(defaults.image_size),
        min_mapping_quality: matches
            .get_one::<u8>("min-mapq")
            .copied()
            .unwrap_or(defaults.min_mapping_quality),
        bed: matches.get_one::<PathBuf>("bed").cloned(),
        region: matches.get_one::<String>("region").cloned(),
        progress: !matches.get_flag("no-progress"),
        ..defaults
    })
}

pub fn run_plot(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;
    let comparison = plot(&config).context("Depth comparison failed")?;

    info!(
        "Compared {} samples over {} positions (largest window {})",
        comparison.samples.len(),
        comparison.stats.positions_flushed,
        comparison.stats.max_window
    );

    Ok(())
}
