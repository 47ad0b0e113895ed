use std::collections::HashSet;
use std::path::{Path, PathBuf};

use cmpcov_core::models::RegionString;
use cmpcov_core::utils::read_path_list;

use crate::consts::{
    DEFAULT_IMAGE_SIZE, DEFAULT_MARGIN_FRACTION, DEFAULT_MAX_DEPTH, DEFAULT_MIN_DEPTH,
    DEFAULT_MIN_MAPPING_QUALITY, PATH_LIST_EXTENSION,
};
use crate::errors::{CmpCovError, Result};

/// Settings of one comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct CmpCovConfig {
    /// BAM files, or `.list` files holding one BAM path per line
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    /// Lowest depth plotted (inclusive)
    pub min_depth: u32,
    /// Highest depth plotted (exclusive)
    pub max_depth: u32,
    /// Side of the square image in pixels
    pub image_size: u32,
    pub margin_fraction: f64,
    pub min_mapping_quality: u8,
    pub bed: Option<PathBuf>,
    pub region: Option<String>,
    pub progress: bool,
}

impl Default for CmpCovConfig {
    fn default() -> Self {
        CmpCovConfig {
            inputs: Vec::new(),
            output: None,
            min_depth: DEFAULT_MIN_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
            image_size: DEFAULT_IMAGE_SIZE,
            margin_fraction: DEFAULT_MARGIN_FRACTION,
            min_mapping_quality: DEFAULT_MIN_MAPPING_QUALITY,
            bed: None,
            region: None,
            progress: true,
        }
    }
}

fn config_error(msg: impl Into<String>) -> CmpCovError {
    CmpCovError::Configuration(msg.into())
}

impl CmpCovConfig {
    /// Reject bad settings. Nothing is opened here.
    pub fn validate(&self) -> Result<()> {
        if self.output.is_none() {
            return Err(config_error("an output image path is required"));
        }
        if self.image_size < 1 {
            return Err(config_error("image size must be at least 1 pixel"));
        }
        if self.min_depth >= self.max_depth {
            return Err(config_error(format!(
                "min depth ({}) must be lower than max depth ({})",
                self.min_depth, self.max_depth
            )));
        }
        if !(0.0..1.0).contains(&self.margin_fraction) {
            return Err(config_error(format!(
                "margin fraction must be in [0, 1), got {}",
                self.margin_fraction
            )));
        }
        if self.bed.is_some() && self.region.is_some() {
            return Err(config_error(
                "a BED file and a region cannot be used together",
            ));
        }
        if self.inputs.is_empty() {
            return Err(config_error("no input BAM given"));
        }
        self.parsed_region()?;
        Ok(())
    }

    pub fn output_path(&self) -> Result<&Path> {
        self.output
            .as_deref()
            .ok_or_else(|| config_error("an output image path is required"))
    }

    pub fn parsed_region(&self) -> Result<Option<RegionString>> {
        self.region
            .as_deref()
            .map(|region| {
                region
                    .parse::<RegionString>()
                    .map_err(|e| config_error(e.to_string()))
            })
            .transpose()
    }

    /// Inputs with every `.list` file replaced by the paths it holds, duplicates dropped.
    pub fn expand_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut expanded = Vec::new();

        for input in &self.inputs {
            let is_list = input
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(PATH_LIST_EXTENSION));
            let paths = if is_list {
                read_path_list(input)?
            } else {
                vec![input.clone()]
            };
            for path in paths {
                if seen.insert(path.clone()) {
                    expanded.push(path);
                }
            }
        }

        if expanded.is_empty() {
            return Err(config_error("no input BAM given"));
        }
        Ok(expanded)
    }
}
