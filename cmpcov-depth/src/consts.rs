pub const DEFAULT_MIN_DEPTH: u32 = 0;
pub const DEFAULT_MAX_DEPTH: u32 = 1000;
pub const DEFAULT_IMAGE_SIZE: u32 = 2000;
pub const DEFAULT_MARGIN_FRACTION: f64 = 0.05;
pub const DEFAULT_MIN_MAPPING_QUALITY: u8 = 1;

/// Labels never grow taller than this many pixels
pub const MAX_LABEL_HEIGHT: f64 = 50.0;

/// Refresh the progress spinner every this many records
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// Extension of files holding one BAM path per line
pub const PATH_LIST_EXTENSION: &str = ".list";
