use std::fs;
use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::info;

use crate::errors::Result;

/// PNG for a `.png` extension (any case), JPEG for anything else.
pub fn image_format_for(path: &Path) -> ImageFormat {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("png") => ImageFormat::Png,
        _ => ImageFormat::Jpeg,
    }
}

/// Encode `image` to `path`, creating missing parent directories.
pub fn write_image(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let format = image_format_for(path);
    info!("Writing {:?} image to {}", format, path.display());
    image.save_with_format(path, format)?;
    Ok(())
}
