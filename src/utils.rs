use image::{ImageDecoder, ImageReader};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::ImageSize;

/// Turn a table path such as `img/Sleek_Draped_Blouse/img_00000062.jpg` into
/// the image id `Sleek_Draped_Blouse_img_00000062.jpg`.
///
/// The leading directory is dropped and the remaining components are joined
/// with `_`. Returns `None` when nothing is left after the leading directory.
pub fn image_id_from_table_path(path: &str) -> Option<String> {
    let mut components = path.split('/');
    components.next()?;
    let rest: Vec<&str> = components.collect();
    if rest.is_empty() || rest.iter().any(|c| c.is_empty()) {
        return None;
    }
    Some(rest.join("_"))
}

/// Image id of a file found on disk: `<parent directory name>_<file name>`.
pub fn image_id_from_file(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let category = path.parent()?.file_name()?.to_str()?;
    Some(format!("{}_{}", category, file_name))
}

/// Images are always read as three-channel colour, whatever their stored layout.
pub const COLOR_DEPTH: u8 = 3;

/// Read width and height from the image header.
pub fn read_image_size(path: &Path) -> Result<ImageSize> {
    let decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let (width, height) = decoder.dimensions();
    Ok(ImageSize {
        width,
        height,
        depth: COLOR_DEPTH,
    })
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Create the output directory if it does not exist yet and return its path
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_dir() {
        log::debug!("Directory {:?} already exists, reusing it.", path);
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}
