use jwalk::WalkDir;
use log::{debug, error, info, warn};
use std::fs::copy;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::linker::LinkedRecords;
use crate::types::{ClothType, OutputDirs, ProcessingStats};
use crate::utils::{create_progress_bar, image_id_from_file, read_image_size};
use crate::voc::{write_annotation, AnnotationDocument};

/// What happened to a single image file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageOutcome {
    Saved,
    /// No linked record for this image id
    Unlinked,
    /// The image could not be read
    Failed,
}

/// List every regular file below `image_dir`, sorted per directory.
pub fn collect_image_files(image_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(image_dir)
        .sort(true)
        .skip_hidden(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Failed to read directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .collect()
}

/// Path of the annotation file for an image id: the extension becomes `.xml`.
pub fn annotation_path(annotations_dir: &Path, image_id: &str) -> PathBuf {
    annotations_dir.join(image_id).with_extension("xml")
}

/// Convert one image into a VOC annotation if it has a linked record.
///
/// Unreadable images are logged and reported as [`ImageOutcome::Failed`];
/// failures to write output are returned as errors.
pub fn process_image(
    image_path: &Path,
    linked: &LinkedRecords,
    output_dirs: &OutputDirs,
    stats: &mut ProcessingStats,
) -> Result<ImageOutcome> {
    let Some(image_id) = image_id_from_file(image_path) else {
        warn!("Skipping file with a non UTF-8 name: {:?}", image_path);
        return Ok(ImageOutcome::Unlinked);
    };
    let Some(record) = linked.get(&image_id) else {
        return Ok(ImageOutcome::Unlinked);
    };

    let size = match read_image_size(image_path) {
        Ok(size) => size,
        Err(e) => {
            error!("Failed to read image {}: {}", image_path.display(), e);
            return Ok(ImageOutcome::Failed);
        }
    };

    if ClothType::from_label(record.category_label) == ClothType::NotAvailable {
        warn!(
            "Label {} of {} is outside 1..=50, writing type NA",
            record.category_label, image_id
        );
        stats.unknown_labels += 1;
    }

    let document = AnnotationDocument::new(record, size);
    write_annotation(
        &document,
        &annotation_path(&output_dirs.annotations_dir, &image_id),
    )?;

    if let Some(jpeg_images_dir) = &output_dirs.jpeg_images_dir {
        copy(image_path, jpeg_images_dir.join(&image_id))?;
    }

    Ok(ImageOutcome::Saved)
}

/// Walk the image tree and write one annotation per linked image.
pub fn emit_annotations(
    image_dir: &Path,
    linked: &LinkedRecords,
    output_dirs: &OutputDirs,
    hide_progress: bool,
) -> Result<ProcessingStats> {
    let image_files = collect_image_files(image_dir);
    info!(
        "Found {} files under {}.",
        image_files.len(),
        image_dir.display()
    );

    let mut stats = ProcessingStats::new();
    let pb = create_progress_bar(image_files.len() as u64, "Annotations", hide_progress);
    let mut current_dir: Option<&Path> = None;

    for image_path in &image_files {
        let parent = image_path.parent();
        if parent != current_dir {
            if let Some(done) = current_dir {
                debug!("{} is done", done.display());
            }
            current_dir = parent;
        }

        stats.total_files_seen += 1;
        match process_image(image_path, linked, output_dirs, &mut stats) {
            Ok(ImageOutcome::Saved) => stats.saved_annotations += 1,
            Ok(ImageOutcome::Unlinked) => stats.skipped_unlinked += 1,
            Ok(ImageOutcome::Failed) => stats.failed_images += 1,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        }
        pb.inc(1);
    }
    if let Some(done) = current_dir {
        debug!("{} is done", done.display());
    }
    pb.finish_with_message("Annotation processing complete");

    Ok(stats)
}
