use log::{error, info};
use std::path::Path;

use crate::config::{Args, DatasetLayout};
use crate::error::Result;
use crate::table::load_table;
use crate::types::{BBoxRow, CategoryRow, ClothRow, OutputDirs, PartitionRow};
use crate::utils::create_output_directory;

/// All source tables of one dataset.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub categories: Vec<CategoryRow>,
    /// Only loaded to check its row count.
    pub cloths: Vec<ClothRow>,
    pub bboxes: Vec<BBoxRow>,
    pub partitions: Vec<PartitionRow>,
}

/// Load the four tables of the dataset.
///
/// Every table is attempted and each failure is logged on its own; the first
/// failure is then returned so no join runs on an incomplete dataset.
pub fn load_source_tables(layout: &DatasetLayout) -> Result<SourceTables> {
    let categories = load_table::<CategoryRow>(&layout.category_table);
    let cloths = load_table::<ClothRow>(&layout.cloth_table);
    let bboxes = load_table::<BBoxRow>(&layout.bbox_table);
    let partitions = load_table::<PartitionRow>(&layout.partition_table);

    for err in [
        categories.as_ref().err(),
        cloths.as_ref().err(),
        bboxes.as_ref().err(),
        partitions.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    {
        error!("{}", err);
    }

    let tables = SourceTables {
        categories: categories?,
        cloths: cloths?,
        bboxes: bboxes?,
        partitions: partitions?,
    };
    info!(
        "Loaded {} category, {} cloth, {} bbox and {} partition rows.",
        tables.categories.len(),
        tables.cloths.len(),
        tables.bboxes.len(),
        tables.partitions.len()
    );
    Ok(tables)
}

/// Set up the directory structure for the VOC dataset output
pub fn setup_output_directories(args: &Args, output_root: &Path) -> std::io::Result<OutputDirs> {
    let annotations_dir = create_output_directory(&output_root.join("Annotations"))?;
    let image_sets_dir = create_output_directory(&output_root.join("ImageSets"))?;
    let jpeg_images_dir = if args.copy_images {
        Some(create_output_directory(&output_root.join("JPEGImages"))?)
    } else {
        None
    };

    Ok(OutputDirs {
        annotations_dir,
        image_sets_dir,
        jpeg_images_dir,
    })
}
