use std::path::PathBuf;
use std::str::FromStr;

/// One row of `list_category_img.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub image_id: String,
    pub category_label: i64,
    /// Label token as written in the table
    pub label_text: String,
}

/// One row of `list_category_cloth.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClothRow {
    pub cloth_name: String,
    pub category_label: i64,
    pub category_type: i64,
}

/// Bounding box coordinates, kept exactly as written in the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BndBox {
    pub xmin: String,
    pub ymin: String,
    pub xmax: String,
    pub ymax: String,
}

/// One row of `list_bbox.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BBoxRow {
    pub image_id: String,
    pub bndbox: BndBox,
}

/// Evaluation split an image belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            other => Err(format!("unknown evaluation status '{}'", other)),
        }
    }
}

/// One row of `list_eval_partition.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRow {
    pub image_id: String,
    pub split: Split,
}

/// Category and bounding box of one image after joining the two tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedRecord {
    pub image_id: String,
    pub category_label: i64,
    pub label_text: String,
    pub bndbox: BndBox,
}

/// Coarse garment type derived from the fine-grained category label.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClothType {
    UpperBody,
    LowerBody,
    FullBody,
    NotAvailable,
}

impl ClothType {
    /// Labels 1..=20 are upper-body, 21..=36 lower-body and 37..=50 full-body garments.
    pub fn from_label(label: i64) -> Self {
        match label {
            1..=20 => ClothType::UpperBody,
            21..=36 => ClothType::LowerBody,
            37..=50 => ClothType::FullBody,
            _ => ClothType::NotAvailable,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClothType::UpperBody => "upper_body",
            ClothType::LowerBody => "lower_body",
            ClothType::FullBody => "full_body",
            ClothType::NotAvailable => "NA",
        }
    }
}

/// Pixel dimensions of a source image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    pub depth: u8,
}

// Paths of the VOC output directories
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub annotations_dir: PathBuf,
    pub image_sets_dir: PathBuf,
    pub jpeg_images_dir: Option<PathBuf>,
}

// Counters collected while emitting annotations
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub total_files_seen: usize,
    pub saved_annotations: usize,
    pub skipped_unlinked: usize,
    pub failed_images: usize,
    pub unknown_labels: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_summary(&self) {
        log::info!("=== Conversion Summary ===");
        log::info!("Image files seen: {}", self.total_files_seen);
        log::info!("Annotations saved: {}", self.saved_annotations);
        log::info!(
            "Skipped (no category/bbox record): {}",
            self.skipped_unlinked
        );
        if self.failed_images > 0 {
            log::warn!("Failed to read image: {}", self.failed_images);
        }
        if self.unknown_labels > 0 {
            log::warn!(
                "Annotations with a label outside 1..=50: {}",
                self.unknown_labels
            );
        }
    }
}
