use clap::Parser;
use std::path::{Path, PathBuf};

/// Command-line arguments for converting DeepFashion annotations to VOC format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root of the DeepFashion dataset (contains Anno/, Eval/ and Img/img/)
    #[arg(short = 'd', long = "dataset_dir")]
    pub dataset_dir: PathBuf,

    /// Output root for the VOC dataset, defaults to <dataset_dir>/VOC
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: Option<PathBuf>,

    /// Copy annotated images into JPEGImages/ under their image id
    #[arg(long = "copy_images")]
    pub copy_images: bool,

    /// Disable the progress bar
    #[arg(long = "no_progress")]
    pub no_progress: bool,
}

impl Args {
    pub fn new<P: Into<PathBuf>>(dataset_dir: P) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
            output_dir: None,
            copy_images: false,
            no_progress: false,
        }
    }

    pub fn layout(&self) -> DatasetLayout {
        DatasetLayout::new(&self.dataset_dir)
    }

    pub fn output_root(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.dataset_dir.join("VOC"))
    }
}

/// Fixed locations of the source tables and images relative to the dataset root.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    pub category_table: PathBuf,
    pub cloth_table: PathBuf,
    pub bbox_table: PathBuf,
    pub partition_table: PathBuf,
    pub image_dir: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: &Path) -> Self {
        let anno = root.join("Anno");
        let eval = root.join("Eval");
        Self {
            category_table: anno.join("list_category_img.txt"),
            cloth_table: anno.join("list_category_cloth.txt"),
            bbox_table: anno.join("list_bbox.txt"),
            partition_table: eval.join("list_eval_partition.txt"),
            image_dir: root.join("Img").join("img"),
        }
    }
}
