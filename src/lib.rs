//! DeepFashion to Pascal VOC converter
//!
//! This library reads the DeepFashion category, bounding box and evaluation
//! partition tables, joins them per image and writes one VOC annotation per
//! image found on disk, together with the trainval/test image sets.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod linker;
pub mod splits;
pub mod table;
pub mod types;
pub mod utils;
pub mod voc;

// Re-export commonly used types and functions
pub use config::{Args, DatasetLayout};
pub use conversion::emit_annotations;
pub use dataset::process_dataset;
pub use error::{Error, ErrorKind, Result};
pub use io::{load_source_tables, setup_output_directories, SourceTables};
pub use linker::{link, LinkedRecords};
pub use splits::write_splits;
pub use table::{load_table, parse_table};
pub use types::{
    BBoxRow, BndBox, CategoryRow, ClothRow, ClothType, LinkedRecord, OutputDirs, PartitionRow,
    ProcessingStats, Split,
};
pub use voc::{read_annotation, write_annotation, AnnotationDocument};
