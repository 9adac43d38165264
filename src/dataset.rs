use log::{error, info, warn};

use crate::config::Args;
use crate::conversion::emit_annotations;
use crate::error::{Error, Result};
use crate::io::{load_source_tables, setup_output_directories};
use crate::linker::link;
use crate::splits::write_splits;
use crate::types::ProcessingStats;

/// Main conversion pipeline: load tables, link, emit annotations, write image sets.
pub fn process_dataset(args: &Args) -> Result<ProcessingStats> {
    let layout = args.layout();
    let missing_images = if layout.image_dir.is_dir() {
        None
    } else {
        let err = Error::MissingInput {
            input: "image directory",
            path: layout.image_dir.clone(),
        };
        error!("{}", err);
        Some(err)
    };

    let tables = load_source_tables(&layout)?;
    if let Some(err) = missing_images {
        return Err(err);
    }
    let linked = link(&tables.categories, &tables.bboxes)?;

    let output_root = args.output_root();
    let output_dirs = setup_output_directories(args, &output_root)?;
    info!("Writing VOC dataset to {}.", output_root.display());

    let stats = emit_annotations(&layout.image_dir, &linked, &output_dirs, args.no_progress)?;
    if stats.saved_annotations < linked.len() {
        warn!(
            "{} linked records had no readable image on disk.",
            linked.len() - stats.saved_annotations
        );
    }

    write_splits(&tables.partitions, &output_dirs.image_sets_dir)?;

    stats.print_summary();
    info!("Conversion process completed successfully.");
    Ok(stats)
}
