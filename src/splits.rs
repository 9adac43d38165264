use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{PartitionRow, Split};

pub const TEST_MANIFEST: &str = "test.txt";
pub const TRAINVAL_MANIFEST: &str = "trainval.txt";

/// Image ids grouped into the two VOC image sets, in table order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageSets {
    pub trainval: Vec<String>,
    pub test: Vec<String>,
}

impl ImageSets {
    pub fn from_partition(rows: &[PartitionRow]) -> Self {
        let mut sets = Self::default();
        for row in rows {
            match row.split {
                Split::Train | Split::Val => sets.trainval.push(row.image_id.clone()),
                Split::Test => sets.test.push(row.image_id.clone()),
            }
        }
        sets
    }
}

fn write_manifest(path: &Path, image_ids: &[String]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for image_id in image_ids {
        writeln!(writer, "{}", image_id)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `test.txt` and `trainval.txt` into `out_dir`, returning their paths.
pub fn write_splits(rows: &[PartitionRow], out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let sets = ImageSets::from_partition(rows);

    let test_path = out_dir.join(TEST_MANIFEST);
    write_manifest(&test_path, &sets.test)?;
    let trainval_path = out_dir.join(TRAINVAL_MANIFEST);
    write_manifest(&trainval_path, &sets.trainval)?;

    info!(
        "Wrote {} trainval and {} test image ids to {}.",
        sets.trainval.len(),
        sets.test.len(),
        out_dir.display()
    );
    Ok((test_path, trainval_path))
}
