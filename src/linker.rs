use log::info;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{BBoxRow, CategoryRow, LinkedRecord};

/// Per-image records keyed by image id.
#[derive(Debug, Default, Clone)]
pub struct LinkedRecords {
    records: HashMap<String, LinkedRecord>,
}

impl LinkedRecords {
    pub fn get(&self, image_id: &str) -> Option<&LinkedRecord> {
        self.records.get(image_id)
    }

    pub fn contains(&self, image_id: &str) -> bool {
        self.records.contains_key(image_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Inner-join category and bbox rows on image id.
///
/// Both inputs must be in exact one-to-one correspondence: duplicate ids on
/// either side, or an id present on only one side, fail the join.
pub fn link(categories: &[CategoryRow], bboxes: &[BBoxRow]) -> Result<LinkedRecords> {
    let mut by_id: HashMap<&str, &BBoxRow> = HashMap::with_capacity(bboxes.len());
    for row in bboxes {
        if by_id.insert(row.image_id.as_str(), row).is_some() {
            return Err(Error::DuplicateImageId {
                table: "bbox",
                image_id: row.image_id.clone(),
            });
        }
    }

    let mut records = HashMap::with_capacity(categories.len());
    for row in categories {
        let Some(bbox) = by_id.get(row.image_id.as_str()) else {
            continue;
        };
        let record = LinkedRecord {
            image_id: row.image_id.clone(),
            category_label: row.category_label,
            label_text: row.label_text.clone(),
            bndbox: bbox.bndbox.clone(),
        };
        if records.insert(row.image_id.clone(), record).is_some() {
            return Err(Error::DuplicateImageId {
                table: "category",
                image_id: row.image_id.clone(),
            });
        }
    }

    if records.len() != categories.len() || records.len() != bboxes.len() {
        return Err(Error::JoinMismatch {
            categories: categories.len(),
            bboxes: bboxes.len(),
            joined: records.len(),
        });
    }

    info!("Linked {} category and bbox records.", records.len());
    Ok(LinkedRecords { records })
}
