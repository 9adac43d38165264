//! Readers for the DeepFashion flat-file tables.
//!
//! Every table shares the same layout: line 1 holds the number of data rows,
//! line 2 the whitespace separated column names, and each following line one
//! row. Rows are materialised completely so the declared count can be checked.

use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{BBoxRow, BndBox, CategoryRow, ClothRow, PartitionRow, Split};
use crate::utils::image_id_from_table_path;

/// A table split into tokens, before any column is interpreted.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub declared: usize,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based line number in the source file
    pub line: usize,
    pub tokens: Vec<String>,
}

impl RawTable {
    pub fn parse(table: &'static str, content: &str) -> Result<Self> {
        let mut lines = content.lines().enumerate();

        let declared = match lines.next() {
            Some((_, line)) => line.trim().parse::<usize>().map_err(|_| Error::MalformedHeader {
                table,
                reason: format!("expected a row count on line 1, found '{}'", line.trim()),
            })?,
            None => {
                return Err(Error::MalformedHeader {
                    table,
                    reason: "file is empty".to_string(),
                })
            }
        };

        let columns: Vec<String> = match lines.next() {
            Some((_, line)) => line.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        };
        if columns.is_empty() {
            return Err(Error::MalformedHeader {
                table,
                reason: "missing column names on line 2".to_string(),
            });
        }

        let mut rows = Vec::with_capacity(declared.min(1 << 20));
        for (index, line) in lines {
            let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if tokens.is_empty() {
                continue;
            }
            if tokens.len() != columns.len() {
                return Err(Error::MalformedRow {
                    table,
                    line: index + 1,
                    reason: format!(
                        "expected {} columns, found {}",
                        columns.len(),
                        tokens.len()
                    ),
                });
            }
            rows.push(RawRow {
                line: index + 1,
                tokens,
            });
        }

        Ok(Self {
            declared,
            columns,
            rows,
        })
    }
}

/// A typed row that can be built from the tokens of one table line.
pub trait TableRow: Sized {
    /// Table name used in log and error messages.
    const TABLE: &'static str;
    /// Accepted numbers of header columns. Data rows are checked against the
    /// header, so `from_tokens` always sees one of these widths.
    const COLUMNS: &'static [usize];
    /// Description of the source file, used when it is missing.
    const INPUT: &'static str;

    /// `position` is the 1-based index of the row among the data rows.
    fn from_tokens(tokens: &[String], position: usize) -> Result<Self, String>;
}

fn parse_image_id(token: &str) -> Result<String, String> {
    image_id_from_table_path(token)
        .ok_or_else(|| format!("expected a path like img/<category>/<file>, found '{}'", token))
}

fn parse_int(token: &str, column: &str) -> Result<i64, String> {
    token
        .parse::<i64>()
        .map_err(|_| format!("{} must be an integer, found '{}'", column, token))
}

fn parse_coord(token: &str, column: &str) -> Result<u32, String> {
    token
        .parse::<u32>()
        .map_err(|_| format!("{} must be a non-negative integer, found '{}'", column, token))
}

impl TableRow for CategoryRow {
    const TABLE: &'static str = "category";
    const INPUT: &'static str = "category table";
    const COLUMNS: &'static [usize] = &[2];

    fn from_tokens(tokens: &[String], _position: usize) -> Result<Self, String> {
        Ok(CategoryRow {
            image_id: parse_image_id(&tokens[0])?,
            category_label: parse_int(&tokens[1], "category label")?,
            label_text: tokens[1].clone(),
        })
    }
}

impl TableRow for ClothRow {
    const TABLE: &'static str = "cloth";
    const INPUT: &'static str = "cloth table";
    const COLUMNS: &'static [usize] = &[2, 3];

    // The cloth table is either `<name> <type>`, where the label is the row
    // position, or `<name> <label> <type>`.
    fn from_tokens(tokens: &[String], position: usize) -> Result<Self, String> {
        match tokens {
            [name, category_type] => Ok(ClothRow {
                cloth_name: name.clone(),
                category_label: position as i64,
                category_type: parse_int(category_type, "category type")?,
            }),
            [name, label, category_type] => Ok(ClothRow {
                cloth_name: name.clone(),
                category_label: parse_int(label, "category label")?,
                category_type: parse_int(category_type, "category type")?,
            }),
            _ => Err(format!(
                "expected 2 or 3 columns in the cloth table, found {}",
                tokens.len()
            )),
        }
    }
}

impl TableRow for BBoxRow {
    const TABLE: &'static str = "bbox";
    const INPUT: &'static str = "bbox table";
    const COLUMNS: &'static [usize] = &[5];

    fn from_tokens(tokens: &[String], _position: usize) -> Result<Self, String> {
        let image_id = parse_image_id(&tokens[0])?;
        let xmin = parse_coord(&tokens[1], "xmin")?;
        let ymin = parse_coord(&tokens[2], "ymin")?;
        let xmax = parse_coord(&tokens[3], "xmax")?;
        let ymax = parse_coord(&tokens[4], "ymax")?;
        if xmin >= xmax || ymin >= ymax {
            warn!(
                "Degenerate bounding box for {}: ({}, {}, {}, {})",
                image_id, xmin, ymin, xmax, ymax
            );
        }

        Ok(BBoxRow {
            image_id,
            bndbox: BndBox {
                xmin: tokens[1].clone(),
                ymin: tokens[2].clone(),
                xmax: tokens[3].clone(),
                ymax: tokens[4].clone(),
            },
        })
    }
}

impl TableRow for PartitionRow {
    const TABLE: &'static str = "partition";
    const INPUT: &'static str = "partition table";
    const COLUMNS: &'static [usize] = &[2];

    fn from_tokens(tokens: &[String], _position: usize) -> Result<Self, String> {
        Ok(PartitionRow {
            image_id: parse_image_id(&tokens[0])?,
            split: tokens[1].parse::<Split>()?,
        })
    }
}

/// Parse table content and check the row count against the declared count.
pub fn parse_table<R: TableRow>(content: &str) -> Result<Vec<R>> {
    let raw = RawTable::parse(R::TABLE, content)?;
    if !R::COLUMNS.contains(&raw.columns.len()) {
        return Err(Error::MalformedHeader {
            table: R::TABLE,
            reason: format!(
                "expected {:?} columns, header names {}",
                R::COLUMNS,
                raw.columns.len()
            ),
        });
    }

    let rows = raw
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            R::from_tokens(&row.tokens, index + 1).map_err(|reason| Error::MalformedRow {
                table: R::TABLE,
                line: row.line,
                reason,
            })
        })
        .collect::<Result<Vec<R>>>()?;

    if rows.len() != raw.declared {
        return Err(Error::RowCountMismatch {
            table: R::TABLE,
            declared: raw.declared,
            parsed: rows.len(),
        });
    }

    Ok(rows)
}

/// Read and parse one table file.
pub fn load_table<R: TableRow>(path: &Path) -> Result<Vec<R>> {
    if !path.is_file() {
        return Err(Error::MissingInput {
            input: R::INPUT,
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    let rows = parse_table::<R>(&content)?;
    debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
