use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification used by the binary to report how a run failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source tables disagree with themselves or with each other.
    Integrity,
    /// A required input is absent.
    Config,
    /// Reading or writing files failed.
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot find {input}: {}", path.display())]
    MissingInput { input: &'static str, path: PathBuf },

    #[error("{table} table declares {declared} rows but {parsed} were parsed")]
    RowCountMismatch {
        table: &'static str,
        declared: usize,
        parsed: usize,
    },

    #[error("{table} table has a malformed header: {reason}")]
    MalformedHeader { table: &'static str, reason: String },

    #[error("{table} table, line {line}: {reason}")]
    MalformedRow {
        table: &'static str,
        line: usize,
        reason: String,
    },

    #[error("duplicate image id {image_id} in {table} table")]
    DuplicateImageId { table: &'static str, image_id: String },

    #[error(
        "joining {categories} category rows with {bboxes} bbox rows produced {joined} records"
    )]
    JoinMismatch {
        categories: usize,
        bboxes: usize,
        joined: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write XML: {0}")]
    XmlWrite(#[from] xml::writer::Error),

    #[error("failed to read XML: {0}")]
    XmlRead(#[from] serde_xml_rs::Error),

    #[error("failed to read image: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingInput { .. } => ErrorKind::Config,
            Error::RowCountMismatch { .. }
            | Error::MalformedHeader { .. }
            | Error::MalformedRow { .. }
            | Error::DuplicateImageId { .. }
            | Error::JoinMismatch { .. } => ErrorKind::Integrity,
            Error::Io(_) | Error::XmlWrite(_) | Error::XmlRead(_) | Error::Image(_) => {
                ErrorKind::Io
            }
        }
    }
}
