use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset failures – the only errors that reach the user
// ---------------------------------------------------------------------------

/// Failure to obtain a usable dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("error loading file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("error parsing {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
    #[error("no data found in {}", .0.display())]
    Empty(PathBuf),
}

/// Coarse classification so the caller can tell "no data" from "bad data".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Load,
    Parse,
    Empty,
}

impl DatasetError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DatasetError::Load { .. } | DatasetError::UnsupportedFormat(_) => FailureKind::Load,
            DatasetError::Parse { .. } => FailureKind::Parse,
            DatasetError::Empty(_) => FailureKind::Empty,
        }
    }

    pub(crate) fn parse(format: &'static str, message: impl fmt::Display) -> Self {
        DatasetError::Parse {
            format,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Load => write!(f, "load failure"),
            FailureKind::Parse => write!(f, "parse failure"),
            FailureKind::Empty => write!(f, "empty dataset"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data-quality warnings – recovered locally, never an `Err`
// ---------------------------------------------------------------------------

/// A per-row or per-column problem absorbed by normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DataQualityWarning {
    /// A numeric field held a value that does not parse; `0` was used.
    NonNumeric {
        row: usize,
        field: String,
        raw: String,
    },
    /// The identifier cell was empty; the row was excluded.
    MissingIdentifier { row: usize, field: String },
    /// A bound column does not exist in the dataset at all.
    MissingColumn { field: String },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::NonNumeric { row, field, raw } => {
                write!(f, "row {row}: '{raw}' in column '{field}' is not a number, using 0")
            }
            DataQualityWarning::MissingIdentifier { row, field } => {
                write!(f, "row {row}: no value in identifier column '{field}', row excluded")
            }
            DataQualityWarning::MissingColumn { field } => {
                write!(f, "column '{field}' is not present in the dataset")
            }
        }
    }
}
