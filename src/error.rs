//! Error types for report parsing and batch conversion.

use std::path::PathBuf;

use crate::locator::BlockKind;

/// Errors that can occur while turning one report file into a [`Table`](crate::extractor::Table)
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The file name does not carry a sample number
    #[error("Invalid file name '{}': the file stem must be a sample number", .path.display())]
    InvalidFilename {
        /// Offending path
        path: PathBuf,
    },

    /// The requested detector block is absent or incomplete
    #[error("{kind} block not found: {reason}")]
    BlockNotFound {
        /// Requested detector block
        kind: BlockKind,
        /// Which marker was missing
        reason: MissingMarker,
    },

    /// A `# of Points` line without an integer 4th token
    #[error("Malformed point count at line {line}: '{content}'")]
    MalformedPointCount {
        /// 1-based line number
        line: usize,
        /// Raw line content
        content: String,
    },

    /// The block was found but no `# of Points` line belongs to it
    #[error("{kind} block has no '# of Points' line")]
    MissingPointCount {
        /// Detector block
        kind: BlockKind,
    },

    /// A data row that is not two numeric fields
    #[error("Malformed data row at line {line}: '{content}'")]
    MalformedRow {
        /// 1-based line number
        line: usize,
        /// Raw line content
        content: String,
    },

    /// The file ends before the declared number of rows
    #[error("{kind} block declares {expected} points but only {found} rows follow")]
    TruncatedBlock {
        /// Detector block
        kind: BlockKind,
        /// Declared point count
        expected: usize,
        /// Rows actually present
        found: usize,
    },

    /// I/O failure opening or reading the report
    #[error("Failed to read '{}': {source}", .path.display())]
    FileRead {
        /// Report path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// The marker whose absence caused [`ParseError::BlockNotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMarker {
    /// The `[LC Chromatogram(...)]` header never appeared
    Header,
    /// The header appeared but no `R.Time (min)\tIntensity` line followed it
    ColumnHeader,
}

impl std::fmt::Display for MissingMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingMarker::Header => write!(f, "detector header never seen"),
            MissingMarker::ColumnHeader => {
                write!(f, "no 'R.Time (min)\\tIntensity' line after the detector header")
            }
        }
    }
}

/// Errors that can occur while converting a directory of reports
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// A single report failed to parse
    #[error("{}: {source}", .path.display())]
    File {
        /// Offending report
        path: PathBuf,
        /// Parse failure
        #[source]
        source: ParseError,
    },

    /// The directory holds no `.txt` entries
    #[error("No .txt report files found in '{}'", .dir.display())]
    NoFilesFound {
        /// Scanned directory
        dir: PathBuf,
    },

    /// All matching files were skipped as invalid
    #[error("None of the report files in '{}' could be extracted ({skipped} skipped)", .dir.display())]
    NothingExtracted {
        /// Scanned directory
        dir: PathBuf,
        /// Number of skipped files
        skipped: usize,
    },

    /// Two reports map to the same column label
    #[error("Duplicate column label '{label}'")]
    DuplicateLabel {
        /// Column label
        label: String,
    },

    /// One table holds the same retention volume twice
    #[error("Column '{label}' contains retention volume {volume} more than once")]
    DuplicateRetentionVolume {
        /// Column label
        label: String,
        /// Repeated retention volume
        volume: f64,
    },

    /// Flow rate is not a finite positive number
    #[error("Invalid flow rate {0}: must be a finite number greater than zero")]
    InvalidFlowRate(f64),

    /// I/O error listing the directory or writing the output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The temporary output could not be moved into place
    #[error("Failed to persist output: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl BatchError {
    /// Attach a report path to a parse failure
    pub fn file(path: impl Into<PathBuf>, source: ParseError) -> Self {
        BatchError::File {
            path: path.into(),
            source,
        }
    }
}
