//! # lctrace - LabSolutions Trace Extractor
//!
//! `lctrace` reads the ASCII reports that Shimadzu LabSolutions exports for
//! each HPLC run and pulls out one detector trace, UV absorbance
//! (`Detector A-Ch1`) or fluorescence (`Detector B-Ch1`). A directory of
//! reports becomes one CSV with a retention-volume index and one column per
//! sample.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lctrace::batch::{BatchConfig, BatchProcessor};
//! use lctrace::extractor::FlowRate;
//! use lctrace::locator::BlockKind;
//! use std::path::Path;
//!
//! let config = BatchConfig {
//!     flow_rate: FlowRate::new(0.5)?,
//!     kind: BlockKind::Uv,
//!     ..Default::default()
//! };
//!
//! let outcome = BatchProcessor::new(config).run(Path::new("runs/2024-05-13"))?;
//! println!("{} samples written to {}", outcome.files_processed, outcome.output_path.display());
//! # Ok::<(), lctrace::error::BatchError>(())
//! ```
//!
//! ## Single Report
//!
//! ```rust,no_run
//! use lctrace::extractor::{extract, FlowRate};
//! use lctrace::locator::{locate, BlockKind};
//! use lctrace::report::ReportFile;
//!
//! let report = ReportFile::open("runs/07.txt")?;
//! let spec = locate(report.lines(), BlockKind::Fluorescence)?;
//! let table = extract(&report, &spec, FlowRate::default())?;
//! assert_eq!(table.label(), "fl.07");
//! # Ok::<(), lctrace::error::ParseError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`report`]: a report file as an ordered list of lines
//! - [`locator`]: single-pass scan for detector blocks and their point counts
//! - [`extractor`]: reads a located block into a labelled [`Table`](extractor::Table)
//! - [`sample`]: sample numbers from file names
//! - [`batch`]: directory driver, outer-join merge and CSV export
//! - [`error`]: error types

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod batch;
pub mod error;
pub mod extractor;
pub mod locator;
pub mod report;
pub mod sample;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{
        report_files, BatchConfig, BatchOutcome, BatchProcessor, BatchResult, ErrorPolicy,
        SkippedFile, DEFAULT_OUTPUT_NAME,
    };
    pub use crate::error::{BatchError, MissingMarker, ParseError};
    pub use crate::extractor::{
        extract, DataPoint, FlowRate, Table, TableExtractor, VolumePoint, INDEX_COLUMN,
    };
    pub use crate::locator::{
        locate, BlockKind, BlockLocator, BlockSpec, PointCountMode, ScanState, ScanSummary,
    };
    pub use crate::report::ReportFile;
    pub use crate::sample::{NumericStem, SampleId, SampleIdentifier};
}
