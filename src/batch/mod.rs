//! # Batch Conversion
//!
//! Runs the locate/extract pipeline over every report in a directory and
//! writes one combined table:
//!
//! ```text
//!  dir/01.txt  dir/02.txt  ...
//!       │          │
//!       ▼          ▼
//!  ┌───────────────────────┐
//!  │ BlockLocator          │  one pass per file → BlockSpec
//!  │ TableExtractor        │  rows × flow rate  → Table
//!  └───────────────────────┘
//!       │
//!       ▼
//!  ┌───────────────────────┐
//!  │ BatchResult           │  outer join on retention volume
//!  └───────────────────────┘
//!       │
//!       ▼
//!  dir/processed.csv
//! ```
//!
//! By default the first bad report aborts the batch
//! ([`ErrorPolicy::FailFast`]). [`ErrorPolicy::SkipInvalid`] logs bad reports,
//! leaves them out of the table and lists them in [`BatchOutcome::skipped`].

mod result;


use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{BatchError, ParseError};
use crate::extractor::{FlowRate, Table, TableExtractor};
use crate::locator::{BlockKind, BlockLocator, PointCountMode};
use crate::report::ReportFile;
use crate::sample::SampleIdentifier;

pub use result::BatchResult;

/// Default name of the combined output
pub const DEFAULT_OUTPUT_NAME: &str = "processed.csv";

/// Substring a directory entry name must contain to be treated as a report
pub const REPORT_NAME_PATTERN: &str = ".txt";

/// What to do when one report cannot be converted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole batch on the first failure
    #[default]
    FailFast,
    /// Skip the report, log it, and keep going
    SkipInvalid,
}

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Flow rate used to convert retention time to volume
    pub flow_rate: FlowRate,
    /// Detector trace to extract
    pub kind: BlockKind,
    /// How point counts are assigned to blocks
    pub point_count_mode: PointCountMode,
    /// Failure handling
    pub error_policy: ErrorPolicy,
    /// File name of the combined CSV inside the source directory
    pub output_name: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            flow_rate: FlowRate::default(),
            kind: BlockKind::Fluorescence,
            point_count_mode: PointCountMode::default(),
            error_policy: ErrorPolicy::default(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

/// A report left out under [`ErrorPolicy::SkipInvalid`]
#[derive(Debug)]
pub struct SkippedFile {
    /// Report path
    pub path: PathBuf,
    /// Why it was skipped
    pub error: ParseError,
}

/// Summary of a completed batch
#[derive(Debug)]
pub struct BatchOutcome {
    /// Path of the written CSV
    pub output_path: PathBuf,
    /// Number of reports that contributed a column
    pub files_processed: usize,
    /// Reports left out
    pub skipped: Vec<SkippedFile>,
    /// Column labels in output order
    pub columns: Vec<String>,
    /// Number of data rows written
    pub rows: usize,
}

/// List report files in `dir`, sorted by name.
///
/// An entry qualifies when its name contains `.txt` and it is a regular file.
pub fn report_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().contains(REPORT_NAME_PATTERN) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            debug!("Ignoring non-file entry {}", path.display());
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Converts a directory of reports into one CSV
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: BatchConfig,
    locator: BlockLocator,
    extractor: TableExtractor,
}

impl BatchProcessor {
    /// Create a processor from a configuration
    pub fn new(config: BatchConfig) -> Self {
        let locator = BlockLocator::new().with_point_count_mode(config.point_count_mode);
        let extractor = TableExtractor::new(config.flow_rate);
        Self {
            config,
            locator,
            extractor,
        }
    }

    /// Replace the sample naming strategy
    pub fn with_identifier<I: SampleIdentifier + 'static>(mut self, identifier: I) -> Self {
        self.extractor = self.extractor.with_identifier(identifier);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Open, scan and extract a single report
    pub fn process_file(&self, path: &Path) -> Result<Table, ParseError> {
        let report = ReportFile::open(path)?;
        let spec = self.locator.locate(report.lines(), self.config.kind)?;
        let table = self.extractor.extract(&report, &spec)?;
        info!(
            "{}: {} points from line {} as '{}'",
            path.display(),
            table.len(),
            spec.data_start_line + 2,
            table.label()
        );
        Ok(table)
    }

    /// Extract every report in `dir` according to the error policy
    pub fn collect_tables(
        &self,
        dir: &Path,
    ) -> Result<(Vec<Table>, Vec<SkippedFile>), BatchError> {
        // An earlier output named like a report is never read back
        let output_path = dir.join(&self.config.output_name);
        let files: Vec<PathBuf> = report_files(dir)?
            .into_iter()
            .filter(|path| *path != output_path)
            .collect();
        if files.is_empty() {
            return Err(BatchError::NoFilesFound {
                dir: dir.to_path_buf(),
            });
        }
        info!("Found {} report files in {}", files.len(), dir.display());

        let mut tables = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();

        for (path, result) in self.extract_all(files) {
            match result {
                Ok(table) => tables.push(table),
                Err(error) => match self.config.error_policy {
                    ErrorPolicy::FailFast => return Err(BatchError::file(path, error)),
                    ErrorPolicy::SkipInvalid => {
                        warn!("Skipping {}: {}", path.display(), error);
                        skipped.push(SkippedFile { path, error });
                    }
                },
            }
        }

        if tables.is_empty() {
            return Err(BatchError::NothingExtracted {
                dir: dir.to_path_buf(),
                skipped: skipped.len(),
            });
        }

        Ok((tables, skipped))
    }

    #[cfg(not(feature = "parallel"))]
    fn extract_all(
        &self,
        files: Vec<PathBuf>,
    ) -> impl Iterator<Item = (PathBuf, Result<Table, ParseError>)> + '_ {
        // Lazy, so fail-fast stops reading at the first bad report
        files.into_iter().map(move |path| {
            let result = self.process_file(&path);
            (path, result)
        })
    }

    #[cfg(feature = "parallel")]
    fn extract_all(
        &self,
        files: Vec<PathBuf>,
    ) -> impl Iterator<Item = (PathBuf, Result<Table, ParseError>)> + '_ {
        use rayon::prelude::*;

        let results: Vec<_> = files
            .into_par_iter()
            .map(|path| {
                let result = self.process_file(&path);
                (path, result)
            })
            .collect();
        results.into_iter()
    }

    /// Extract, merge and write the combined CSV into `dir`
    pub fn run(&self, dir: &Path) -> Result<BatchOutcome, BatchError> {
        let (tables, skipped) = self.collect_tables(dir)?;
        let files_processed = tables.len();

        let result = BatchResult::from_tables(tables)?;
        let output_path = dir.join(&self.config.output_name);
        result.write_to_path(&output_path)?;

        info!(
            "Wrote {} rows x {} columns to {}",
            result.len(),
            result.labels().len(),
            output_path.display()
        );
        if !skipped.is_empty() {
            warn!("{} report files were skipped", skipped.len());
        }

        Ok(BatchOutcome {
            output_path,
            files_processed,
            skipped,
            columns: result.labels().to_vec(),
            rows: result.len(),
        })
    }
}
