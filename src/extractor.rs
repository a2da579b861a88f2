//! # Trace Table Extraction
//!
//! Turns a located detector block into a [`Table`]: exactly
//! `point_count` rows are read starting on the line after the column header,
//! each `R.Time (min)` value is converted to a retention volume with the
//! flow rate, and the series is labelled `{uv|fl}.{NN}` after the sample
//! number in the file name.

use std::fmt;
use std::sync::Arc;

use crate::error::{BatchError, ParseError};
use crate::locator::{BlockKind, BlockSpec};
use crate::report::ReportFile;
use crate::sample::{NumericStem, SampleId, SampleIdentifier};

/// Name of the index column in exported tables
pub const INDEX_COLUMN: &str = "ret.t.ml.min";

/// Mobile phase flow rate in ml/min
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FlowRate(f64);

impl FlowRate {
    /// Validate a flow rate; it must be finite and greater than zero
    pub fn new(ml_per_min: f64) -> Result<Self, BatchError> {
        if ml_per_min.is_finite() && ml_per_min > 0.0 {
            Ok(Self(ml_per_min))
        } else {
            Err(BatchError::InvalidFlowRate(ml_per_min))
        }
    }

    /// Flow rate in ml/min
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for FlowRate {
    fn default() -> Self {
        Self(1.0)
    }
}

impl fmt::Display for FlowRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ml/min", self.0)
    }
}

/// One raw row of a detector block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    /// Retention time in minutes
    pub retention_time: f64,
    /// Detector signal
    pub intensity: f64,
}

/// One row of an extracted table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumePoint {
    /// Retention volume in ml (retention time x flow rate)
    pub retention_volume: f64,
    /// Detector signal
    pub intensity: f64,
}

/// A labelled trace indexed by retention volume.
///
/// Rows keep the order of the report; nothing is sorted or deduplicated here.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    kind: BlockKind,
    sample: SampleId,
    label: String,
    points: Vec<VolumePoint>,
}

impl Table {
    /// Build a table from already converted points
    pub fn from_points(kind: BlockKind, sample: SampleId, points: Vec<VolumePoint>) -> Self {
        let label = format!("{}.{}", kind.label_prefix(), sample);
        Self {
            kind,
            sample,
            label,
            points,
        }
    }

    /// Column label, e.g. `uv.07`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Detector block the trace came from
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Sample number from the file name
    pub fn sample(&self) -> SampleId {
        self.sample
    }

    /// All rows in report order
    pub fn points(&self) -> &[VolumePoint] {
        &self.points
    }

    /// Retention volumes in report order
    pub fn index(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.retention_volume)
    }

    /// Intensities in report order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.intensity)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Reads the data rows of a located block
#[derive(Clone)]
pub struct TableExtractor {
    flow_rate: FlowRate,
    identifier: Arc<dyn SampleIdentifier>,
}

impl fmt::Debug for TableExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableExtractor")
            .field("flow_rate", &self.flow_rate)
            .finish_non_exhaustive()
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new(FlowRate::default())
    }
}

impl TableExtractor {
    /// Extractor that names samples after the numeric file stem
    pub fn new(flow_rate: FlowRate) -> Self {
        Self {
            flow_rate,
            identifier: Arc::new(NumericStem),
        }
    }

    /// Replace the sample naming strategy
    pub fn with_identifier<I: SampleIdentifier + 'static>(mut self, identifier: I) -> Self {
        self.identifier = Arc::new(identifier);
        self
    }

    /// Flow rate applied to retention times
    pub fn flow_rate(&self) -> FlowRate {
        self.flow_rate
    }

    /// Read the raw rows of a block without unit conversion
    pub fn read_points(
        &self,
        report: &ReportFile,
        spec: &BlockSpec,
    ) -> Result<Vec<DataPoint>, ParseError> {
        let lines = report.lines();
        let start = spec.data_start_line + 1;
        let end = start
            .checked_add(spec.point_count)
            .filter(|&end| end <= lines.len())
            .ok_or(ParseError::TruncatedBlock {
                kind: spec.kind,
                expected: spec.point_count,
                found: lines.len().saturating_sub(start),
            })?;

        lines[start..end]
            .iter()
            .enumerate()
            .map(|(offset, line)| parse_row(line, start + offset))
            .collect()
    }

    /// Extract the block as a labelled table indexed by retention volume
    pub fn extract(&self, report: &ReportFile, spec: &BlockSpec) -> Result<Table, ParseError> {
        let sample = self.identifier.identify(report.path())?;
        let flow_rate = self.flow_rate.value();

        let points = self
            .read_points(report, spec)?
            .into_iter()
            .map(|p| VolumePoint {
                retention_volume: p.retention_time * flow_rate,
                intensity: p.intensity,
            })
            .collect();

        Ok(Table::from_points(spec.kind, sample, points))
    }
}

/// Extract a block with the default sample naming
pub fn extract(
    report: &ReportFile,
    spec: &BlockSpec,
    flow_rate: FlowRate,
) -> Result<Table, ParseError> {
    TableExtractor::new(flow_rate).extract(report, spec)
}

/// Parse `retention_time<ws>intensity`; `line_idx` is 0-based
fn parse_row(line: &str, line_idx: usize) -> Result<DataPoint, ParseError> {
    let malformed = || ParseError::MalformedRow {
        line: line_idx + 1,
        content: line.to_string(),
    };

    let mut fields = line.split_whitespace();
    let (Some(time), Some(intensity), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed());
    };

    let retention_time: f64 = time.parse().map_err(|_| malformed())?;
    let intensity: f64 = intensity.parse().map_err(|_| malformed())?;
    if !retention_time.is_finite() {
        return Err(malformed());
    }

    Ok(DataPoint {
        retention_time,
        intensity,
    })
}
