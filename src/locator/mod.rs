//! # Detector Block Locator
//!
//! LabSolutions ASCII exports are sectioned reports without a fixed layout.
//! Each detector trace lives in its own section:
//!
//! ```text
//! [LC Chromatogram(Detector A-Ch1)]
//! Interval(msec)	500
//! # of Points	3601
//! ...
//! R.Time (min)	Intensity
//! 0.00000	-12
//! 0.00833	-11
//! ...
//! ```
//!
//! [`BlockLocator`] finds, in one forward pass, the line of the
//! `R.Time (min)\tIntensity` column header that belongs to each detector and
//! the number of data rows declared for it. The pass is driven by a
//! [`ScanState`] machine whose transitions are evaluated in a fixed priority
//! order per line.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::error::{MissingMarker, ParseError};

#[cfg(test)]
mod tests;

/// Section header of the UV absorbance trace
pub const UV_HEADER: &str = "[LC Chromatogram(Detector A-Ch1)]";

/// Section header of the fluorescence trace
pub const FL_HEADER: &str = "[LC Chromatogram(Detector B-Ch1)]";

/// Marker of the line declaring the number of data rows
pub const POINT_COUNT_MARKER: &str = "# of Points";

/// Column header immediately preceding the data rows
pub const COLUMN_HEADER: &str = "R.Time (min)\tIntensity";

/// Whitespace-separated token of a point-count line that holds the count
const POINT_COUNT_TOKEN: usize = 3;

/// Detector trace to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    /// UV absorbance (Detector A)
    Uv,
    /// Fluorescence (Detector B)
    Fluorescence,
}

impl BlockKind {
    /// Prefix used in column labels (`uv` or `fl`)
    pub fn label_prefix(&self) -> &'static str {
        match self {
            BlockKind::Uv => "uv",
            BlockKind::Fluorescence => "fl",
        }
    }

    /// Section header marking this block
    pub fn header_marker(&self) -> &'static str {
        match self {
            BlockKind::Uv => UV_HEADER,
            BlockKind::Fluorescence => FL_HEADER,
        }
    }

    /// All detector kinds
    pub fn variants() -> &'static [&'static str] {
        &["uv", "fl"]
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Uv => write!(f, "UV"),
            BlockKind::Fluorescence => write!(f, "Fluorescence"),
        }
    }
}

impl FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uv" => Ok(BlockKind::Uv),
            "fl" | "fluorescence" => Ok(BlockKind::Fluorescence),
            other => Err(format!(
                "Unknown trace '{}'. Valid traces: {}",
                other,
                BlockKind::variants().join(", ")
            )),
        }
    }
}

/// Where one detector block's data rows live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpec {
    /// Detector block
    pub kind: BlockKind,
    /// 0-based line index of the column header; rows start on the next line
    pub data_start_line: usize,
    /// Number of data rows
    pub point_count: usize,
}

/// How `# of Points` lines are assigned to blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointCountMode {
    /// Each block takes the count declared inside its own section.
    /// A block without one fails with [`ParseError::MissingPointCount`].
    #[default]
    PerBlock,
    /// One count shared across the file: a block takes the last count seen
    /// before its column header, even one declared by an earlier block.
    Shared,
}

/// State of the line scanner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanState {
    /// Not inside a detector section
    #[default]
    Idle,
    /// UV header seen, waiting for its column header
    AwaitingUvData,
    /// Fluorescence header seen, waiting for its column header
    AwaitingFlData,
}

/// What a line meant to the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Header(BlockKind),
    DataStart(BlockKind),
    PointCount,
    Nothing,
}

impl ScanState {
    /// Block whose column header is awaited, if any
    pub fn awaiting(&self) -> Option<BlockKind> {
        match self {
            ScanState::Idle => None,
            ScanState::AwaitingUvData => Some(BlockKind::Uv),
            ScanState::AwaitingFlData => Some(BlockKind::Fluorescence),
        }
    }

    /// Transition table. Arms are tried top to bottom and only the first
    /// match fires for a given line.
    fn step(self, line: &str) -> (ScanState, Event) {
        use ScanState::*;

        match self {
            _ if line.contains(UV_HEADER) => (AwaitingUvData, Event::Header(BlockKind::Uv)),
            AwaitingUvData if line.contains(COLUMN_HEADER) => {
                (Idle, Event::DataStart(BlockKind::Uv))
            }
            _ if line.contains(FL_HEADER) => (
                AwaitingFlData,
                Event::Header(BlockKind::Fluorescence),
            ),
            AwaitingFlData if line.contains(COLUMN_HEADER) => {
                (Idle, Event::DataStart(BlockKind::Fluorescence))
            }
            state if line.contains(POINT_COUNT_MARKER) => (state, Event::PointCount),
            state => (state, Event::Nothing),
        }
    }
}

/// Per-block findings of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BlockSlot {
    header_seen: bool,
    data_start_line: Option<usize>,
    point_count: Option<usize>,
}

/// Everything one pass over a report found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    uv: BlockSlot,
    fl: BlockSlot,
    /// Index of the last line visited, `None` for an empty report
    pub last_line: Option<usize>,
}

impl ScanSummary {
    fn slot(&self, kind: BlockKind) -> &BlockSlot {
        match kind {
            BlockKind::Uv => &self.uv,
            BlockKind::Fluorescence => &self.fl,
        }
    }

    fn slot_mut(&mut self, kind: BlockKind) -> &mut BlockSlot {
        match kind {
            BlockKind::Uv => &mut self.uv,
            BlockKind::Fluorescence => &mut self.fl,
        }
    }

    /// Select the block of the requested kind
    pub fn block(&self, kind: BlockKind) -> Result<BlockSpec, ParseError> {
        let slot = self.slot(kind);
        if !slot.header_seen {
            return Err(ParseError::BlockNotFound {
                kind,
                reason: MissingMarker::Header,
            });
        }
        let data_start_line = slot.data_start_line.ok_or(ParseError::BlockNotFound {
            kind,
            reason: MissingMarker::ColumnHeader,
        })?;
        let point_count = slot
            .point_count
            .ok_or(ParseError::MissingPointCount { kind })?;

        Ok(BlockSpec {
            kind,
            data_start_line,
            point_count,
        })
    }

    /// Whether a complete block of this kind was found
    pub fn has_block(&self, kind: BlockKind) -> bool {
        self.block(kind).is_ok()
    }
}

/// Single-pass scanner for detector blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLocator {
    mode: PointCountMode,
}

impl BlockLocator {
    /// Locator with per-block point counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how point counts are assigned to blocks
    pub fn with_point_count_mode(mut self, mode: PointCountMode) -> Self {
        self.mode = mode;
        self
    }

    /// Point count assignment in use
    pub fn point_count_mode(&self) -> PointCountMode {
        self.mode
    }

    /// Scan all lines once and record what was found for both detectors
    pub fn scan<S: AsRef<str>>(&self, lines: &[S]) -> Result<ScanSummary, ParseError> {
        let mut summary = ScanSummary::default();
        let mut state = ScanState::Idle;
        let mut shared_count: Option<usize> = None;

        for (line_num, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let (next, event) = state.step(line);

            match event {
                Event::Header(kind) => {
                    debug!("{} header at line {}", kind, line_num + 1);
                    let slot = summary.slot_mut(kind);
                    if slot.data_start_line.is_some() {
                        warn!(
                            "{} header repeated at line {}; the later block replaces the earlier one",
                            kind,
                            line_num + 1
                        );
                    }
                    slot.header_seen = true;
                    if self.mode == PointCountMode::PerBlock {
                        slot.point_count = None;
                    }
                }
                Event::DataStart(kind) => {
                    debug!("{} data header at line {}", kind, line_num + 1);
                    let slot = summary.slot_mut(kind);
                    slot.data_start_line = Some(line_num);
                    if self.mode == PointCountMode::Shared {
                        slot.point_count = shared_count;
                    }
                }
                Event::PointCount => {
                    let count = parse_point_count(line, line_num)?;
                    debug!("{} points declared at line {}", count, line_num + 1);
                    match self.mode {
                        PointCountMode::Shared => shared_count = Some(count),
                        PointCountMode::PerBlock => match state.awaiting() {
                            Some(kind) => summary.slot_mut(kind).point_count = Some(count),
                            None => debug!(
                                "Point count at line {} is outside a detector block",
                                line_num + 1
                            ),
                        },
                    }
                }
                Event::Nothing => {}
            }

            state = next;
            summary.last_line = Some(line_num);
        }

        Ok(summary)
    }

    /// Scan the lines and return the block of the requested kind
    pub fn locate<S: AsRef<str>>(
        &self,
        lines: &[S],
        kind: BlockKind,
    ) -> Result<BlockSpec, ParseError> {
        self.scan(lines)?.block(kind)
    }
}

/// Locate a block with per-block point counts
pub fn locate<S: AsRef<str>>(lines: &[S], kind: BlockKind) -> Result<BlockSpec, ParseError> {
    BlockLocator::new().locate(lines, kind)
}

fn parse_point_count(line: &str, line_num: usize) -> Result<usize, ParseError> {
    line.split_whitespace()
        .nth(POINT_COUNT_TOKEN)
        .and_then(|token| token.parse::<usize>().ok())
        .ok_or_else(|| ParseError::MalformedPointCount {
            line: line_num + 1,
            content: line.to_string(),
        })
}
