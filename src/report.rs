//! In-memory view of one LabSolutions ASCII report.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ParseError;

/// An ordered sequence of text lines together with the path they came from
#[derive(Debug, Clone)]
pub struct ReportFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl ReportFile {
    /// Read a report from disk.
    ///
    /// The file is read to completion and closed before this returns.
    /// Bytes that are not valid UTF-8 (vendor exports occasionally carry
    /// Latin-1 unit symbols) are replaced rather than rejected; none of the
    /// markers or numeric rows depend on them.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ParseError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self::from_text(path, &text))
    }

    /// Build a report from text already in memory
    pub fn from_text<P: Into<PathBuf>>(path: P, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    /// Path the report was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All lines, without line terminators
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the report has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
