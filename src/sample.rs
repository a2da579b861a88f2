//! Sample identification from report file names.
//!
//! LabSolutions batch exports are usually named after the vial position
//! (`01.txt`, `02.txt`, ...). The sample number becomes part of the column
//! label, so alternative naming schemes plug in through [`SampleIdentifier`]
//! without touching the parser.

use std::fmt;
use std::path::Path;

use crate::error::ParseError;

/// A sample number recovered from a report file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleId(pub u32);

impl fmt::Display for SampleId {
    /// Zero-padded to two digits, as used in column labels
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Strategy for deriving a [`SampleId`] from a report path
pub trait SampleIdentifier: Send + Sync {
    /// Derive the sample number, or fail with [`ParseError::InvalidFilename`]
    fn identify(&self, path: &Path) -> Result<SampleId, ParseError>;
}

/// Parses the whole file stem as an unsigned integer (`07.txt` -> 7)
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericStem;

impl SampleIdentifier for NumericStem {
    fn identify(&self, path: &Path) -> Result<SampleId, ParseError> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.trim().parse::<u32>().ok())
            .map(SampleId)
            .ok_or_else(|| ParseError::InvalidFilename {
                path: path.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_stem() {
        let id = NumericStem.identify(Path::new("/data/run/07.txt")).unwrap();
        assert_eq!(id, SampleId(7));
        assert_eq!(id.to_string(), "07");
    }

    #[test]
    fn test_three_digit_sample_is_not_truncated() {
        let id = NumericStem.identify(Path::new("123.txt")).unwrap();
        assert_eq!(id.to_string(), "123");
    }

    #[test]
    fn test_non_numeric_stem_rejected() {
        let err = NumericStem.identify(Path::new("sample_7.txt")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFilename { .. }));

        let err = NumericStem.identify(Path::new("-3.txt")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFilename { .. }));
    }
}
