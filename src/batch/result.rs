//! Outer-join merge of extracted tables and CSV export.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::BatchError;
use crate::extractor::{Table, INDEX_COLUMN};

/// Retention volume usable as an ordered map key
#[derive(Debug, Clone, Copy)]
struct VolumeKey(f64);

impl VolumeKey {
    fn new(volume: f64) -> Self {
        // -0.0 + 0.0 == +0.0, so both zeros share a row
        Self(volume + 0.0)
    }
}

impl PartialEq for VolumeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VolumeKey {}

impl PartialOrd for VolumeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VolumeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Tables from many reports aligned on retention volume.
///
/// Columns are sorted by label and rows by retention volume. A volume present
/// in only some tables leaves empty cells in the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    labels: Vec<String>,
    rows: BTreeMap<VolumeKey, Vec<Option<f64>>>,
}

impl BatchResult {
    /// Merge tables column-wise.
    ///
    /// Fails if two tables share a label or a single table lists the same
    /// retention volume twice. Order of `tables` does not affect the result.
    pub fn from_tables<I>(tables: I) -> Result<Self, BatchError>
    where
        I: IntoIterator<Item = Table>,
    {
        let mut tables: Vec<Table> = tables.into_iter().collect();
        tables.sort_by(|a, b| a.label().cmp(b.label()));

        if let Some(pair) = tables.windows(2).find(|w| w[0].label() == w[1].label()) {
            return Err(BatchError::DuplicateLabel {
                label: pair[0].label().to_string(),
            });
        }

        let width = tables.len();
        let mut rows: BTreeMap<VolumeKey, Vec<Option<f64>>> = BTreeMap::new();

        for (column, table) in tables.iter().enumerate() {
            let mut seen = BTreeSet::new();
            for point in table.points() {
                let key = VolumeKey::new(point.retention_volume);
                if !seen.insert(key) {
                    return Err(BatchError::DuplicateRetentionVolume {
                        label: table.label().to_string(),
                        volume: point.retention_volume,
                    });
                }
                rows.entry(key).or_insert_with(|| vec![None; width])[column] =
                    Some(point.intensity);
            }
        }

        let labels = tables.iter().map(|t| t.label().to_string()).collect();
        Ok(Self { labels, rows })
    }

    /// Column labels in sorted order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct retention volumes
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Retention volumes in ascending order
    pub fn index(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.keys().map(|k| k.0)
    }

    /// Rows in ascending retention volume; cells follow [`labels`](Self::labels)
    pub fn rows(&self) -> impl Iterator<Item = (f64, &[Option<f64>])> + '_ {
        self.rows.iter().map(|(k, cells)| (k.0, cells.as_slice()))
    }

    /// Value of one cell
    pub fn get(&self, retention_volume: f64, label: &str) -> Option<f64> {
        let column = self.labels.iter().position(|l| l == label)?;
        self.rows
            .get(&VolumeKey::new(retention_volume))
            .and_then(|cells| cells[column])
    }

    /// Write the table as CSV: index column first, empty cells for gaps
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), BatchError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        let mut header = Vec::with_capacity(self.labels.len() + 1);
        header.push(INDEX_COLUMN);
        header.extend(self.labels.iter().map(String::as_str));
        csv_writer.write_record(&header)?;

        let mut record = Vec::with_capacity(self.labels.len() + 1);
        for (volume, cells) in self.rows() {
            record.clear();
            record.push(volume.to_string());
            record.extend(
                cells
                    .iter()
                    .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
            );
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write the CSV next to `path` and move it into place once complete
    pub fn write_to_path(&self, path: &Path) -> Result<(), BatchError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(dir)?;
        self.write_csv(&mut temp_file)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(path)?;
        Ok(())
    }
}
