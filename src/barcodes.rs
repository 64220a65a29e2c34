use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Location, Result};
use crate::io::open_reader;
use crate::seq::Normalization;

/// One `name,sequence` row after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeEntry {
    pub sequence: String,
    pub sample_id: String,
}

/// Barcode → sample lookup, built once per run.
///
/// Sequences are stored in their normalized form; incoming reads are only
/// truncated and preprocessed before lookup, never reversed or complemented.
#[derive(Debug, Clone, Default)]
pub struct BarcodeTable {
    samples: HashMap<String, String>,
    max_len: usize,
    normalization: Normalization,
    duplicates: Vec<BarcodeEntry>,
}

impl BarcodeTable {
    /// Read header-less `name,sequence` rows from `reader`.
    ///
    /// Fields may be quoted; blank lines are skipped and whitespace around
    /// fields is ignored. A row with fewer than two fields fails with a format
    /// error naming `source` and the line. When two rows normalize to the same
    /// sequence the later row wins and the overwritten entry is kept in
    /// [`BarcodeTable::duplicates`].
    pub fn load<R: Read>(reader: R, source: &str, normalization: Normalization) -> Result<Self> {
        let mut table = BarcodeTable {
            normalization,
            ..Default::default()
        };

        let mut rows = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for row in rows.records() {
            let row = row.map_err(|e| csv_error(source, e))?;
            let line = row.position().map_or(0, |p| p.line() as usize);
            match (row.get(0), row.get(1)) {
                (Some(name), Some(sequence)) => table.insert(name, sequence),
                _ => {
                    return Err(Error::format(
                        Location::new(source, line),
                        format!("expected `name,sequence`, found {:?}", row.as_slice()),
                    ))
                }
            }
        }

        debug!(
            "loaded {} barcodes from {} (longest {} bp)",
            table.len(),
            source,
            table.max_len
        );
        Ok(table)
    }

    pub fn from_path(path: &Path, normalization: Normalization) -> Result<Self> {
        let reader = open_reader(path)?;
        Self::load(reader, &path.display().to_string(), normalization)
            .map_err(|e| match e {
                Error::Io(source) => Error::file_io(path, source),
                other => other,
            })
    }

    fn insert(&mut self, sample_id: &str, raw_sequence: &str) {
        let sequence = self.normalization.apply(raw_sequence);
        self.max_len = self.max_len.max(sequence.chars().count());

        if let Some(previous) = self.samples.insert(sequence.clone(), sample_id.to_string()) {
            warn!(
                "barcode {} maps to both {} and {}; keeping {}",
                sequence, previous, sample_id, sample_id
            );
            self.duplicates.push(BarcodeEntry {
                sequence,
                sample_id: previous,
            });
        }
    }

    pub fn lookup(&self, sequence: &str) -> Option<&str> {
        self.samples.get(sequence).map(String::as_str)
    }

    /// Length of the longest stored barcode; reads are truncated to this.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Entries displaced by a later row with the same normalized sequence.
    pub fn duplicates(&self) -> &[BarcodeEntry] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn csv_error(source: &str, err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line() as usize);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        kind => Error::format(Location::new(source, line), format!("{kind:?}")),
    }
}
