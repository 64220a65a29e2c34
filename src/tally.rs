// tally.rs - 样本 × cluster 计数表

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use crate::classification::ClassificationRecord;
use crate::error::{Error, Result};

/// Sparse counts: sample → cluster → reads. Absent pairs count as zero.
pub type CountMatrix = BTreeMap<String, BTreeMap<String, u64>>;

/// Write-only accumulator for one aggregation run.
#[derive(Debug, Default)]
pub struct Aggregator {
    matrix: CountMatrix,
    records: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: ClassificationRecord) {
        *self
            .matrix
            .entry(record.sample)
            .or_default()
            .entry(record.cluster)
            .or_insert(0) += 1;
        self.records += 1;
    }

    pub fn snapshot(&self) -> &CountMatrix {
        &self.matrix
    }

    pub fn records(&self) -> u64 {
        self.records
    }
}

/// Every cluster label seen in any sample, sorted.
pub fn cluster_labels(matrix: &CountMatrix) -> BTreeSet<&str> {
    matrix
        .values()
        .flat_map(|clusters| clusters.keys().map(String::as_str))
        .collect()
}

/// Write as CSV: a header of sorted cluster labels (no corner cell), then
/// one `sample,count,...` row per sample in sorted order. Labels containing
/// commas or quotes are quoted.
pub fn write_csv<W: Write>(matrix: &CountMatrix, mut out: W) -> Result<()> {
    let columns = cluster_labels(matrix);
    if columns.is_empty() {
        // 空表: 只有一个空表头行
        out.write_all(b"\n")?;
        out.flush()?;
        return Ok(());
    }

    // 表头比数据行少一列
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(out);

    writer.write_record(&columns)?;
    for (sample, counts) in matrix {
        let row = std::iter::once(sample.clone()).chain(
            columns
                .iter()
                .map(|cluster| counts.get(*cluster).copied().unwrap_or(0).to_string()),
        );
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn render_csv(matrix: &CountMatrix) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(matrix, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
