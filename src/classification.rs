// classification.rs - 解析聚类结果 (.uc)
//
// Tab separated; field 0 is the record type, field 8 the query label
// (`<sample>.<rest> ...`), field 9 the target cluster of `H` records.

use crate::error::{Error, Location, Result};

/// Record type flag marking a hit against a cluster.
pub const HIT_FLAG: &str = "H";

/// Cluster label recorded for every non-hit record.
pub const UNCLASSIFIED: &str = "unclassified_reads";

const MIN_FIELDS: usize = 9;

/// `(sample, cluster)` extracted from one line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassificationRecord {
    pub sample: String,
    pub cluster: String,
}

impl ClassificationRecord {
    pub fn new(sample: impl Into<String>, cluster: impl Into<String>) -> Self {
        ClassificationRecord {
            sample: sample.into(),
            cluster: cluster.into(),
        }
    }
}

/// Parse one line. Lines with fewer than nine fields are a format error;
/// a hit without a cluster field is one too.
pub fn parse_line(line: &str) -> Result<ClassificationRecord> {
    let line = line.trim_end_matches(['\n', '\r']);
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_FIELDS {
        return Err(Error::format(
            Location::default(),
            format!(
                "expected at least {MIN_FIELDS} tab-separated fields, found {}",
                fields.len()
            ),
        ));
    }

    let query = fields[8].split_whitespace().next().unwrap_or_default();
    let sample = query.split('.').next().unwrap_or_default();
    if sample.is_empty() {
        return Err(Error::format(Location::default(), "empty query label in field 8"));
    }

    let cluster = if fields[0] == HIT_FLAG {
        match fields.get(9).map(|c| c.trim()) {
            Some(cluster) if !cluster.is_empty() => cluster,
            _ => return Err(Error::format(Location::default(), "hit record has no cluster label")),
        }
    } else {
        UNCLASSIFIED
    };

    Ok(ClassificationRecord::new(sample, cluster))
}

/// Parses lines while tracking the input name and line number for errors.
pub struct ClassificationParser {
    source: String,
    line_no: usize,
}

impl ClassificationParser {
    pub fn new(source: impl Into<String>) -> Self {
        ClassificationParser {
            source: source.into(),
            line_no: 0,
        }
    }

    /// Parse the next line; blank lines yield `None`.
    pub fn parse(&mut self, line: &str) -> Result<Option<ClassificationRecord>> {
        self.line_no += 1;
        if line.trim().is_empty() {
            return Ok(None);
        }
        parse_line(line)
            .map(Some)
            .map_err(|e| e.located(&self.source, self.line_no))
    }

    pub fn lines_seen(&self) -> usize {
        self.line_no
    }
}
