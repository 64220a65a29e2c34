use crate::barcodes::BarcodeTable;
use crate::error::{Error, Result};
use crate::header::{HeaderContext, HeaderTemplate};
use crate::reader::ReadSource;
use crate::record::ReadRecord;
use crate::seq::prefix;
use crate::transform::BarcodeTransform;

/// Outcome of looking up one barcode read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched {
        sample_id: String,
        barcode_seq: String,
        /// 0-based running count of matched pairs.
        index: u64,
    },
    Unmatched,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}

/// One step of demultiplexing: the left and right mates plus the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demuxed {
    pub left: ReadRecord,
    pub result: MatchResult,
    pub right: ReadRecord,
    /// The barcode read as it came off the stream.
    pub barcode: ReadRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemuxStats {
    pub matched: u64,
    pub skipped: u64,
}

impl DemuxStats {
    pub fn total(&self) -> u64 {
        self.matched + self.skipped
    }
}

/// Pulls left, barcode and right records in lockstep and matches the
/// barcode against a [`BarcodeTable`].
pub struct Demultiplexer<'t, L, B, R> {
    left: L,
    barcode: B,
    right: R,
    table: &'t BarcodeTable,
    transform: BarcodeTransform,
    relabel: Option<Relabel>,
    stats: DemuxStats,
    records: u64,
}

/// How matched pairs are renamed.
#[derive(Debug, Clone)]
pub struct Relabel {
    pub template: HeaderTemplate,
    pub label: Option<String>,
}

impl Relabel {
    pub fn new(template: HeaderTemplate, label: Option<String>) -> Self {
        Relabel { template, label }
    }

    fn apply(&self, result: &MatchResult, left: &mut ReadRecord, right: &mut ReadRecord) {
        if let MatchResult::Matched {
            sample_id,
            barcode_seq,
            index,
        } = result
        {
            let id = self.template.render(&HeaderContext {
                sample_id,
                index: *index,
                label: self.label.as_deref(),
                barcode_seq,
            });
            left.relabel(id.clone());
            right.relabel(id);
        }
    }
}

impl<'t, L, B, R> Demultiplexer<'t, L, B, R>
where
    L: ReadSource,
    B: ReadSource,
    R: ReadSource,
{
    pub fn new(
        left: L,
        barcode: B,
        right: R,
        table: &'t BarcodeTable,
        transform: BarcodeTransform,
    ) -> Self {
        Demultiplexer {
            left,
            barcode,
            right,
            table,
            transform,
            relabel: None,
            stats: DemuxStats::default(),
            records: 0,
        }
    }

    /// Rename both mates of every matched pair.
    pub fn with_relabel(mut self, relabel: Relabel) -> Self {
        self.relabel = Some(relabel);
        self
    }

    pub fn stats(&self) -> DemuxStats {
        self.stats
    }

    /// The string compared against the table for a raw barcode read:
    /// truncated to the longest known barcode, then preprocessed.
    pub fn barcode_key(&self, raw: &str) -> String {
        self.transform.apply(prefix(raw, self.table.max_len()))
    }

    /// Advance all three streams by one record.
    ///
    /// Returns `Ok(None)` only when every stream ends together; if some end
    /// before the others the run fails with `StreamLengthMismatch`.
    pub fn next_triplet(&mut self) -> Result<Option<Demuxed>> {
        let left = self.left.next_record()?;
        let barcode = self.barcode.next_record()?;
        let right = self.right.next_record()?;

        let (mut left, barcode, mut right) = match (left, barcode, right) {
            (Some(l), Some(b), Some(r)) => (l, b, r),
            (None, None, None) => return Ok(None),
            (l, b, r) => {
                let streams = [
                    (self.left.name(), l.is_some()),
                    (self.barcode.name(), b.is_some()),
                    (self.right.name(), r.is_some()),
                ];
                let join = |has_data: bool| {
                    streams
                        .iter()
                        .filter(|(_, some)| *some == has_data)
                        .map(|(name, _)| *name)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                return Err(Error::StreamLengthMismatch {
                    record: self.records,
                    exhausted: join(false),
                    remaining: join(true),
                });
            }
        };
        self.records += 1;

        let key = self.barcode_key(&barcode.sequence);
        let result = match self.table.lookup(&key) {
            Some(sample_id) => {
                let index = self.stats.matched;
                self.stats.matched += 1;
                MatchResult::Matched {
                    sample_id: sample_id.to_string(),
                    barcode_seq: key,
                    index,
                }
            }
            None => {
                self.stats.skipped += 1;
                MatchResult::Unmatched
            }
        };

        if let Some(relabel) = &self.relabel {
            relabel.apply(&result, &mut left, &mut right);
        }

        Ok(Some(Demuxed {
            left,
            result,
            right,
            barcode,
        }))
    }
}

impl<L, B, R> Iterator for Demultiplexer<'_, L, B, R>
where
    L: ReadSource,
    B: ReadSource,
    R: ReadSource,
{
    type Item = Result<Demuxed>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_triplet().transpose()
    }
}
