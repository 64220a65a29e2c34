// lib.rs - 库函数
//
// Paired-end demultiplexing by barcode read, plus per-sample cluster tallies.

pub mod barcodes;
pub mod classification;
pub mod demux;
pub mod error;
pub mod header;
pub mod io;
pub mod pipeline;
pub mod reader;
pub mod record;
pub mod seq;
pub mod tally;
pub mod transform;

pub use barcodes::{BarcodeEntry, BarcodeTable};
pub use classification::{parse_line, ClassificationParser, ClassificationRecord, UNCLASSIFIED};
pub use demux::{DemuxStats, Demultiplexer, Demuxed, MatchResult, Relabel};
pub use error::{Error, Location, Result};
pub use header::{format_header, HeaderContext, HeaderTemplate};
pub use reader::{open_source, FastaSource, FastqSource, InputFormat, QseqSource, ReadSource, VecSource};
pub use record::{OutputFormat, ReadRecord, RecordWriter};
pub use seq::{normalize, reverse_complement, Normalization};
pub use tally::{render_csv, write_csv, Aggregator, CountMatrix};
pub use transform::BarcodeTransform;
