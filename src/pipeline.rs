// pipeline.rs - demux / tally 两条流程

use std::io::BufRead;
use std::path::PathBuf;

use log::{debug, info};

use crate::barcodes::BarcodeTable;
use crate::classification::ClassificationParser;
use crate::demux::{DemuxStats, Demultiplexer, MatchResult, Relabel};
use crate::error::{Error, Location, Result};
use crate::header::HeaderTemplate;
use crate::io::{open_reader, OutputFile};
use crate::reader::{open_source, InputFormat};
use crate::record::{OutputFormat, RecordWriter};
use crate::seq::Normalization;
use crate::tally::{cluster_labels, write_csv, Aggregator};
use crate::transform::BarcodeTransform;

pub const DEFAULT_ID_FORMAT: &str = "{sampleId}_{index}";
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

#[derive(Debug, Clone)]
pub struct DemuxConfig {
    pub barcodes: PathBuf,
    pub left: PathBuf,
    pub barcode_reads: PathBuf,
    pub right: PathBuf,
    pub output: PathBuf,
    /// When set, right mates go here instead of being interleaved.
    pub right_output: Option<PathBuf>,
    /// When set, unmatched pairs are written here unchanged.
    pub unmatched_output: Option<PathBuf>,
    pub input_format: InputFormat,
    pub output_format: OutputFormat,
    pub id_format: String,
    pub label: Option<String>,
    pub normalization: Normalization,
    pub transform: BarcodeTransform,
    /// Log progress every this many matched pairs; 0 disables it.
    pub progress_interval: u64,
}

impl DemuxConfig {
    pub fn new(
        barcodes: PathBuf,
        left: PathBuf,
        barcode_reads: PathBuf,
        right: PathBuf,
        output: PathBuf,
    ) -> Self {
        DemuxConfig {
            barcodes,
            left,
            barcode_reads,
            right,
            output,
            right_output: None,
            unmatched_output: None,
            input_format: InputFormat::default(),
            output_format: OutputFormat::default(),
            id_format: DEFAULT_ID_FORMAT.to_string(),
            label: None,
            normalization: Normalization::default(),
            transform: BarcodeTransform::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Demultiplex the three read files into the configured outputs.
///
/// Outputs are only moved into place once every record has been processed.
pub fn run_demux(config: &DemuxConfig) -> Result<DemuxStats> {
    let template = HeaderTemplate::parse(&config.id_format)?;
    let table = BarcodeTable::from_path(&config.barcodes, config.normalization)?;
    if table.is_empty() {
        return Err(Error::format(
            Location::new(config.barcodes.display().to_string(), 0),
            "barcode file contains no barcodes",
        ));
    }
    info!(
        "Loaded {} barcodes (longest {} bp, reverse={}, complement={}, transform={})",
        table.len(),
        table.max_len(),
        config.normalization.reverse,
        config.normalization.complement,
        config.transform
    );

    let left = open_source(&config.left, config.input_format)?;
    let barcodes = open_source(&config.barcode_reads, config.input_format)?;
    let right = open_source(&config.right, config.input_format)?;
    let mut demux = Demultiplexer::new(left, barcodes, right, &table, config.transform)
        .with_relabel(Relabel::new(template, config.label.clone()));

    let mut out = RecordWriter::new(OutputFile::create(&config.output)?, config.output_format);
    let mut right_out = match &config.right_output {
        Some(path) => Some(RecordWriter::new(OutputFile::create(path)?, config.output_format)),
        None => None,
    };
    let mut unmatched_out = match &config.unmatched_output {
        Some(path) => Some(RecordWriter::new(OutputFile::create(path)?, config.output_format)),
        None => None,
    };

    while let Some(pair) = demux.next_triplet()? {
        match pair.result {
            MatchResult::Matched { .. } => {
                out.write(&pair.left)?;
                match right_out.as_mut() {
                    Some(w) => w.write(&pair.right)?,
                    None => out.write(&pair.right)?,
                }
                let matched = demux.stats().matched;
                if config.progress_interval > 0 && matched % config.progress_interval == 0 {
                    info!("Matched {} read pairs...", matched);
                }
            }
            MatchResult::Unmatched => {
                if let Some(w) = unmatched_out.as_mut() {
                    w.write(&pair.left)?;
                    w.write(&pair.right)?;
                }
            }
        }
    }

    out.into_inner()?.commit()?;
    if let Some(w) = right_out {
        w.into_inner()?.commit()?;
    }
    if let Some(w) = unmatched_out {
        w.into_inner()?.commit()?;
    }

    let stats = demux.stats();
    info!(
        "Finished: {} matched, {} skipped, {} total read pairs",
        stats.matched,
        stats.skipped,
        stats.total()
    );
    Ok(stats)
}

#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallySummary {
    pub records: u64,
    pub samples: usize,
    pub clusters: usize,
}

/// Fold a classification file into a sample × cluster CSV.
pub fn run_tally(config: &TallyConfig) -> Result<TallySummary> {
    let reader = open_reader(&config.input)?;
    let mut parser = ClassificationParser::new(config.input.display().to_string());
    let mut aggregator = Aggregator::new();

    for line in reader.lines() {
        let line = line.map_err(|e| Error::file_io(&config.input, e))?;
        if let Some(record) = parser.parse(&line)? {
            aggregator.add(record);
        }
    }
    debug!("parsed {} lines from {}", parser.lines_seen(), config.input.display());

    let matrix = aggregator.snapshot();
    let summary = TallySummary {
        records: aggregator.records(),
        samples: matrix.len(),
        clusters: cluster_labels(matrix).len(),
    };

    let mut out = OutputFile::create(&config.output)?;
    write_csv(matrix, &mut out).map_err(|e| match e {
        Error::Io(source) => Error::file_io(&config.output, source),
        other => other,
    })?;
    out.commit()?;

    info!(
        "Tallied {} records into {} samples x {} clusters",
        summary.records, summary.samples, summary.clusters
    );
    Ok(summary)
}
