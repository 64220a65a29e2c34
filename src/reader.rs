// reader.rs - 输入读取, 每次拉取一条记录

use std::io::{self, BufRead, Read};
use std::path::Path;

use fastq::{Record as _, RecordRefIter};

use crate::error::{Error, Location, Result};
use crate::io::open_reader;
use crate::record::ReadRecord;

/// A stream of [`ReadRecord`]s.
pub trait ReadSource {
    /// Next record, or `None` once the stream is exhausted.
    fn next_record(&mut self) -> Result<Option<ReadRecord>>;

    /// Label used in error messages.
    fn name(&self) -> &str;
}

impl<S: ReadSource + ?Sized> ReadSource for Box<S> {
    fn next_record(&mut self) -> Result<Option<ReadRecord>> {
        (**self).next_record()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputFormat {
    #[default]
    Fastq,
    Fasta,
    Qseq,
}

/// Open `path` (optionally gzipped) as a source of the given format.
pub fn open_source(path: &Path, format: InputFormat) -> Result<Box<dyn ReadSource>> {
    let reader = open_reader(path)?;
    let name = path.display().to_string();
    Ok(match format {
        InputFormat::Fastq => Box::new(FastqSource::new(reader, name)),
        InputFormat::Fasta => Box::new(FastaSource::new(reader, name)),
        InputFormat::Qseq => Box::new(QseqSource::new(reader, name)),
    })
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn malformed(name: &str, record: u64, err: impl std::fmt::Display) -> Error {
    Error::format(Location::new(name, record as usize), format!("malformed record: {err}"))
}

pub struct FastqSource<R: Read> {
    records: RecordRefIter<R>,
    name: String,
    count: u64,
    done: bool,
}

impl<R: Read> FastqSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        FastqSource {
            records: fastq::Parser::new(reader).ref_iter(),
            name: name.into(),
            count: 0,
            done: false,
        }
    }
}

impl<R: Read> ReadSource for FastqSource<R> {
    fn next_record(&mut self) -> Result<Option<ReadRecord>> {
        if self.done {
            return Ok(None);
        }
        let position = self.count + 1;
        self.records.advance().map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                malformed(&self.name, position, e)
            }
            _ => Error::file_io(&self.name, e),
        })?;

        match self.records.get() {
            None => {
                self.done = true;
                Ok(None)
            }
            Some(rec) => {
                self.count = position;
                let head = rec.head();
                let head = head.strip_prefix(b"@").unwrap_or(head);
                Ok(Some(ReadRecord::from_header(
                    &String::from_utf8_lossy(head),
                    text(rec.seq()),
                    Some(text(rec.qual())),
                )))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub struct FastaSource<R: Read> {
    reader: seq_io::fasta::Reader<R>,
    name: String,
    count: u64,
}

impl<R: Read> FastaSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        FastaSource {
            reader: seq_io::fasta::Reader::new(reader),
            name: name.into(),
            count: 0,
        }
    }
}

impl<R: Read> ReadSource for FastaSource<R> {
    fn next_record(&mut self) -> Result<Option<ReadRecord>> {
        use seq_io::fasta::Record as _;

        let position = self.count + 1;
        match self.reader.next() {
            None => Ok(None),
            Some(Err(e)) => Err(malformed(&self.name, position, e)),
            Some(Ok(rec)) => {
                self.count = position;
                let sequence = text(&rec.full_seq());
                Ok(Some(ReadRecord::from_header(
                    &String::from_utf8_lossy(rec.head()),
                    sequence,
                    None,
                )))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Illumina qseq: tab-separated, one read per line.
///
/// Fields 0..7 joined by `:` become the record id (and description), field 8
/// is the sequence with `.` no-calls as `N`, field 9 the quality string.
pub struct QseqSource<R: BufRead> {
    reader: R,
    name: String,
    line: String,
    line_no: usize,
}

impl<R: BufRead> QseqSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        QseqSource {
            reader,
            name: name.into(),
            line: String::new(),
            line_no: 0,
        }
    }
}

/// Parse one qseq line.
pub fn parse_qseq_line(line: &str) -> Result<ReadRecord> {
    let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
    if fields.len() < 10 {
        return Err(Error::format(
            Location::default(),
            format!("qseq line has {} fields, expected at least 10", fields.len()),
        ));
    }
    let description = fields[..7].join(":");
    let sequence = fields[8].replace('.', "N");
    Ok(ReadRecord::new(
        description.clone(),
        description,
        sequence,
        Some(fields[9].to_string()),
    ))
}

impl<R: BufRead> ReadSource for QseqSource<R> {
    fn next_record(&mut self) -> Result<Option<ReadRecord>> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .map_err(|e| Error::file_io(&self.name, e))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if self.line.trim().is_empty() {
                continue;
            }
            return parse_qseq_line(&self.line)
                .map(Some)
                .map_err(|e| e.located(&self.name, self.line_no));
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory source, handy for feeding already-parsed records.
pub struct VecSource {
    records: std::vec::IntoIter<ReadRecord>,
    name: String,
}

impl VecSource {
    pub fn new(records: Vec<ReadRecord>, name: impl Into<String>) -> Self {
        VecSource {
            records: records.into_iter(),
            name: name.into(),
        }
    }
}

impl ReadSource for VecSource {
    fn next_record(&mut self) -> Result<Option<ReadRecord>> {
        Ok(self.records.next())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
