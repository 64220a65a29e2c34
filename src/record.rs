use std::fmt;
use std::io::Write;

use crate::error::{Error, Result};

/// Output serialization for [`ReadRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Fasta,
    #[default]
    Fastq,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Fasta => write!(f, "fasta"),
            OutputFormat::Fastq => write!(f, "fastq"),
        }
    }
}

/// A sequencing read, populated the same way whatever format it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub id: String,
    pub description: String,
    pub sequence: String,
    /// `None` for FASTA input.
    pub quality: Option<String>,
}

impl ReadRecord {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        sequence: impl Into<String>,
        quality: Option<String>,
    ) -> Self {
        ReadRecord {
            id: id.into(),
            description: description.into(),
            sequence: sequence.into(),
            quality,
        }
    }

    /// Split a FASTA/FASTQ header line (without `>`/`@`) at the first
    /// whitespace into id and description.
    pub fn from_header(header: &str, sequence: String, quality: Option<String>) -> Self {
        // 只去掉行尾换行, description 原样保留
        let header = header.trim_end_matches(['\n', '\r']);
        let (id, description) = header.split_once(char::is_whitespace).unwrap_or((header, ""));
        ReadRecord::new(id, description, sequence, quality)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }

    /// Give the record a new id, keeping the old `id:description` as the
    /// description.
    pub fn relabel(&mut self, new_id: String) {
        let old_id = std::mem::replace(&mut self.id, new_id);
        self.description = format!("{}:{}", old_id, self.description);
    }

    /// Render as text. FASTA drops the quality string.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let mut buffer = Vec::with_capacity(self.sequence.len() * 2 + self.id.len() + 8);
        self.write_to_bytes(&mut buffer, format)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    // 直接写入到buffer的方法
    pub fn write_to_bytes(&self, buffer: &mut Vec<u8>, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Fasta => {
                buffer.push(b'>');
                buffer.extend_from_slice(self.id.as_bytes());
                if !self.description.is_empty() {
                    buffer.push(b' ');
                    buffer.extend_from_slice(self.description.as_bytes());
                }
                buffer.push(b'\n');
                buffer.extend_from_slice(self.sequence.as_bytes());
                buffer.push(b'\n');
            }
            OutputFormat::Fastq => {
                let quality = self.quality.as_ref().ok_or_else(|| Error::MissingQuality {
                    id: self.id.clone(),
                })?;
                buffer.push(b'@');
                buffer.extend_from_slice(self.id.as_bytes());
                buffer.push(b':');
                buffer.extend_from_slice(self.description.as_bytes());
                buffer.push(b'\n');
                buffer.extend_from_slice(self.sequence.as_bytes());
                buffer.extend_from_slice(b"\n+\n");
                buffer.extend_from_slice(quality.as_bytes());
                buffer.push(b'\n');
            }
        }
        Ok(())
    }
}

/// Buffers rendered records and hands them to the sink in large writes.
pub struct RecordWriter<W: Write> {
    inner: W,
    format: OutputFormat,
    buffer: Vec<u8>,
}

const FLUSH_THRESHOLD: usize = 1 << 20;

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W, format: OutputFormat) -> Self {
        RecordWriter {
            inner,
            format,
            buffer: Vec::with_capacity(FLUSH_THRESHOLD),
        }
    }

    pub fn write(&mut self, record: &ReadRecord) -> Result<()> {
        record.write_to_bytes(&mut self.buffer, self.format)?;
        if self.buffer.len() >= FLUSH_THRESHOLD {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<()> {
        self.inner.write_all(&self.buffer)?;
        self.buffer.clear();
        Ok(())
    }

    /// Write out anything still buffered and return the sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush_buffer()?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}
