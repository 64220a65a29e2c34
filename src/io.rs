use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Open `path` for buffered reading, decompressing `.gz` files.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path).map_err(|e| Error::file_io(path, e))?;

    if is_gzip(path) {
        let decoder = MultiGzDecoder::new(file);
        // 增加缓冲区到2MB
        Ok(Box::new(BufReader::with_capacity(2 << 20, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(2 << 20, file)))
    }
}

enum Sink {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
}

/// An output file that only appears at its final path after [`commit`].
///
/// Data goes to a temporary file next to the destination; dropping an
/// uncommitted `OutputFile` removes the temporary file, so a failed run
/// never leaves a truncated output behind.
///
/// [`commit`]: OutputFile::commit
pub struct OutputFile {
    path: PathBuf,
    temp: NamedTempFile,
    sink: Sink,
}

impl OutputFile {
    pub fn create(path: &Path) -> Result<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|e| Error::file_io(path, e))?;
        let file = temp.reopen().map_err(|e| Error::file_io(path, e))?;

        let sink = if is_gzip(path) {
            // 更低压缩等级：level 1 速度快很多
            let encoder = GzEncoder::new(file, Compression::new(1));
            // 更大的 BufWriter，减少 sys‑call 次数
            Sink::Gzip(BufWriter::with_capacity(4 << 20, encoder))
        } else {
            Sink::Plain(BufWriter::with_capacity(4 << 20, file))
        };

        Ok(OutputFile {
            path: path.to_path_buf(),
            temp,
            sink,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Finish compression, sync and move the file into place.
    pub fn commit(self) -> Result<()> {
        let path = self.path;
        let finish = |sink: Sink| -> io::Result<()> {
            let file = match sink {
                Sink::Plain(writer) => writer.into_inner().map_err(|e| e.into_error())?,
                Sink::Gzip(writer) => writer.into_inner().map_err(|e| e.into_error())?.finish()?,
            };
            file.sync_all()
        };
        finish(self.sink).map_err(|e| Error::file_io(&path, e))?;

        self.temp
            .persist(&path)
            .map_err(|e| Error::file_io(&path, e.error))?;
        Ok(())
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
        }
    }
}
