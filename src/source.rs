//! Line source for log input
//!
//! Reads newline-delimited records, strips `\n` / `\r\n`, and decodes each
//! line as UTF-8 (lossily, so stray binary never aborts a run).

use crate::error::{HeatmapError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Read buffer for log files (64KB)
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Line iterator over any buffered reader
pub struct LineSource<R: BufRead> {
    reader: R,
    label: PathBuf,
    line_buffer: Vec<u8>,
    bytes_read: u64,
    len_hint: Option<u64>,
    failed: bool,
}

impl LineSource<BufReader<File>> {
    /// Open a log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let open_err = |source: std::io::Error| HeatmapError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_err)?;
        let len = file.metadata().map_err(open_err)?.len();

        let mut source = Self::new(BufReader::with_capacity(READ_BUFFER_SIZE, file), path);
        source.len_hint = Some(len);
        Ok(source)
    }
}

impl<R: BufRead> LineSource<R> {
    /// Wrap a reader; `label` names the input in error messages
    pub fn new(reader: R, label: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            label: label.into(),
            line_buffer: Vec::with_capacity(4096),
            bytes_read: 0,
            len_hint: None,
            failed: false,
        }
    }

    /// Name of the input
    pub fn label(&self) -> &Path {
        &self.label
    }

    /// Bytes consumed so far, including line terminators
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Total input size, when known
    pub fn len_hint(&self) -> Option<u64> {
        self.len_hint
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.line_buffer.clear();

        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => None,
            Ok(n) => {
                self.bytes_read += n as u64;

                let line = self.line_buffer.as_slice();
                let line = line.strip_suffix(b"\n").unwrap_or(line);
                let line = line.strip_suffix(b"\r").unwrap_or(line);

                Some(Ok(String::from_utf8_lossy(line).into_owned()))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(HeatmapError::Read {
                    path: self.label.clone(),
                    source: e,
                }))
            }
        }
    }
}
