//! Buffered line source over files and readers.

use crate::domain::error::CancelCheckError;
use crate::ports::line_source_port::LineSource;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Reads `\n`-terminated lines, stripping a trailing `\r`. Invalid UTF-8 is
/// replaced rather than treated as a read failure.
pub struct ReaderLineSource<R> {
    reader: R,
    name: String,
    buf: Vec<u8>,
    failed: bool,
}

impl<R: BufRead> ReaderLineSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            buf: Vec::new(),
            failed: false,
        }
    }
}

impl ReaderLineSource<BufReader<File>> {
    /// Opens `path` for reading. Failure to open is a source error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CancelCheckError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CancelCheckError::Source {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: Read> ReaderLineSource<BufReader<R>> {
    pub fn from_reader(reader: R, name: impl Into<String>) -> Self {
        Self::new(BufReader::new(reader), name)
    }
}

impl<R: BufRead> LineSource for ReaderLineSource<R> {
    fn next_line(&mut self) -> Option<Result<String, CancelCheckError>> {
        if self.failed {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let mut end = self.buf.len();
                if self.buf[..end].ends_with(b"\n") {
                    end -= 1;
                }
                if self.buf[..end].ends_with(b"\r") {
                    end -= 1;
                }
                Some(Ok(String::from_utf8_lossy(&self.buf[..end]).into_owned()))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(CancelCheckError::Source {
                    path: self.name.clone(),
                    reason: e.to_string(),
                }))
            }
        }
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

pub type FileLineSource = ReaderLineSource<BufReader<File>>;
