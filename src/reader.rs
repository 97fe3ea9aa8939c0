use crate::error::{FastaError, IoContext};
use crate::record::FastaRecord;
use crate::util::open_file;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::mem;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Source {
    Path(PathBuf),
    Reader,
}

/// Sync FASTA scanner, streaming. Holds at most one record at a time.
pub struct FastaScanner<R> {
    src: Source,
    rdr: R,
    line_num: u64,
    byte_pos: u64,
    // Header of the record being assembled; its body accumulates in `seq`.
    header: Option<String>,
    seq: String,
    orphans: u64,
    done: bool,
}

impl FastaScanner<BufReader<File>> {
    /// Open from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FastaError> {
        let path = path.as_ref();
        let f = open_file(path).map_err(|e| FastaError::io_err(e, IoContext::default()))?;
        let mut scanner = Self::from_bufread(BufReader::with_capacity(256 * 1024, f));
        scanner.src = Source::Path(path.to_path_buf());
        Ok(scanner)
    }
}

impl<R: BufRead> FastaScanner<R> {
    /// Wrap an arbitrary `BufRead` (stdin, in-memory bytes, etc.).
    pub fn from_bufread(reader: R) -> Self {
        Self {
            src: Source::Reader,
            rdr: reader,
            line_num: 0,
            byte_pos: 0,
            header: None,
            seq: String::with_capacity(1024),
            orphans: 0,
            done: false,
        }
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    /// Non-empty body lines seen before the first header. They are dropped.
    pub fn orphan_lines(&self) -> u64 {
        self.orphans
    }

    /// Iterator-style `next` record.
    pub fn next(&mut self) -> Option<Result<FastaRecord, FastaError>> {
        if self.done {
            return None;
        }
        match self.read_one() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => {
                self.done = true;
                if self.orphans > 0 {
                    log::debug!(
                        "{:?}: dropped {} sequence lines before the first header",
                        self.src,
                        self.orphans
                    );
                }
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }

    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
        }
        Ok(n)
    }

    fn read_one(&mut self) -> Result<Option<FastaRecord>, FastaError> {
        let mut line = String::with_capacity(256);
        loop {
            let n = self
                .read_line(&mut line)
                .map_err(|e| FastaError::io_err(e, self.ctx()))?;
            if n == 0 {
                // EOF: flush the held record, even with an empty body.
                return Ok(self.header.take().map(|header| FastaRecord {
                    header,
                    seq: mem::take(&mut self.seq),
                }));
            }

            let text = line.trim();
            if text.starts_with('>') {
                let prev = self.header.replace(text.to_string());
                let seq = mem::take(&mut self.seq);
                if let Some(header) = prev {
                    return Ok(Some(FastaRecord { header, seq }));
                }
            } else if self.header.is_some() {
                self.seq.push_str(text);
            } else if !text.is_empty() {
                self.orphans += 1;
            }
        }
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

impl<R: BufRead> Iterator for FastaScanner<R> {
    type Item = Result<FastaRecord, FastaError>;
    fn next(&mut self) -> Option<Self::Item> {
        FastaScanner::next(self)
    }
}
