#![cfg(feature = "async")]

use crate::error::{FastaError, IoContext};
use crate::record::FastaRecord;
use crate::transform::TransformSummary;

use std::mem;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

#[derive(Debug)]
pub enum AsyncSource {
    Path(PathBuf),
    Reader,
}

/// Async FASTA scanner, streaming.
pub struct AsyncFastaScanner<R> {
    src: AsyncSource,
    rdr: R,
    line_num: u64,
    byte_pos: u64,
    header: Option<String>,
    seq: String,
    orphans: u64,
    done: bool,
}

impl AsyncFastaScanner<BufReader<File>> {
    /// Open async from path.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FastaError> {
        let path = path.as_ref().to_path_buf();
        let f = File::open(&path)
            .await
            .map_err(|e| FastaError::io_err(e, IoContext::default()))?;
        let mut scanner = Self::from_async_bufread(BufReader::with_capacity(256 * 1024, f));
        scanner.src = AsyncSource::Path(path);
        Ok(scanner)
    }
}

impl<R: AsyncBufRead + Unpin> AsyncFastaScanner<R> {
    /// Wrap any async `AsyncBufRead`.
    pub fn from_async_bufread(reader: R) -> Self {
        Self {
            src: AsyncSource::Reader,
            rdr: reader,
            line_num: 0,
            byte_pos: 0,
            header: None,
            seq: String::with_capacity(1024),
            orphans: 0,
            done: false,
        }
    }

    pub fn source(&self) -> &AsyncSource {
        &self.src
    }

    pub fn orphan_lines(&self) -> u64 {
        self.orphans
    }

    /// Fetch next record (async).
    pub async fn next_record(&mut self) -> Option<Result<FastaRecord, FastaError>> {
        if self.done {
            return None;
        }
        match self.read_one().await {
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

    async fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf).await?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
        }
        Ok(n)
    }

    async fn read_one(&mut self) -> Result<Option<FastaRecord>, FastaError> {
        let mut line = String::with_capacity(256);
        loop {
            let n = self
                .read_line(&mut line)
                .await
                .map_err(|e| FastaError::io_err(e, self.ctx()))?;
            if n == 0 {
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

/// Async counterpart of [`transform()`](crate::transform()); same output byte for byte.
pub async fn transform_async<R, W>(input: R, output: W) -> Result<TransformSummary, FastaError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut scanner = AsyncFastaScanner::from_async_bufread(input);
    let mut out = BufWriter::with_capacity(256 * 1024, output);
    let mut summary = TransformSummary::default();

    while let Some(rec) = scanner.next_record().await {
        let mut rec = rec?;
        let edits = rec.clean();
        let mut buf = Vec::with_capacity(rec.header.len() + rec.seq.len() + 2);
        rec.write_to(&mut buf)
            .map_err(|e| FastaError::write_err(e, summary.records))?;
        out.write_all(&buf)
            .await
            .map_err(|e| FastaError::write_err(e, summary.records))?;
        summary.add(edits);
    }
    out.flush()
        .await
        .map_err(|e| FastaError::write_err(e, summary.records))?;

    summary.orphan_lines = scanner.orphan_lines();
    Ok(summary)
}
