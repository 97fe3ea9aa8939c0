use crate::error::FastaError;
use crate::reader::FastaScanner;
use crate::record::Edits;

use std::io::{BufRead, BufWriter, Write};

/// Per-stream totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub records: u64,
    pub gaps_removed: u64,
    pub stop_codons_trimmed: u64,
    /// Body lines before the first header; dropped, not an error.
    pub orphan_lines: u64,
}

impl TransformSummary {
    pub(crate) fn add(&mut self, edits: Edits) {
        self.records += 1;
        self.gaps_removed += edits.gaps as u64;
        self.stop_codons_trimmed += u64::from(edits.stop_codon);
    }
}

/// Read FASTA from `input` to the end, write every record cleaned to `output`, and flush.
///
/// Records are emitted as soon as the following header (or EOF) closes them, so memory holds
/// one record at a time. Input without any header produces no output and no error.
pub fn transform<R: BufRead, W: Write>(input: R, output: W) -> Result<TransformSummary, FastaError> {
    let mut scanner = FastaScanner::from_bufread(input);
    let mut out = BufWriter::with_capacity(256 * 1024, output);
    let mut summary = TransformSummary::default();

    while let Some(rec) = scanner.next() {
        let mut rec = rec?;
        let edits = rec.clean();
        rec.write_to(&mut out)
            .map_err(|e| FastaError::write_err(e, summary.records))?;
        summary.add(edits);
    }
    out.flush()
        .map_err(|e| FastaError::write_err(e, summary.records))?;

    summary.orphan_lines = scanner.orphan_lines();
    Ok(summary)
}
