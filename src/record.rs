use std::io::{self, Write};

/// Alignment gap symbol.
pub const GAP: char = '-';

/// Standard-code stop codons, matched case-sensitively.
pub const STOP_CODONS: [&[u8; 3]; 3] = [b"TAA", b"TGA", b"TAG"];

/// One FASTA entry. `header` keeps its leading `>`; `seq` is the body lines joined as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub seq: String,
}

/// What cleaning changed in one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edits {
    pub gaps: usize,
    pub stop_codon: bool,
}

impl FastaRecord {
    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Drop every gap, then at most one trailing stop codon. Order matters: a codon split by
    /// gaps is only visible after they are gone.
    pub fn clean(&mut self) -> Edits {
        let gaps = strip_gaps(&mut self.seq);
        let stop_codon = trim_stop_codon(&mut self.seq);
        Edits { gaps, stop_codon }
    }

    /// Two lines: header, then the whole sequence unwrapped.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(self.header.as_bytes())?;
        w.write_all(b"\n")?;
        w.write_all(self.seq.as_bytes())?;
        w.write_all(b"\n")
    }
}

/// Remove gaps in place, returning how many went.
fn strip_gaps(seq: &mut String) -> usize {
    let before = seq.len();
    seq.retain(|c| c != GAP);
    before - seq.len()
}

pub fn remove_gaps(seq: &str) -> String {
    let mut seq = seq.to_owned();
    strip_gaps(&mut seq);
    seq
}

/// Truncate one stop codon off the end of `seq`. Returns whether it did.
/// Shorter than three characters never matches.
pub fn trim_stop_codon(seq: &mut String) -> bool {
    let bytes = seq.as_bytes();
    let Some(start) = bytes.len().checked_sub(3) else {
        return false;
    };
    // All codon bytes are ASCII, so a match puts `start` on a char boundary.
    if STOP_CODONS.iter().any(|codon| &bytes[start..] == codon.as_slice()) {
        seq.truncate(start);
        true
    } else {
        false
    }
}

/// Gap removal followed by single stop-codon trimming.
pub fn clean_sequence(raw: &str) -> String {
    let mut rec = FastaRecord {
        header: String::new(),
        seq: raw.to_owned(),
    };
    rec.clean();
    rec.seq
}
