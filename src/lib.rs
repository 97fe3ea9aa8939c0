//! Strip alignment gaps and trailing stop codons from FASTA nucleotide sequences.
//!
//! - Streaming, record-by-record (one record in memory at a time).
//! - Gaps (`-`) are removed from the joined sequence, then a single trailing
//!   `TAA`/`TGA`/`TAG` is trimmed.
//! - Lenient: body lines before the first header are dropped, short and empty sequences pass.
//! - Directory mode with a rayon worker pool and atomic output replacement (`batch`).
//! - Optional async API behind `async` feature.

pub mod batch;
pub mod error;
pub mod policy;
pub mod reader;
pub mod record;
pub mod transform;
mod util;

#[cfg(feature = "async")]
pub mod async_reader;

pub use crate::batch::{BatchReport, FileOutcome, output_path_for, process_file, run_batch};
pub use crate::error::{BatchError, FastaError, IoContext};
pub use crate::policy::{BatchOptions, ErrorPolicy, OutputNaming};
pub use crate::reader::{FastaScanner, Source};
pub use crate::record::{
    Edits, FastaRecord, GAP, STOP_CODONS, clean_sequence, remove_gaps, trim_stop_codon,
};
pub use crate::transform::{TransformSummary, transform};
pub use crate::util::looks_like_fasta;

#[cfg(feature = "async")]
pub use crate::async_reader::{AsyncFastaScanner, transform_async};
