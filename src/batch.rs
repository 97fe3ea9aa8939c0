//! Directory driver: find FASTA files, run [`transform`] once per file on a worker pool.
//!
//! Each file is an independent task owning its own input and output handles, so workers share
//! nothing but the read-only [`BatchOptions`].

use crate::error::BatchError;
use crate::policy::{BatchOptions, ErrorPolicy, OutputNaming};
use crate::transform::{TransformSummary, transform};
use crate::util::{looks_like_fasta, open_file};

use rayon::prelude::*;
use std::fs;
use std::io::{self, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub summary: TransformSummary,
}

/// Result of one directory run, in discovery order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<FileOutcome>,
    pub failed: Vec<(PathBuf, BatchError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Summaries of all processed files added up.
    pub fn totals(&self) -> TransformSummary {
        self.processed
            .iter()
            .fold(TransformSummary::default(), |mut acc, f| {
                acc.records += f.summary.records;
                acc.gaps_removed += f.summary.gaps_removed;
                acc.stop_codons_trimmed += f.summary.stop_codons_trimmed;
                acc.orphan_lines += f.summary.orphan_lines;
                acc
            })
    }
}

/// Regular files directly inside `dir` whose first non-blank line is a FASTA header, sorted.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let entries = fs::read_dir(dir).map_err(|e| BatchError::open(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BatchError::open(dir, e))?.path();
        // metadata() follows symlinks, so linked files count as files.
        if !fs::metadata(&path).is_ok_and(|m| m.is_file()) {
            continue;
        }
        match is_fasta(&path) {
            Ok(true) => files.push(path),
            Ok(false) => log::debug!("{}: not FASTA, skipped", path.display()),
            Err(e) => log::warn!("{}: unreadable, skipped: {e}", path.display()),
        }
    }
    files.sort();
    Ok(files)
}

fn is_fasta(path: &Path) -> io::Result<bool> {
    let rdr = BufReader::new(open_file(path)?);
    match looks_like_fasta(rdr) {
        // Binary content is simply not FASTA.
        Err(e) if e.kind() == ErrorKind::InvalidData => Ok(false),
        other => other,
    }
}

/// Where the cleaned copy of `input` goes under `opts`.
pub fn output_path_for(input: &Path, opts: &BatchOptions) -> PathBuf {
    let dir = opts
        .output_dir
        .as_deref()
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new(""));
    match opts.naming {
        OutputNaming::SameName => dir.join(input.file_name().unwrap_or(input.as_os_str())),
        OutputNaming::Suffixed => {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            dir.join(format!("{stem}_output.fasta"))
        }
    }
}

/// Transform one file. `None` writes to stdout; a path is replaced atomically once the whole
/// output is written, so `output == input` is safe and failures leave no partial file.
pub fn process_file(input: &Path, output: Option<&Path>) -> Result<TransformSummary, BatchError> {
    let f = open_file(input).map_err(|e| BatchError::open(input, e))?;
    let rdr = BufReader::with_capacity(256 * 1024, f);
    let wrap = |source| BatchError::Transform {
        path: input.to_path_buf(),
        source,
    };

    let Some(dest) = output else {
        let stdout = io::stdout();
        return transform(rdr, stdout.lock()).map_err(wrap);
    };

    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    // Taken from the open handle, so it describes the file actually read.
    let perms = rdr
        .get_ref()
        .metadata()
        .map_err(|e| BatchError::open(input, e))?
        .permissions();
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| BatchError::persist(dest, e))?;
    let summary = transform(rdr, &mut tmp).map_err(wrap)?;
    fs::set_permissions(tmp.path(), perms).map_err(|e| BatchError::persist(dest, e))?;
    tmp.persist(dest)
        .map_err(|e| BatchError::persist(dest, e.error))?;
    Ok(summary)
}

fn process_entry(input: &Path, opts: &BatchOptions) -> Result<FileOutcome, BatchError> {
    let output = output_path_for(input, opts);
    log::debug!("{} -> {}", input.display(), output.display());
    let summary = process_file(input, Some(&output))?;
    log::debug!(
        "{}: {} records, {} gaps removed, {} stop codons trimmed",
        input.display(),
        summary.records,
        summary.gaps_removed,
        summary.stop_codons_trimmed
    );
    Ok(FileOutcome {
        input: input.to_path_buf(),
        output,
        summary,
    })
}

/// Clean every FASTA file in `dir` with `opts.threads` workers.
pub fn run_batch(dir: &Path, opts: &BatchOptions) -> Result<BatchReport, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    if let Some(out) = &opts.output_dir {
        fs::create_dir_all(out).map_err(|e| BatchError::CreateDir {
            path: out.clone(),
            source: e,
        })?;
    }

    let files = discover(dir)?;
    let threads = opts.threads.max(1);
    log::info!(
        "{}: {} FASTA files, {} worker(s)",
        dir.display(),
        files.len(),
        threads
    );
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    let results: Vec<_> = pool.install(|| {
        files
            .par_iter()
            .map(|input| (input, process_entry(input, opts)))
            .collect()
    });

    // Every file has run by now; walking in discovery order makes the reported failure stable.
    let mut report = BatchReport::default();
    for (input, res) in results {
        match res {
            Ok(outcome) => report.processed.push(outcome),
            Err(err) if opts.error_policy == ErrorPolicy::Return => return Err(err),
            Err(err) => {
                log::warn!("skipping {}: {err}", input.display());
                report.failed.push((input.clone(), err));
            }
        }
    }
    Ok(report)
}
