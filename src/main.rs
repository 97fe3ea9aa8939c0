//! gapstop - remove alignment gaps and trailing stop codons from FASTA files.
//!
//! ## Usage
//!
//! ```bash
//! gapstop input.fasta > output.fasta          # single file to stdout
//! gapstop --loop alignments/                  # every FASTA file, rewritten in place
//! gapstop --loop --prefix alignments/         # writes <stem>_output.fasta next to each
//! gapstop --loop --output-dir clean/ --threads 8 alignments/
//! ```

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use gapstop::{BatchOptions, ErrorPolicy, OutputNaming, process_file, run_batch};

/// Strip gap characters and one trailing stop codon (TAA/TGA/TAG) from FASTA sequences.
///
/// Without --loop, INPUT is a single FASTA file and the result goes to stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input FASTA file, or directory with --loop
    input_path: PathBuf,

    /// Process every FASTA file in the INPUT directory
    #[arg(long = "loop")]
    batch: bool,

    /// Name outputs <stem>_output.fasta instead of reusing the input name (with --loop)
    #[arg(long)]
    prefix: bool,

    /// Directory for output files, created if missing (with --loop)
    #[arg(long = "output-dir", visible_alias = "output_dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of files processed in parallel (with --loop)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    threads: u16,

    /// Fail with the first failing file, in name order, instead of skipping it (with --loop)
    #[arg(long)]
    strict: bool,
}

impl Args {
    /// Flags that only mean something with `--loop`.
    fn loop_only_flags(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.prefix {
            set.push("--prefix");
        }
        if self.output_dir.is_some() {
            set.push("--output-dir");
        }
        if self.threads != 1 {
            set.push("--threads");
        }
        if self.strict {
            set.push("--strict");
        }
        set
    }

    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            naming: if self.prefix {
                OutputNaming::Suffixed
            } else {
                OutputNaming::SameName
            },
            output_dir: self.output_dir.clone(),
            threads: usize::from(self.threads),
            error_policy: if self.strict {
                ErrorPolicy::Return
            } else {
                ErrorPolicy::Skip
            },
        }
    }
}

fn run_single(args: &Args) -> Result<()> {
    let ignored = args.loop_only_flags();
    if !ignored.is_empty() {
        warn!("{} only apply with --loop; ignored", ignored.join(", "));
    }
    let summary = process_file(&args.input_path, None)?;
    if io::stdout().is_terminal() {
        info!(
            "done: {} records, {} gaps removed, {} stop codons trimmed",
            summary.records, summary.gaps_removed, summary.stop_codons_trimmed
        );
    }
    Ok(())
}

fn run_loop(args: &Args) -> Result<()> {
    let opts = args.batch_options();
    let report = run_batch(&args.input_path, &opts)
        .with_context(|| format!("batch run over {} failed", args.input_path.display()))?;

    let totals = report.totals();
    info!(
        "done: {} files, {} records, {} gaps removed, {} stop codons trimmed",
        report.processed.len(),
        totals.records,
        totals.gaps_removed,
        totals.stop_codons_trimmed
    );
    if !report.is_success() {
        bail!("{} file(s) failed", report.failed.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::debug!("{args:?}");

    if args.batch {
        run_loop(&args)
    } else {
        run_single(&args)
    }
}
