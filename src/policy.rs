use std::path::PathBuf;

/// What the batch driver does when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the failure, record it in the report and keep going with the other files.
    Skip,
    /// Stop and return the first failure to the caller.
    Return,
}

/// How output files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputNaming {
    /// Same file name as the input (overwrites it when no output directory is set).
    SameName,
    /// `<stem>_output.fasta`.
    Suffixed,
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub naming: OutputNaming,
    /// Destination directory; `None` writes next to the inputs.
    pub output_dir: Option<PathBuf>,
    pub threads: usize,
    pub error_policy: ErrorPolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            naming: OutputNaming::SameName,
            output_dir: None,
            threads: 1,
            error_policy: ErrorPolicy::Skip,
        }
    }
}
