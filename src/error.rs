use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Conditions that abort a seed run.
///
/// Per-hospital geocoding misses are not errors; the record keeps `NULL`
/// coordinates and the run continues.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{key} not found in {}", .path.display())]
    MissingConfig { key: String, path: PathBuf },

    #[error("No {what} rows found in {}", .path.display())]
    EmptyInput { what: &'static str, path: PathBuf },

    #[error("Could not decode file: {} (tried {tried})", .path.display())]
    Decode { path: PathBuf, tried: String },

    #[error("SQL executor `{program}` exited with {status}: {stderr}")]
    ExecutionFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}
