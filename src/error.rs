use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to scan {}: {source}", dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not start converter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("converter `{program}` exited with {status} on {}", input.display())]
    Failed {
        program: String,
        input: PathBuf,
        status: ExitStatus,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Expected {expected} components in text expression at measure {measure}, got {got}. Raw content: {raw}")]
    ComponentCount {
        measure: u32,
        expected: usize,
        got: usize,
        raw: String,
    },

    #[error("At measure {measure}, expected component at index {index} to start with '{header}', got '{got}'.")]
    Header {
        measure: u32,
        index: usize,
        header: &'static str,
        got: String,
    },

    #[error("line {line}: {reason}")]
    Listing { line: usize, reason: String },

    #[error("no figures found")]
    Empty,

    #[error("figure starting at measure {start} does not follow the previous start {previous}")]
    Unordered { previous: u32, start: u32 },

    #[error("figure starts at measure {start}, beyond the last measure {last}")]
    OutOfRange { start: u32, last: u32 },

    #[error("unexpected data header: {0}")]
    BadHeader(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
