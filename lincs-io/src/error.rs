use std::io;
use thiserror::Error;

use lincs_core::LincsError;

/// Error type for lincs-io operations.
#[derive(Error, Debug)]
pub enum LincsIoError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be parsed.
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A parsed record was rejected by the feature model.
    #[error(transparent)]
    Core(#[from] LincsError),
}

/// Result type alias for lincs-io operations.
pub type Result<T> = std::result::Result<T, LincsIoError>;
