//! Error taxonomy shared by every pipeline stage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    /// The resume data file does not exist.
    #[error("resume data not found at '{}'", path.display())]
    NotFound { path: PathBuf },

    /// The data file exists but could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The data is not a well-formed resume record.
    #[error("invalid resume data: {message}")]
    Parse { message: String },

    /// The PDF engine failed internally.
    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// The output file could not be written, or a stale one removed.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ForgeError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        ForgeError::Parse {
            message: message.into(),
        }
    }
}

impl From<taffy::TaffyError> for ForgeError {
    fn from(e: taffy::TaffyError) -> Self {
        ForgeError::Render(format!("layout engine: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
