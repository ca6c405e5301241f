use forcecheck::core::io::reader::ReadError;
use forcecheck::core::io::writer::WriteError;
use forcecheck::workflows::error::HarnessError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for a malformed command line.
pub const USAGE_EXIT: i32 = 1;
/// Exit code for a scenario document that could not be read.
pub const DOCUMENT_EXIT: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read scenario '{path}': {source}", path = path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error(transparent)]
    Harness(#[from] HarnessError),

    #[error("Failed to write reference document: {0}")]
    Write(#[from] WriteError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Document { .. } => DOCUMENT_EXIT,
            _ => 1,
        }
    }
}
