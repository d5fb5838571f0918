//! Error types shared by the splitter and the execution loop.

use std::io;
use std::path::PathBuf;

/// Failures while pulling statements out of a script source.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

/// An executor could not run one statement.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ExecError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ExecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl From<io::Error> for ExecError {
    fn from(err: io::Error) -> Self {
        Self {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for ExecError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Fatal outcomes of running a batch of script files.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("file not found: '{}'", .0.display())]
    MissingFile(PathBuf),
    #[error("{}: {source}", path.display())]
    Split {
        path: PathBuf,
        #[source]
        source: SplitError,
    },
    #[error("{}: statement {index} failed: {source}", path.display())]
    Statement {
        path: PathBuf,
        index: usize,
        #[source]
        source: ExecError,
    },
}
