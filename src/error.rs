use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),
    #[error("Binary input rejected: {0}")]
    BinaryInput(PathBuf),
    #[error("Input {path} is too large ({size} > {limit} bytes)")]
    InputTooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}
impl ForgeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ForgeError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Rejected session transitions. The session is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,
    #[error("File name cannot be empty")]
    EmptyFileName,
    #[error("A file with this name already exists: {0}")]
    FileExists(String),
    #[error("No such file: {0}")]
    UnknownFile(String),
    #[error("Select a file to configure or add a new file")]
    NoSelection,
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
    #[error("History cursor {index:?} is out of range for {len} snapshots")]
    InvalidHistory { index: Option<usize>, len: usize },
}
