use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Unreadable corpus {path:?}: {reason}")]
    UnreadableCorpus { path: PathBuf, reason: String },

    #[error("Column '{column}' not found (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Search phrase is empty")]
    EmptyQuery,

    #[error("Invalid window '{0}' (expected one of 5, 10, 15, 20, 25, 30, all)")]
    InvalidWindow(String),

    #[error("Invalid column mapping file {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;
