use std::io;

use mineclear_core::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
    #[error("Elapsed time must be finite, got {0}")]
    InvalidElapsedTime(f64),
    #[error("Malformed leaderboard record at line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },
    #[error("Invalid settings: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}

impl StorageError {
    /// Whether this is a filesystem failure rather than bad data.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
