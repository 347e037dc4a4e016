use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Invalid shape description at line {line}: {reason}")]
    InvalidShape { line: usize, reason: ShapeIssue },
    #[error("Restored board is inconsistent: {0}")]
    InconsistentBoard(&'static str),
}

/// What exactly is wrong with a shape description.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShapeIssue {
    #[error("missing mine count")]
    MissingMineCount,
    #[error("mine count is not a number")]
    BadMineCount,
    #[error("expected {expected} markers, found {found}")]
    RowLength { expected: usize, found: usize },
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("unrecognized marker")]
    UnknownMarker,
}

pub type Result<T> = core::result::Result<T, GameError>;
