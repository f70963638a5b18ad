use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Buffer length {actual} does not match board size {expected}")]
    InvalidBufferLength { expected: usize, actual: usize },
    #[error("Board was already generated")]
    AlreadyGenerated,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("A flood fill is still in progress")]
    FillInProgress,
}

pub type Result<T> = core::result::Result<T, GameError>;
