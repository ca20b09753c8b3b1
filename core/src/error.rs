use thiserror::Error;

/// Errors surfaced by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("position ({row}, {col}) is outside a {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("the game is over; no further moves are accepted")]
    GameOver,
    #[error("invalid direction code {0}; expected 0-3 (Up, Down, Left, Right)")]
    InvalidDirection(u8),
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),
    #[error("invalid tile value {0}; expected 0 or a power of two from 2 to 2^31")]
    InvalidTile(u32),
    #[error("invalid grid size: {0}")]
    InvalidSize(usize),
    #[error("probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
