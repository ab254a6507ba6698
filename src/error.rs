use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates outside the grid")]
    OutOfBounds,
    #[error("Grid dimensions must be positive")]
    InvalidDimensions,
    #[error("A game needs at least one mine")]
    NoMines,
    #[error("Too many mines for the grid")]
    TooManyMines,
}

pub type Result<T> = core::result::Result<T, GameError>;
