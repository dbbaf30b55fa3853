//! Error types for board construction, moves and search.

use thiserror::Error;

use crate::puzzle::{Direction, Position};

/// A start or goal configuration that fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("board size {size} is not supported (expected 2..={max})")]
    UnsupportedSize { size: usize, max: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("value {value} is out of range, must be between 0 and {max}")]
    OutOfRange { value: i64, max: u8 },

    #[error("value {value} appears more than once")]
    Duplicate { value: u8 },

    #[error("'{0}' is not a number")]
    NotANumber(String),
}

/// Errors surfaced by the puzzle library.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    /// Moving the blank would leave the grid. Search never produces this;
    /// seeing it from the solver means a successor was built without a
    /// bounds check.
    #[error("illegal move {direction} with blank at {blank}")]
    IllegalMove { direction: Direction, blank: Position },

    #[error("frontier is empty")]
    EmptyFrontier,

    #[error("start board is {start}x{start} but goal board is {goal}x{goal}")]
    SizeMismatch { start: usize, goal: usize },

    #[error("failed to parse puzzle file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
