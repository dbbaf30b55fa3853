//! Optimal solver for N×N sliding-tile puzzles.
//!
//! The search engine is A* with the Manhattan-distance heuristic over the
//! implicit graph of board configurations. Results are move sequences for
//! the blank, which `replay` turns back into boards for display.

pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod input;
pub mod puzzle;
pub mod replay;
pub mod solver;

// Re-export main types
pub use error::{InputError, PuzzleError};
pub use frontier::{Frontier, VisitedRegistry};
pub use heuristic::{is_solvable, manhattan};
pub use puzzle::{Board, Direction, Position, PuzzleConfig, Signature, MAX_SIZE};
pub use replay::{final_board, replay};
pub use solver::{
    expand, solve, AStar, SearchNode, SearchOutcome, SearchState, SolverConfig, SolverResult,
};
