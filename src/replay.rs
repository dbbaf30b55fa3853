//! Re-derive the boards along a solution for display.

use crate::error::PuzzleError;
use crate::puzzle::{Board, Direction};

/// Apply `moves` to `start` in order.
///
/// Returns the start board followed by the board after each move, so the
/// result has `moves.len() + 1` entries. Fails with `IllegalMove` if a
/// move would take the blank off the grid.
pub fn replay(start: &Board, moves: &[Direction]) -> Result<Vec<Board>, PuzzleError> {
    let mut boards = Vec::with_capacity(moves.len() + 1);
    boards.push(start.clone());

    let mut current = start.clone();
    for &direction in moves {
        current = current.apply_move(direction)?;
        boards.push(current.clone());
    }

    Ok(boards)
}

/// Board reached after applying every move.
pub fn final_board(start: &Board, moves: &[Direction]) -> Result<Board, PuzzleError> {
    moves
        .iter()
        .try_fold(start.clone(), |board, &direction| board.apply_move(direction))
}
