//! Lower bounds and reachability checks between a board and the goal.

use crate::puzzle::{Board, BLANK};

/// Sum over every non-blank tile of the taxicab distance between its cell
/// in `board` and its cell in `goal`.
///
/// Each move shifts exactly one tile by one cell, so this never exceeds
/// the true number of moves left and changes by exactly one per move.
///
/// `board` and `goal` must have the same size; callers check this up
/// front (`AStar::new`, `PuzzleConfig::new`).
pub fn manhattan(board: &Board, goal: &Board) -> u32 {
    debug_assert_eq!(board.size(), goal.size(), "board and goal sizes differ");
    let size = board.size();
    let mut distance = 0;

    for row in 0..size {
        for col in 0..size {
            let value = board.get(row, col);
            if value == BLANK {
                continue;
            }
            for goal_row in 0..size {
                for goal_col in 0..size {
                    if goal.get(goal_row, goal_col) == value {
                        distance += (row.abs_diff(goal_row) + col.abs_diff(goal_col)) as u32;
                    }
                }
            }
        }
    }

    distance
}

/// Whether `goal` can be reached from `start` at all.
///
/// Every move is a transposition with the blank and moves the blank one
/// cell, so the parity of the cell permutation and the parity of the
/// blank's displacement flip together. Reachability holds iff they agree.
pub fn is_solvable(start: &Board, goal: &Board) -> bool {
    if start.size() != goal.size() {
        return false;
    }

    let permutation_odd = permutation_parity(start, goal);
    let blank_odd = start.blank().manhattan(goal.blank()) % 2 == 1;

    permutation_odd == blank_odd
}

/// Parity of the permutation mapping goal cells onto start cells, counted
/// via cycle decomposition. `true` means odd.
fn permutation_parity(start: &Board, goal: &Board) -> bool {
    let cells = start.cells();
    let mut goal_index = vec![0usize; cells.len()];
    for (idx, &value) in goal.cells().iter().enumerate() {
        goal_index[value as usize] = idx;
    }

    let mut visited = vec![false; cells.len()];
    let mut transpositions = 0;
    for first in 0..cells.len() {
        if visited[first] {
            continue;
        }
        let mut cycle_len = 0;
        let mut idx = first;
        while !visited[idx] {
            visited[idx] = true;
            idx = goal_index[cells[idx] as usize];
            cycle_len += 1;
        }
        transpositions += cycle_len - 1;
    }

    transpositions % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Direction;

    #[test]
    fn test_manhattan_zero_at_goal() {
        let goal = Board::example_goal();
        assert_eq!(manhattan(&goal, &goal), 0);
    }

    #[test]
    fn test_manhattan_single_move() {
        let goal = Board::example_goal();
        let moved = goal.apply_move(Direction::Up).unwrap();
        assert_eq!(manhattan(&moved, &goal), 1);
    }

    #[test]
    fn test_manhattan_example_start() {
        // 5:4 7:3 2:1 4:2 1:2 3:4 8:2 6:1
        let start = Board::example_start();
        let goal = Board::example_goal();
        assert_eq!(manhattan(&start, &goal), 19);
    }

    #[test]
    fn test_manhattan_ignores_blank() {
        let goal = Board::from_rows(vec![vec![1, 2], vec![3, 0]]).unwrap();
        let board = Board::from_rows(vec![vec![0, 2], vec![3, 1]]).unwrap();
        // only tile 1 is displaced, by two cells
        assert_eq!(manhattan(&board, &goal), 2);
    }

    #[test]
    fn test_solvable_along_move_sequence() {
        let goal = Board::example_goal();
        let mut board = goal.clone();
        for d in [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Down,
            Direction::Right,
        ] {
            board = board.apply_move(d).unwrap();
            assert!(is_solvable(&board, &goal));
        }
        assert!(is_solvable(&Board::example_start(), &goal));
    }

    #[test]
    fn test_swapped_tiles_unsolvable() {
        let goal = Board::example_goal();
        let swapped = Board::from_rows(vec![vec![2, 1, 3], vec![8, 0, 4], vec![7, 6, 5]]).unwrap();
        assert!(!is_solvable(&swapped, &goal));

        let goal4 = Board::goal_ordered(4).unwrap();
        let mut rows = goal4.rows();
        rows[0].swap(0, 1);
        let rows: Vec<Vec<i64>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(i64::from).collect())
            .collect();
        let swapped4 = Board::from_rows(rows).unwrap();
        assert!(!is_solvable(&swapped4, &goal4));
    }

    #[test]
    fn test_size_mismatch_unsolvable() {
        let goal = Board::example_goal();
        let small = Board::goal_ordered(2).unwrap();
        assert!(!is_solvable(&small, &goal));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "board and goal sizes differ")]
    fn test_manhattan_size_mismatch() {
        manhattan(&Board::example_goal(), &Board::goal_ordered(2).unwrap());
    }
}
