//! Board representation for N×N sliding-tile puzzles.
//!
//! A board is a square grid holding a permutation of `0..k²`, where `0`
//! is the blank. The blank position is cached next to the cells and kept
//! in sync by every constructor and by `apply_move`.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{InputError, PuzzleError};

/// Largest supported board side. A 5×5 board packs into 125 signature bits.
pub const MAX_SIZE: usize = 5;

/// Value of the blank cell.
pub const BLANK: u8 = 0;

/// Row-major cell storage. 3×3 and 4×4 boards stay inline.
pub type Cells = SmallVec<[u8; 16]>;

/// Direction in which the blank moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Expansion order used by the successor generator. Changing it changes
    /// which of several equal-length solutions is returned.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row delta, column delta)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cell coordinates on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Taxicab distance between two cells.
    pub fn manhattan(self, other: Position) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }

    /// Neighbouring cell in `direction`, or `None` if it falls outside a
    /// `size`×`size` grid.
    pub fn step(self, direction: Direction, size: usize) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = self.row as i64 + dr as i64;
        let col = self.col as i64 + dc as i64;
        let bound = size as i64;
        if row < 0 || col < 0 || row >= bound || col >= bound {
            return None;
        }
        Some(Position::new(row as usize, col as usize))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

/// Collision-free key of a board's cell contents.
///
/// Cells are packed most-significant first, so comparing signatures of
/// same-sized boards compares their cells lexicographically. Only used for
/// duplicate detection, never for cost ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(u128);

impl Signature {
    pub fn as_u128(self) -> u128 {
        self.0
    }
}

/// A puzzle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct Board {
    size: usize,
    cells: Cells,
    blank: Position,
}

impl Board {
    /// Build a board from rows, validating shape, range and uniqueness.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, InputError> {
        let size = rows.len();
        if !(2..=MAX_SIZE).contains(&size) {
            return Err(InputError::UnsupportedSize {
                size,
                max: MAX_SIZE,
            });
        }

        let max = (size * size - 1) as u8;
        let mut seen = [false; MAX_SIZE * MAX_SIZE];
        let mut cells = Cells::with_capacity(size * size);
        let mut blank = Position::new(0, 0);

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(InputError::RaggedRow {
                    row: row_idx,
                    expected: size,
                    found: row.len(),
                });
            }
            for (col_idx, &value) in row.iter().enumerate() {
                let value = check_value(value, max)?;
                if seen[value as usize] {
                    return Err(InputError::Duplicate { value });
                }
                seen[value as usize] = true;
                if value == BLANK {
                    blank = Position::new(row_idx, col_idx);
                }
                cells.push(value);
            }
        }

        Ok(Self { size, cells, blank })
    }

    /// Solved layout in reading order with the blank in the last cell.
    pub fn goal_ordered(size: usize) -> Result<Self, InputError> {
        if !(2..=MAX_SIZE).contains(&size) {
            return Err(InputError::UnsupportedSize {
                size,
                max: MAX_SIZE,
            });
        }
        let count = size * size;
        let cells: Cells = (1..count as u8).chain(std::iter::once(BLANK)).collect();
        Ok(Self {
            size,
            cells,
            blank: Position::new(size - 1, size - 1),
        })
    }

    /// Built-in goal: the spiral layout with the blank in the centre.
    pub fn example_goal() -> Self {
        Self::from_fixed([[1, 2, 3], [8, 0, 4], [7, 6, 5]])
    }

    /// Goal used when none is given: the spiral for 3×3, reading order
    /// otherwise.
    pub fn default_goal(size: usize) -> Result<Self, InputError> {
        if size == 3 {
            Ok(Self::example_goal())
        } else {
            Self::goal_ordered(size)
        }
    }

    /// Built-in start configuration, solvable in 25 moves to `example_goal`.
    pub fn example_start() -> Self {
        Self::from_fixed([[5, 7, 2], [4, 1, 0], [3, 8, 6]])
    }

    fn from_fixed(rows: [[u8; 3]; 3]) -> Self {
        let mut cells = Cells::new();
        let mut blank = Position::new(0, 0);
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == BLANK {
                    blank = Position::new(r, c);
                }
                cells.push(value);
            }
        }
        Self {
            size: 3,
            cells,
            blank,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn blank(&self) -> Position {
        self.blank
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.size + col]
    }

    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }

    /// Linear scan for `value`.
    pub fn position_of(&self, value: u8) -> Option<Position> {
        self.cells
            .iter()
            .position(|&v| v == value)
            .map(|idx| Position::new(idx / self.size, idx % self.size))
    }

    pub fn signature(&self) -> Signature {
        let bits = bits_per_cell(self.size);
        let packed = self
            .cells
            .iter()
            .fold(0u128, |acc, &v| (acc << bits) | v as u128);
        Signature(packed)
    }

    pub fn is_legal(&self, direction: Direction) -> bool {
        self.blank.step(direction, self.size).is_some()
    }

    /// Directions the blank can move in, in `Direction::ALL` order.
    pub fn legal_moves(&self) -> SmallVec<[Direction; 4]> {
        Direction::ALL
            .iter()
            .copied()
            .filter(|&d| self.is_legal(d))
            .collect()
    }

    /// Swap the blank with its neighbour in `direction`, returning the new
    /// board. `self` is left untouched.
    pub fn apply_move(&self, direction: Direction) -> Result<Board, PuzzleError> {
        let target = self
            .blank
            .step(direction, self.size)
            .ok_or(PuzzleError::IllegalMove {
                direction,
                blank: self.blank,
            })?;

        let mut cells = self.cells.clone();
        cells.swap(
            self.blank.row * self.size + self.blank.col,
            target.row * self.size + target.col,
        );

        Ok(Board {
            size: self.size,
            cells,
            blank: target,
        })
    }
}

fn check_value(value: i64, max: u8) -> Result<u8, InputError> {
    if value < 0 || value > max as i64 {
        return Err(InputError::OutOfRange { value, max });
    }
    Ok(value as u8)
}

fn bits_per_cell(size: usize) -> u32 {
    let max = (size * size - 1) as u32;
    u32::BITS - max.leading_zeros()
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.cells == other.cells
    }
}

impl Eq for Board {}

impl std::hash::Hash for Board {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        self.cells.hash(state);
    }
}

impl TryFrom<Vec<Vec<i64>>> for Board {
    type Error = InputError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<i64>> {
    fn from(board: Board) -> Self {
        board
            .cells
            .chunks(board.size)
            .map(|row| row.iter().map(|&v| v as i64).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = if self.size > 3 { 2 } else { 1 };
        let border: String = std::iter::repeat(format!("+{}", "-".repeat(width + 2)))
            .take(self.size)
            .collect();

        writeln!(f, "{}+", border)?;
        for row in self.cells.chunks(self.size) {
            write!(f, "|")?;
            for &value in row {
                if value == BLANK {
                    write!(f, " {:>width$} |", "", width = width)?;
                } else {
                    write!(f, " {:>width$} |", value, width = width)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "{}+", border)?;
        }
        Ok(())
    }
}

/// A puzzle instance as read from a JSON file.
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleConfig {
    pub start: Board,
    pub goal: Board,
}

/// File form of `PuzzleConfig`; the goal is resolved against the start size.
#[derive(Deserialize)]
struct PuzzleFile {
    start: Board,
    #[serde(default)]
    goal: Option<Board>,
}

impl PuzzleConfig {
    pub fn new(start: Board, goal: Board) -> Result<Self, PuzzleError> {
        if start.size() != goal.size() {
            return Err(PuzzleError::SizeMismatch {
                start: start.size(),
                goal: goal.size(),
            });
        }
        Ok(Self { start, goal })
    }

    pub fn example() -> Self {
        Self {
            start: Board::example_start(),
            goal: Board::example_goal(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        let file: PuzzleFile = serde_json::from_str(json)?;
        let goal = match file.goal {
            Some(goal) => goal,
            None => Board::default_goal(file.start.size())?,
        };
        Self::new(file.start, goal)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
