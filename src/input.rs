//! Interactive entry of a start board.
//!
//! Values are read cell by cell in reading order. A rejected value is
//! reported and the same cell is asked for again; cells already accepted
//! are kept.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{InputError, PuzzleError};
use crate::puzzle::{Board, MAX_SIZE};

/// Whitespace-separated tokens pulled from a line reader on demand.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn next_token(&mut self) -> Result<String, PuzzleError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input ended before the board was complete",
                )
                .into());
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

/// Prompt for a `size`×`size` board on `writer`, reading from `reader`.
pub fn read_board<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    size: usize,
) -> Result<Board, PuzzleError> {
    if !(2..=MAX_SIZE).contains(&size) {
        return Err(InputError::UnsupportedSize {
            size,
            max: MAX_SIZE,
        }
        .into());
    }

    let max = (size * size - 1) as u8;
    let mut tokens = Tokens::new(reader);
    let mut used = vec![false; size * size];
    let mut rows = Vec::with_capacity(size);

    writeln!(writer, "Enter the board row by row (0 is the blank), values separated by spaces:")?;

    for row_idx in 0..size {
        let mut row = Vec::with_capacity(size);
        write!(writer, "  Row {}: ", row_idx + 1)?;
        writer.flush()?;
        let mut reprompted = false;

        while row.len() < size {
            if !tokens.has_pending() && !row.is_empty() && !reprompted {
                write!(writer, "  Row {} (continued): ", row_idx + 1)?;
                writer.flush()?;
            }
            let token = tokens.next_token()?;
            reprompted = false;
            match parse_cell(&token, max, &used) {
                Ok(value) => {
                    used[value as usize] = true;
                    row.push(value as i64);
                }
                Err(err) => {
                    writeln!(writer, "[ERROR] {}. Try again.", err)?;
                    // rest of the line is stale once a value is rejected
                    tokens.pending.clear();
                    write!(writer, "  Row {}, column {}: ", row_idx + 1, row.len() + 1)?;
                    writer.flush()?;
                    reprompted = true;
                }
            }
        }
        rows.push(row);
    }

    Ok(Board::from_rows(rows)?)
}

fn parse_cell(token: &str, max: u8, used: &[bool]) -> Result<u8, InputError> {
    let value: i64 = token
        .parse()
        .map_err(|_| InputError::NotANumber(token.to_string()))?;
    if value < 0 || value > max as i64 {
        return Err(InputError::OutOfRange { value, max });
    }
    let value = value as u8;
    if used[value as usize] {
        return Err(InputError::Duplicate { value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Position;

    fn read(input: &str, size: usize) -> (Result<Board, PuzzleError>, String) {
        let mut out = Vec::new();
        let result = read_board(input.as_bytes(), &mut out, size);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_reads_rows() {
        let (board, _) = read("5 7 2\n4 1 0\n3 8 6\n", 3);
        let board = board.unwrap();
        assert_eq!(board, Board::example_start());
        assert_eq!(board.blank(), Position::new(1, 2));
    }

    #[test]
    fn test_values_may_span_lines() {
        let (board, _) = read("5 7\n2 4 1 0 3\n8\n6\n", 3);
        assert_eq!(board.unwrap(), Board::example_start());
    }

    #[test]
    fn test_out_of_range_reprompts_same_cell() {
        let (board, out) = read("5 7 9\n2\n4 1 0\n3 8 6\n", 3);
        assert_eq!(board.unwrap(), Board::example_start());
        assert!(out.contains("value 9 is out of range"));
        assert!(out.contains("Row 1, column 3"));
        assert!(!out.contains("(continued)"));
    }

    #[test]
    fn test_continued_prompt_for_short_line() {
        let (board, out) = read("5 7
2
4 1 0
3 8 6
", 3);
        assert_eq!(board.unwrap(), Board::example_start());
        assert_eq!(out.matches("Row 1 (continued)").count(), 1);
    }

    #[test]
    fn test_duplicate_reprompts_same_cell() {
        let (board, out) = read("5 7 2\n4 5\n1 0\n3 8 6\n", 3);
        assert_eq!(board.unwrap(), Board::example_start());
        assert!(out.contains("value 5 appears more than once"));
    }

    #[test]
    fn test_non_numeric_is_reported() {
        let (board, out) = read("1 x\n2\n3 0\n", 2);
        assert_eq!(
            board.unwrap(),
            Board::from_rows(vec![vec![1, 2], vec![3, 0]]).unwrap()
        );
        assert!(out.contains("'x' is not a number"));
    }

    #[test]
    fn test_eof_is_an_io_error() {
        let (board, _) = read("1 2\n", 2);
        match board {
            Err(PuzzleError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected unexpected eof, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_size() {
        let (board, _) = read("", 9);
        assert!(matches!(
            board,
            Err(PuzzleError::InvalidInput(InputError::UnsupportedSize { size: 9, .. }))
        ));
    }
}
