use std::io::Write;

use slide_solver::{solve, Board, PuzzleConfig, PuzzleError, SolverConfig};

fn write_puzzle(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_and_solve_file() {
    let file = write_puzzle(
        r#"{
            "start": [[1, 2, 3], [4, 5, 6], [7, 0, 8]],
            "goal": [[1, 2, 3], [4, 5, 6], [7, 8, 0]]
        }"#,
    );

    let puzzle = PuzzleConfig::from_path(file.path()).unwrap();
    assert_eq!(puzzle.goal, Board::goal_ordered(3).unwrap());

    let result = solve(&puzzle.start, &SolverConfig::with_goal(puzzle.goal.clone())).unwrap();
    assert!(result.solved());
    assert_eq!(result.move_count(), 1);
}

#[test]
fn test_goal_defaults_to_example() {
    let file = write_puzzle(r#"{ "start": [[5, 7, 2], [4, 1, 0], [3, 8, 6]] }"#);
    let puzzle = PuzzleConfig::from_path(file.path()).unwrap();

    assert_eq!(puzzle.start, Board::example_start());
    assert_eq!(puzzle.goal, Board::example_goal());
}

#[test]
fn test_four_by_four_without_goal() {
    let file = write_puzzle(
        r#"{ "start": [[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 0, 15]] }"#,
    );
    let puzzle = PuzzleConfig::from_path(file.path()).unwrap();
    assert_eq!(puzzle.goal, Board::goal_ordered(4).unwrap());

    let result = solve(&puzzle.start, &SolverConfig::with_goal(puzzle.goal.clone())).unwrap();
    assert!(result.solved());
    assert_eq!(result.move_count(), 1);
}

#[test]
fn test_out_of_range_value_in_file() {
    let file = write_puzzle(r#"{ "start": [[5, 7, 2], [4, 1, 0], [3, 9, 6]] }"#);
    let err = PuzzleConfig::from_path(file.path()).unwrap_err();

    assert!(matches!(err, PuzzleError::Config(_)));
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = PuzzleConfig::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, PuzzleError::Io(_)));
}
