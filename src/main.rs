//! CLI entry point for the sliding-tile solver.
//!
//! Usage:
//!   slide-solver solve [<puzzle.json>] [options]
//!   slide-solver solve --stdin [options]
//!   slide-solver solve --interactive [--size <k>] [options]
//!   slide-solver check [<puzzle.json>] [--stdin]
//!
//! Without a source the built-in example board is used.
//!
//! Options:
//!   --timeout <seconds>       Stop the search after this long
//!   --max-expansions <n>      Stop the search after expanding n boards
//!   --no-prefilter            Push successors even if already closed
//!   --json                    Print the result as JSON
//!   --no-replay               Do not print the boards along the solution
//!   -v, -vv                   Log search progress to stderr

use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use slide_solver::input::read_board;
use slide_solver::{
    is_solvable, manhattan, replay, solve, Board, Direction, PuzzleConfig, SearchOutcome,
    SolverConfig, SolverResult,
};

#[derive(Parser)]
#[command(name = "slide-solver")]
#[command(about = "Optimal A* solver for sliding-tile puzzles")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a minimal move sequence from the start board to the goal
    Solve {
        #[command(flatten)]
        source: SourceArgs,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum number of boards to expand
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Do not skip already-closed successors before pushing them
        #[arg(long)]
        no_prefilter: bool,

        /// Log progress every this many expansions
        #[arg(long, default_value = "100")]
        progress_interval: usize,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Skip the step-by-step replay
        #[arg(long)]
        no_replay: bool,
    },
    /// Report whether the goal is reachable and the Manhattan lower bound
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Path to puzzle JSON file
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read puzzle JSON from stdin instead of a file
    #[arg(long, conflicts_with = "file")]
    stdin: bool,

    /// Enter the start board interactively
    #[arg(long, conflicts_with_all = ["file", "stdin"])]
    interactive: bool,

    /// Board side for interactive entry
    #[arg(long, default_value = "3")]
    size: usize,
}

/// Output format for a solve
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    outcome: SearchOutcome,
    moves: Vec<Direction>,
    move_count: usize,
    nodes_expanded: usize,
    nodes_generated: usize,
    duplicates_skipped: usize,
    max_frontier: usize,
    time_elapsed_ms: u64,
}

impl From<&SolverResult> for SolveOutput {
    fn from(result: &SolverResult) -> Self {
        Self {
            solved: result.solved(),
            outcome: result.outcome,
            moves: result.moves.clone(),
            move_count: result.move_count(),
            nodes_expanded: result.nodes_expanded,
            nodes_generated: result.nodes_generated,
            duplicates_skipped: result.duplicates_skipped,
            max_frontier: result.max_frontier,
            time_elapsed_ms: result.time_elapsed_ms,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            2
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Solve {
            source,
            timeout,
            max_expansions,
            no_prefilter,
            progress_interval,
            json,
            no_replay,
        } => {
            let puzzle = load_puzzle(&source)?;
            let config = SolverConfig {
                goal: puzzle.goal.clone(),
                timeout: timeout.map(Duration::from_secs),
                max_expansions,
                prefilter_visited: !no_prefilter,
                progress_interval,
            };

            if !is_solvable(&puzzle.start, &puzzle.goal) {
                warn!("start board is in the other parity class; search will exhaust the reachable boards");
            }

            let result = solve(&puzzle.start, &config).context("search could not start")?;

            if json {
                let output = SolveOutput::from(&result);
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_report(&puzzle, &result, !no_replay)?;
            }

            Ok(if result.solved() { 0 } else { 1 })
        }
        Commands::Check { source } => {
            let puzzle = load_puzzle(&source)?;
            let solvable = is_solvable(&puzzle.start, &puzzle.goal);

            println!("Start:\n{}", puzzle.start);
            println!("Goal:\n{}", puzzle.goal);
            println!("Solvable: {}", if solvable { "yes" } else { "no" });
            println!(
                "Manhattan lower bound: {}",
                manhattan(&puzzle.start, &puzzle.goal)
            );

            Ok(if solvable { 0 } else { 1 })
        }
    }
}

fn load_puzzle(source: &SourceArgs) -> Result<PuzzleConfig> {
    if source.interactive {
        let goal = Board::default_goal(source.size)?;
        let stdin = io::stdin();
        let start = read_board(stdin.lock(), io::stdout(), source.size)
            .context("failed to read start board")?;
        return Ok(PuzzleConfig::new(start, goal)?);
    }

    if source.stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        return PuzzleConfig::from_json(&buffer).context("invalid puzzle JSON on stdin");
    }

    if let Some(path) = &source.file {
        return PuzzleConfig::from_path(path)
            .with_context(|| format!("failed to load puzzle {:?}", path));
    }

    Ok(PuzzleConfig::example())
}

fn print_report(puzzle: &PuzzleConfig, result: &SolverResult, show_replay: bool) -> Result<()> {
    println!("Goal:\n{}", puzzle.goal);
    println!("Start:\n{}", puzzle.start);

    match result.outcome {
        SearchOutcome::Solved => {
            println!(
                "Solved in {} moves ({} boards expanded, {} ms)",
                result.move_count(),
                result.nodes_expanded,
                result.time_elapsed_ms
            );
        }
        SearchOutcome::Exhausted => {
            println!(
                "No solution: all {} reachable boards were expanded",
                result.nodes_expanded
            );
            return Ok(());
        }
        SearchOutcome::TimedOut | SearchOutcome::LimitReached => {
            println!(
                "No solution within limits ({:?} after {} boards expanded)",
                result.outcome, result.nodes_expanded
            );
            return Ok(());
        }
    }

    if show_replay {
        let boards = replay(&puzzle.start, &result.moves)?;
        println!("\nStep 0 - start:\n{}", boards[0]);
        for (idx, (direction, board)) in result.moves.iter().zip(&boards[1..]).enumerate() {
            println!("Step {} - move blank {}:\n{}", idx + 1, direction, board);
        }
    }

    let labels: Vec<&str> = result.moves.iter().map(|d| d.label()).collect();
    println!("Moves: {}", labels.join(" "));

    Ok(())
}
