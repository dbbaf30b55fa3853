//! A* search for optimal sliding-tile solutions.
//!
//! The controller pops the lowest `f = g + h` node, stops when it is the
//! goal, skips boards that are already closed, and otherwise closes the
//! board and pushes its successors. With the Manhattan heuristic the first
//! goal popped is a move-count-minimal solution.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, info_span, warn};

use crate::error::PuzzleError;
use crate::frontier::{Frontier, VisitedRegistry};
use crate::heuristic::manhattan;
use crate::puzzle::{Board, Direction, Position};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Target configuration
    pub goal: Board,
    /// Stop with `TimedOut` once this much time has passed
    pub timeout: Option<Duration>,
    /// Stop with `LimitReached` when a further expansion would exceed this;
    /// goal pops are not counted
    pub max_expansions: Option<usize>,
    /// Skip successors whose board is already closed before pushing them.
    /// The closed check at pop time is what guarantees correctness; this
    /// only keeps the frontier smaller.
    pub prefilter_visited: bool,
    /// Log a progress event every this many expansions (0 disables)
    pub progress_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            goal: Board::example_goal(),
            timeout: None,
            max_expansions: None,
            prefilter_visited: true,
            progress_interval: 100,
        }
    }
}

impl SolverConfig {
    pub fn with_goal(goal: Board) -> Self {
        Self {
            goal,
            ..Self::default()
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The goal was popped; `moves` is an optimal solution
    Solved,
    /// Every reachable board was expanded without meeting the goal
    Exhausted,
    /// The configured timeout elapsed first
    TimedOut,
    /// The configured expansion limit was hit first
    LimitReached,
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Only the root is in the frontier
    Ready,
    Expanding,
    Solved,
    Exhausted,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchState::Solved | SearchState::Exhausted)
    }
}

/// Result of a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverResult {
    pub outcome: SearchOutcome,
    /// Blank moves from start to goal; empty unless solved
    pub moves: Vec<Direction>,
    /// Boards closed and expanded
    pub nodes_expanded: usize,
    /// Nodes pushed into the frontier, root included
    pub nodes_generated: usize,
    /// Popped nodes discarded because their board was already closed
    pub duplicates_skipped: usize,
    /// Peak frontier size
    pub max_frontier: usize,
    pub time_elapsed_ms: u64,
}

impl SolverResult {
    pub fn solved(&self) -> bool {
        self.outcome == SearchOutcome::Solved
    }

    /// Whether the search proved no solution exists.
    pub fn search_exhausted(&self) -> bool {
        self.outcome == SearchOutcome::Exhausted
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

/// One state in the search graph.
///
/// Each node owns its board and its move history; successors copy both
/// rather than sharing them with the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    board: Board,
    g: u32,
    h: u32,
    moves: Vec<Direction>,
}

impl SearchNode {
    pub fn new(board: Board, g: u32, h: u32, moves: Vec<Direction>) -> Self {
        Self { board, g, h, moves }
    }

    /// Node for the start board: no moves taken yet.
    pub fn root(board: Board, goal: &Board) -> Self {
        let h = manhattan(&board, goal);
        Self::new(board, 0, h, Vec::new())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn blank(&self) -> Position {
        self.board.blank()
    }

    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<Direction> {
        self.moves
    }
}

/// All single-move successors of `node`, in `Direction::ALL` order.
///
/// Yields two successors for a corner blank, three for an edge blank and
/// four otherwise. Does not look at any closed set.
pub fn expand(node: &SearchNode, goal: &Board) -> SmallVec<[SearchNode; 4]> {
    let mut successors = SmallVec::new();

    for direction in node.board.legal_moves() {
        let board = match node.board.apply_move(direction) {
            Ok(board) => board,
            Err(err) => unreachable!("bounds-checked move was rejected: {err}"),
        };
        let h = manhattan(&board, goal);
        let mut moves = Vec::with_capacity(node.moves.len() + 1);
        moves.extend_from_slice(&node.moves);
        moves.push(direction);
        successors.push(SearchNode::new(board, node.g + 1, h, moves));
    }

    successors
}

/// A* controller owning one search's frontier and closed set.
#[derive(Debug)]
pub struct AStar {
    goal: Board,
    config: SolverConfig,
    frontier: Frontier,
    visited: VisitedRegistry,
    state: SearchState,
    solution: Option<Vec<Direction>>,
    nodes_expanded: usize,
    nodes_generated: usize,
    duplicates_skipped: usize,
    limit_reached: bool,
}

impl AStar {
    /// Seed a search with the root node for `start`.
    pub fn new(start: Board, config: SolverConfig) -> Result<Self, PuzzleError> {
        let goal = config.goal.clone();
        if start.size() != goal.size() {
            return Err(PuzzleError::SizeMismatch {
                start: start.size(),
                goal: goal.size(),
            });
        }

        let mut frontier = Frontier::new();
        frontier.push(SearchNode::root(start, &goal));

        Ok(Self {
            goal,
            config,
            frontier,
            visited: VisitedRegistry::new(),
            state: SearchState::Ready,
            solution: None,
            nodes_expanded: 0,
            nodes_generated: 1,
            duplicates_skipped: 0,
            limit_reached: false,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    pub fn visited(&self) -> &VisitedRegistry {
        &self.visited
    }

    pub fn frontier_size(&self) -> usize {
        self.frontier.size()
    }

    /// Whether a step stopped short because `max_expansions` was used up.
    pub fn limit_reached(&self) -> bool {
        self.limit_reached
    }

    /// Run one controller iteration. Terminal states are sticky, and so is
    /// an exhausted expansion budget.
    pub fn step(&mut self) -> SearchState {
        if self.limit_reached {
            return self.state;
        }
        match self.state {
            SearchState::Solved | SearchState::Exhausted => return self.state,
            SearchState::Ready => self.state = SearchState::Expanding,
            SearchState::Expanding => {}
        }

        let node = match self.frontier.pop_min() {
            Ok(node) => node,
            Err(_) => {
                self.state = SearchState::Exhausted;
                return self.state;
            }
        };

        if node.board == self.goal {
            self.solution = Some(node.into_moves());
            self.state = SearchState::Solved;
            return self.state;
        }

        let signature = node.board.signature();
        if self.visited.contains(signature) {
            self.duplicates_skipped += 1;
            return self.state;
        }
        if let Some(limit) = self.config.max_expansions {
            if self.nodes_expanded >= limit {
                self.limit_reached = true;
                return self.state;
            }
        }
        self.visited.insert(signature);
        self.nodes_expanded += 1;

        let interval = self.config.progress_interval;
        if interval > 0 && self.nodes_expanded % interval == 0 {
            debug!(
                expanded = self.nodes_expanded,
                depth = node.g,
                frontier = self.frontier.size(),
                "search progress"
            );
        }

        for successor in expand(&node, &self.goal) {
            let closed = self.visited.contains(successor.board.signature());
            if self.config.prefilter_visited && closed {
                continue;
            }
            self.nodes_generated += 1;
            self.frontier.push(successor);
        }

        self.state
    }

    /// Iterate until the search terminates or a configured limit is hit.
    pub fn run(mut self) -> SolverResult {
        let span = info_span!("astar", size = self.goal.size());
        let _enter = span.enter();

        let start_time = Instant::now();
        let deadline = self.config.timeout.map(|timeout| start_time + timeout);

        loop {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    warn!(expanded = self.nodes_expanded, "search timed out");
                    return self.finish(SearchOutcome::TimedOut, start_time);
                }
            }

            match self.step() {
                SearchState::Solved => return self.finish(SearchOutcome::Solved, start_time),
                SearchState::Exhausted => {
                    return self.finish(SearchOutcome::Exhausted, start_time)
                }
                SearchState::Ready | SearchState::Expanding => {}
            }

            if self.limit_reached {
                warn!(expanded = self.nodes_expanded, "expansion limit reached");
                return self.finish(SearchOutcome::LimitReached, start_time);
            }
        }
    }

    fn finish(self, outcome: SearchOutcome, start_time: Instant) -> SolverResult {
        let result = SolverResult {
            outcome,
            moves: self.solution.unwrap_or_default(),
            nodes_expanded: self.nodes_expanded,
            nodes_generated: self.nodes_generated,
            duplicates_skipped: self.duplicates_skipped,
            max_frontier: self.frontier.high_water(),
            time_elapsed_ms: start_time.elapsed().as_millis() as u64,
        };
        info!(
            outcome = ?result.outcome,
            moves = result.moves.len(),
            expanded = result.nodes_expanded,
            "search finished"
        );
        result
    }
}

/// Solve `start` towards `config.goal`.
///
/// An unreachable goal is reported as `SearchOutcome::Exhausted`, not as an
/// error; the only error is a start/goal size mismatch.
pub fn solve(start: &Board, config: &SolverConfig) -> Result<SolverResult, PuzzleError> {
    Ok(AStar::new(start.clone(), config.clone())?.run())
}
