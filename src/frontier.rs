//! Open list and closed set for best-first search.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use crate::error::PuzzleError;
use crate::puzzle::Signature;
use crate::solver::SearchNode;

/// Heap key: lowest `f` first, then earliest insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierKey {
    f: u32,
    seq: u64,
}

/// A node waiting in the frontier.
///
/// `BinaryHeap` is a max-heap, so the key is wrapped in `Reverse`.
#[derive(Debug)]
struct FrontierEntry {
    key: Reverse<FrontierKey>,
    node: SearchNode,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-priority queue of search nodes ordered by `f = g + h`.
///
/// Equal `f` values pop in insertion order: every push gets a sequence
/// number that breaks ties, so the path chosen among equal-cost optima is
/// deterministic.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
    high_water: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) {
        let key = FrontierKey {
            f: node.f(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.heap.push(FrontierEntry {
            key: Reverse(key),
            node,
        });
        self.high_water = self.high_water.max(self.heap.len());
    }

    /// Remove and return the node with the lowest `f`.
    pub fn pop_min(&mut self) -> Result<SearchNode, PuzzleError> {
        self.heap
            .pop()
            .map(|entry| entry.node)
            .ok_or(PuzzleError::EmptyFrontier)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    /// Largest size the frontier has reached.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

/// Signatures of boards that have been popped and expanded.
///
/// Insert-only: a closed board stays closed for the rest of the search.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    closed: HashSet<Signature>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, signature: Signature) -> bool {
        self.closed.contains(&signature)
    }

    /// Mark `signature` closed. Returns `false` if it already was.
    pub fn insert(&mut self, signature: Signature) -> bool {
        self.closed.insert(signature)
    }

    pub fn len(&self) -> usize {
        self.closed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Board, Direction};

    fn node_with_f(g: u32, h: u32, moves: Vec<Direction>) -> SearchNode {
        SearchNode::new(Board::example_goal(), g, h, moves)
    }

    #[test]
    fn test_pop_min_orders_by_f() {
        let mut frontier = Frontier::new();
        frontier.push(node_with_f(3, 4, vec![]));
        frontier.push(node_with_f(1, 1, vec![]));
        frontier.push(node_with_f(2, 3, vec![]));

        assert_eq!(frontier.size(), 3);
        assert_eq!(frontier.pop_min().unwrap().f(), 2);
        assert_eq!(frontier.pop_min().unwrap().f(), 5);
        assert_eq!(frontier.pop_min().unwrap().f(), 7);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_ties_pop_in_insertion_order() {
        let mut frontier = Frontier::new();
        frontier.push(node_with_f(2, 2, vec![Direction::Up]));
        frontier.push(node_with_f(1, 3, vec![Direction::Down]));
        frontier.push(node_with_f(0, 1, vec![]));
        frontier.push(node_with_f(3, 1, vec![Direction::Left]));

        assert_eq!(frontier.pop_min().unwrap().f(), 1);
        assert_eq!(frontier.pop_min().unwrap().moves(), &[Direction::Up]);
        assert_eq!(frontier.pop_min().unwrap().moves(), &[Direction::Down]);
        assert_eq!(frontier.pop_min().unwrap().moves(), &[Direction::Left]);
    }

    #[test]
    fn test_pop_empty_frontier() {
        let mut frontier = Frontier::new();
        assert!(matches!(
            frontier.pop_min(),
            Err(PuzzleError::EmptyFrontier)
        ));
    }

    #[test]
    fn test_high_water_tracks_peak() {
        let mut frontier = Frontier::new();
        for g in 0..5 {
            frontier.push(node_with_f(g, 0, vec![]));
        }
        frontier.pop_min().unwrap();
        frontier.pop_min().unwrap();
        assert_eq!(frontier.size(), 3);
        assert_eq!(frontier.high_water(), 5);
    }

    #[test]
    fn test_visited_registry_is_insert_only() {
        let mut visited = VisitedRegistry::new();
        let sig = Board::example_start().signature();

        assert!(!visited.contains(sig));
        assert!(visited.insert(sig));
        assert!(visited.contains(sig));
        assert!(!visited.insert(sig));
        assert_eq!(visited.len(), 1);
    }
}
