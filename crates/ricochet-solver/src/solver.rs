//! Best-first search over robot placements.
//!
//! States are popped in order of moves made plus the goal distance of the
//! cell the last-moved robot stopped on. That distance is taken for whichever
//! robot moved, not only the target, so the order is a heuristic and the
//! first solution found is not guaranteed to be the shortest.
//!
//! Each distinct placement is enqueued at most once: a placement reached again,
//! even by a shorter path, is dropped.

use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{Result, RicochetError};
use crate::heuristic::HeuristicMap;
use crate::puzzle::{Colour, Move, PuzzleConfig};
use crate::walls::WallGraph;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Record the moves leading to each state
    pub track_path: bool,
    /// Maximum time to search
    pub timeout: Option<Duration>,
    /// Maximum number of states to expand
    pub max_expansions: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            track_path: true,
            timeout: None,
            max_expansions: None,
        }
    }
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// States popped and expanded into neighbours
    pub nodes_expanded: usize,
    /// Distinct placements seen, including the start
    pub states_visited: usize,
    pub time_elapsed_ms: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expansions, {} states, {}ms",
            self.nodes_expanded, self.states_visited, self.time_elapsed_ms
        )
    }
}

/// A successful search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    /// Number of slides
    pub moves: usize,
    /// The slides in order; empty when path tracking is off
    pub path: Vec<Move>,
    pub stats: SearchStats,
}

/// A queued placement
#[derive(Debug)]
struct SearchNode<'w> {
    priority: u32,
    /// Insertion order, so equal priorities pop first-in first-out
    sequence: u64,
    moves: usize,
    board: Board<'w>,
    path: Vec<Move>,
}

impl Ord for SearchNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for SearchNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode<'_> {}

/// Unreachable cells sort after everything else
fn priority(moves: usize, distance: Option<u32>) -> u32 {
    match distance {
        Some(distance) => u32::try_from(moves)
            .unwrap_or(u32::MAX)
            .saturating_add(distance),
        None => u32::MAX,
    }
}

fn collect_stats(start_time: Instant, nodes_expanded: usize, states_visited: usize) -> SearchStats {
    SearchStats {
        nodes_expanded,
        states_visited,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    }
}

/// Solve from `board`, flooding a fresh heuristic map for its goal
pub fn solve(board: &Board<'_>, target: Colour, config: &SolverConfig) -> Result<Solution> {
    let heuristic = HeuristicMap::flood_fill(board.walls(), board.goal())?;
    solve_with_heuristic(board, target, &heuristic, config)
}

/// Solve a puzzle description on the given walls
pub fn solve_puzzle(
    walls: &WallGraph,
    puzzle: &PuzzleConfig,
    config: &SolverConfig,
) -> Result<Solution> {
    let (board, target) = Board::from_puzzle(walls, puzzle)?;
    solve(&board, target, config)
}

/// Solve with a heuristic map computed earlier for the same walls and goal.
///
/// Useful when many placements share one goal: the flood fill runs once.
pub fn solve_with_heuristic(
    board: &Board<'_>,
    target: Colour,
    heuristic: &HeuristicMap,
    config: &SolverConfig,
) -> Result<Solution> {
    if !board.has_robot(target) {
        return Err(RicochetError::UnknownColour(target.to_string()));
    }
    if heuristic.goal() != board.goal() {
        return Err(RicochetError::HeuristicGoalMismatch {
            expected: board.goal(),
            found: heuristic.goal(),
        });
    }

    let start_time = Instant::now();
    let deadline = config.timeout.map(|timeout| start_time + timeout);
    log::debug!(
        "searching: {} robots, target {}, goal {}",
        board.robots().len(),
        target,
        board.goal()
    );

    let mut visited: HashSet<u64> = HashSet::new();
    visited.insert(board.canonical_key());

    let mut sequence: u64 = 0;
    let mut queue = BinaryHeap::new();
    queue.push(Reverse(SearchNode {
        priority: 0,
        sequence,
        moves: 0,
        board: board.clone(),
        path: Vec::new(),
    }));

    let mut nodes_expanded: usize = 0;

    while let Some(Reverse(node)) = queue.pop() {
        if node.board.is_solved(target) {
            let stats = collect_stats(start_time, nodes_expanded, visited.len());
            log::info!(
                "solved in {} moves ({} expansions, {} states, {}ms)",
                node.moves,
                stats.nodes_expanded,
                stats.states_visited,
                stats.time_elapsed_ms
            );
            return Ok(Solution {
                moves: node.moves,
                path: node.path,
                stats,
            });
        }

        let out_of_expansions = config
            .max_expansions
            .map_or(false, |max| nodes_expanded >= max);
        let out_of_time = deadline.map_or(false, |deadline| Instant::now() > deadline);
        if out_of_expansions || out_of_time {
            let stats = collect_stats(start_time, nodes_expanded, visited.len());
            log::warn!("search budget exhausted: {}", stats);
            return Err(RicochetError::BudgetExhausted { stats });
        }

        nodes_expanded += 1;

        for robot in node.board.robots() {
            for direction in node.board.valid_directions(robot.position) {
                let mut next = node.board.clone();
                let Some(stop) = next.move_robot(robot.colour, direction) else {
                    continue;
                };
                if !visited.insert(next.canonical_key()) {
                    continue;
                }

                let moves = node.moves + 1;
                let path = if config.track_path {
                    let mut path = node.path.clone();
                    path.push(Move::new(robot.colour, direction));
                    path
                } else {
                    Vec::new()
                };

                sequence += 1;
                queue.push(Reverse(SearchNode {
                    priority: priority(moves, heuristic.distance(stop)),
                    sequence,
                    moves,
                    board: next,
                    path,
                }));
            }
        }
    }

    let stats = collect_stats(start_time, nodes_expanded, visited.len());
    log::info!("no solution: {}", stats);
    Err(RicochetError::Unsolvable { stats })
}
