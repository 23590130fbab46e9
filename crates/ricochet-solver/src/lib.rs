//! Ricochet Robots solver library.
//!
//! This crate models the 16x16 board as a static wall graph, simulates robot
//! slides over it, and finds move sequences with a best-first search guided
//! by a goal-distance flood fill.

pub mod board;
pub mod error;
pub mod executor;
pub mod heuristic;
pub mod puzzle;
pub mod solver;
pub mod walls;

// Re-export main types
pub use board::{Board, Robot};
pub use error::{Result, RicochetError};
pub use executor::{execute, verify_solution, ExecutionResult, ReplayMetrics, ReplayStatus};
pub use heuristic::{reachable_cells, HeuristicMap, Reachability};
pub use puzzle::{Colour, Direction, Move, Position, PuzzleConfig, CELL_COUNT, GRID_SIZE};
pub use solver::{solve, solve_puzzle, solve_with_heuristic, SearchStats, Solution, SolverConfig};
pub use walls::{WallGraph, STANDARD_LAYOUT};
