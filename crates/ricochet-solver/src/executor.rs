//! Move replay with legality checks and metrics.
//!
//! Used to check a solver path (or any hand-written one) against the starting
//! board it was produced for.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::board::Board;
use crate::puzzle::{Colour, Move, Position};

/// Outcome of replaying a move sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplayStatus {
    /// Target robot ended on the goal
    Solved,
    /// All moves applied, target robot somewhere else
    NotSolved,
    /// The move at `index` could not take a single step
    IllegalMove { index: usize, attempted: Move },
    /// The move at `index` names a robot that is not on the board
    UnknownRobot { index: usize, colour: Colour },
}

/// Metrics collected during replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayMetrics {
    pub moves_applied: usize,
    /// Sum of slide lengths in cells
    pub cells_travelled: usize,
    /// Distinct robots that moved at least once
    pub robots_moved: usize,
}

/// Result of replaying a path
#[derive(Debug, Clone)]
pub struct ExecutionResult<'w> {
    pub status: ReplayStatus,
    pub metrics: ReplayMetrics,
    /// Board after the last applied move
    pub board: Board<'w>,
}

impl ExecutionResult<'_> {
    pub fn solved(&self) -> bool {
        self.status == ReplayStatus::Solved
    }

    pub fn final_positions(&self) -> BTreeMap<Colour, Position> {
        BTreeMap::from(&self.board)
    }
}

fn slide_length(from: Position, to: Position) -> usize {
    ((from.x - to.x).abs() + (from.y - to.y).abs()) as usize
}

/// Apply `moves` in order to a copy of `board`, stopping at the first bad move
pub fn execute<'w>(board: &Board<'w>, target: Colour, moves: &[Move]) -> ExecutionResult<'w> {
    let mut board = board.clone();
    let mut metrics = ReplayMetrics::default();
    let mut moved: BTreeSet<Colour> = BTreeSet::new();

    for (index, &attempted) in moves.iter().enumerate() {
        let Some(from) = board.robot_position(attempted.colour) else {
            return ExecutionResult {
                status: ReplayStatus::UnknownRobot {
                    index,
                    colour: attempted.colour,
                },
                metrics,
                board,
            };
        };

        if !board.can_move(from, attempted.direction) {
            return ExecutionResult {
                status: ReplayStatus::IllegalMove { index, attempted },
                metrics,
                board,
            };
        }

        let to = board
            .move_robot(attempted.colour, attempted.direction)
            .unwrap_or(from);
        metrics.moves_applied += 1;
        metrics.cells_travelled += slide_length(from, to);
        moved.insert(attempted.colour);
    }
    metrics.robots_moved = moved.len();

    let status = if board.is_solved(target) {
        ReplayStatus::Solved
    } else {
        ReplayStatus::NotSolved
    };

    ExecutionResult {
        status,
        metrics,
        board,
    }
}

/// Simple verification: does the path leave the target robot on the goal?
pub fn verify_solution(board: &Board<'_>, target: Colour, moves: &[Move]) -> bool {
    execute(board, target, moves).solved()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Direction;
    use crate::walls::tests::open_floor;
    use crate::walls::WallGraph;

    fn start(walls: &WallGraph) -> Board<'_> {
        let robots = BTreeMap::from([
            (Colour::Green, Position::new(5, 0)),
            (Colour::Red, Position::new(0, 6)),
            (Colour::Blue, Position::new(6, 6)),
        ]);
        Board::new(walls, &robots, Position::new(5, 5)).unwrap()
    }

    #[test]
    fn test_replay_solution() {
        let walls = open_floor();
        let board = start(&walls);
        let moves = [
            Move::new(Colour::Red, Direction::Right),
            Move::new(Colour::Green, Direction::Down),
        ];

        let result = execute(&board, Colour::Green, &moves);
        assert_eq!(result.status, ReplayStatus::Solved);
        assert_eq!(result.metrics.moves_applied, 2);
        assert_eq!(result.metrics.cells_travelled, 5 + 5);
        assert_eq!(result.metrics.robots_moved, 2);
        assert_eq!(result.final_positions()[&Colour::Red], Position::new(5, 6));
        // The starting board is untouched
        assert_eq!(board.robot_position(Colour::Red), Some(Position::new(0, 6)));
        assert!(verify_solution(&board, Colour::Green, &moves));
    }

    #[test]
    fn test_replay_not_solved() {
        let walls = open_floor();
        let board = start(&walls);
        let moves = [Move::new(Colour::Green, Direction::Down)];

        let result = execute(&board, Colour::Green, &moves);
        assert_eq!(result.status, ReplayStatus::NotSolved);
        assert_eq!(result.board.robot_position(Colour::Green), Some(Position::new(5, 15)));
        assert!(!verify_solution(&board, Colour::Green, &moves));
    }

    #[test]
    fn test_replay_rejects_blocked_move() {
        let walls = open_floor();
        let board = start(&walls);
        let moves = [
            Move::new(Colour::Red, Direction::Right),
            Move::new(Colour::Red, Direction::Right),
        ];

        let result = execute(&board, Colour::Green, &moves);
        assert_eq!(
            result.status,
            ReplayStatus::IllegalMove {
                index: 1,
                attempted: Move::new(Colour::Red, Direction::Right),
            }
        );
        assert_eq!(result.metrics.moves_applied, 1);
    }

    #[test]
    fn test_replay_unknown_robot() {
        let walls = open_floor();
        let board = start(&walls);
        let moves = [Move::new(Colour::Yellow, Direction::Up)];

        let result = execute(&board, Colour::Green, &moves);
        assert_eq!(
            result.status,
            ReplayStatus::UnknownRobot {
                index: 0,
                colour: Colour::Yellow,
            }
        );
    }

    #[test]
    fn test_empty_path() {
        let walls = open_floor();
        let board = start(&walls);
        assert_eq!(execute(&board, Colour::Green, &[]).status, ReplayStatus::NotSolved);
    }
}
