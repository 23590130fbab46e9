//! Error type shared by layout parsing, puzzle validation and the search.

use crate::puzzle::{Colour, Position};
use crate::solver::SearchStats;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RicochetError {
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),
    #[error("{first} and {second} robots both start on {position}")]
    DuplicateRobotPosition {
        first: Colour,
        second: Colour,
        position: Position,
    },
    #[error("goal {0} is outside the grid")]
    GoalOutOfBounds(Position),
    #[error("{colour} robot starts outside the grid at {position}")]
    RobotOutOfBounds { colour: Colour, position: Position },
    #[error("unknown robot colour `{0}`")]
    UnknownColour(String),
    /// A precomputed heuristic map was built for a different goal than the board's
    #[error("heuristic map is for goal {found}, board goal is {expected}")]
    HeuristicGoalMismatch { expected: Position, found: Position },
    /// Every reachable configuration was explored without solving
    #[error("puzzle is unsolvable ({stats})")]
    Unsolvable { stats: SearchStats },
    /// The search ran out of time or expansions before deciding
    #[error("search budget exhausted ({stats})")]
    BudgetExhausted { stats: SearchStats },
}

impl RicochetError {
    /// Short machine-readable tag used in the CLI report
    pub fn kind(&self) -> &'static str {
        match self {
            RicochetError::InvalidLayout(_) => "invalid_layout",
            RicochetError::DuplicateRobotPosition { .. } => "duplicate_robot_position",
            RicochetError::GoalOutOfBounds(_) => "goal_out_of_bounds",
            RicochetError::RobotOutOfBounds { .. } => "robot_out_of_bounds",
            RicochetError::UnknownColour(_) => "unknown_colour",
            RicochetError::HeuristicGoalMismatch { .. } => "heuristic_goal_mismatch",
            RicochetError::Unsolvable { .. } => "unsolvable",
            RicochetError::BudgetExhausted { .. } => "budget_exhausted",
        }
    }

    /// Search counters, for errors that end a search
    pub fn stats(&self) -> Option<&SearchStats> {
        match self {
            RicochetError::Unsolvable { stats } | RicochetError::BudgetExhausted { stats } => {
                Some(stats)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RicochetError>;
