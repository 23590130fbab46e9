//! Robot positions over a shared wall graph, and the slide rule.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::Result;
use crate::puzzle::{validate_placement, Colour, Direction, Position, PuzzleConfig, GRID_SIZE};
use crate::walls::WallGraph;

/// A robot is only its colour and the cell it stands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Robot {
    pub colour: Colour,
    pub position: Position,
}

/// A snapshot of robot positions.
///
/// Cloning copies the robots and keeps borrowing the same walls, so moving a
/// robot on a clone never affects the original.
#[derive(Debug, Clone)]
pub struct Board<'w> {
    walls: &'w WallGraph,
    /// Sorted by colour
    robots: SmallVec<[Robot; 5]>,
    goal: Position,
}

impl<'w> Board<'w> {
    pub fn new(
        walls: &'w WallGraph,
        robots: &BTreeMap<Colour, Position>,
        goal: Position,
    ) -> Result<Self> {
        validate_placement(robots, goal)?;
        let robots = robots
            .iter()
            .map(|(&colour, &position)| Robot { colour, position })
            .collect();
        Ok(Self {
            walls,
            robots,
            goal,
        })
    }

    /// Build the starting board of a puzzle and resolve its target robot
    pub fn from_puzzle(walls: &'w WallGraph, puzzle: &PuzzleConfig) -> Result<(Self, Colour)> {
        let board = Self::new(walls, &puzzle.robots, puzzle.goal)?;
        let target = puzzle.target_colour()?;
        Ok((board, target))
    }

    pub fn walls(&self) -> &'w WallGraph {
        self.walls
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot_position(&self, colour: Colour) -> Option<Position> {
        self.robots
            .iter()
            .find(|robot| robot.colour == colour)
            .map(|robot| robot.position)
    }

    pub fn has_robot(&self, colour: Colour) -> bool {
        self.robot_position(colour).is_some()
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.robots.iter().any(|robot| robot.position == position)
    }

    /// True when the wall graph is open one step in `direction` and that cell is free
    pub fn can_move(&self, from: Position, direction: Direction) -> bool {
        self.walls
            .neighbor(from, direction)
            .map_or(false, |next| !self.is_occupied(next))
    }

    /// Where a robot standing on `from` would stop; `from` itself if it cannot move
    pub fn end_position(&self, from: Position, direction: Direction) -> Position {
        let mut current = from;
        while let Some(next) = self.walls.neighbor(current, direction) {
            if self.is_occupied(next) {
                break;
            }
            current = next;
        }
        current
    }

    /// Slide a robot and return where it stopped, or `None` if there is no such robot.
    ///
    /// A direction outside [`Board::valid_directions`] leaves the robot where it is.
    pub fn move_robot(&mut self, colour: Colour, direction: Direction) -> Option<Position> {
        let from = self.robot_position(colour)?;
        let end = self.end_position(from, direction);
        let robot = self.robots.iter_mut().find(|robot| robot.colour == colour)?;
        robot.position = end;
        Some(end)
    }

    /// Directions whose first step is neither walled nor occupied
    pub fn valid_directions(&self, position: Position) -> SmallVec<[Direction; 4]> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.can_move(position, direction))
            .collect()
    }

    /// Valid directions whose opposite side is walled or occupied, i.e. the
    /// ways a robot could have left this cell if it had just arrived here
    pub fn valid_reverse_directions(&self, position: Position) -> SmallVec<[Direction; 4]> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| {
                self.can_move(position, direction) && !self.can_move(position, direction.opposite())
            })
            .collect()
    }

    pub fn is_solved(&self, colour: Colour) -> bool {
        self.robot_position(colour) == Some(self.goal)
    }

    /// Deduplication key built from robot positions in colour order.
    ///
    /// Each robot contributes one byte (`x` in the high nibble, `y` in the
    /// low one), so the key is collision-free for up to eight robots.
    pub fn canonical_key(&self) -> u64 {
        self.robots.iter().fold(0u64, |key, robot| {
            let cell = ((robot.position.x as u64) << 4) | robot.position.y as u64;
            (key << 8) | cell
        })
    }
}

/// Text rendering: robots by initial, goal as `*`, empty cells as `.`
impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let cell = Position::new(x, y);
                let symbol = match self.robots.iter().find(|robot| robot.position == cell) {
                    Some(robot) => robot.colour.initial(),
                    None if cell == self.goal => '*',
                    None => '.',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl From<&Board<'_>> for BTreeMap<Colour, Position> {
    fn from(board: &Board<'_>) -> Self {
        board
            .robots
            .iter()
            .map(|robot| (robot.colour, robot.position))
            .collect()
    }
}
