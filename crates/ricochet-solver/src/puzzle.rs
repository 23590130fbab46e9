//! Puzzle representation types that match the JSON puzzle format.
//!
//! A puzzle is a set of robot placements, a goal cell and the name of the
//! robot that has to reach it. The wall layout is supplied separately.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RicochetError};

/// Width and height of the board
pub const GRID_SIZE: i32 = 16;

/// Number of cells on the board
pub const CELL_COUNT: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// Robot colour
///
/// The declaration order is the fixed ordering used for canonical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Green,
    Blue,
    Yellow,
    Black,
}

impl Colour {
    pub const ALL: [Colour; 5] = [
        Colour::Red,
        Colour::Green,
        Colour::Blue,
        Colour::Yellow,
        Colour::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Green => "green",
            Colour::Blue => "blue",
            Colour::Yellow => "yellow",
            Colour::Black => "black",
        }
    }

    /// Letter used when rendering a board (`K` for black)
    pub fn initial(self) -> char {
        match self {
            Colour::Red => 'R',
            Colour::Green => 'G',
            Colour::Blue => 'B',
            Colour::Yellow => 'Y',
            Colour::Black => 'K',
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colour {
    type Err = RicochetError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Colour::ALL
            .into_iter()
            .find(|colour| colour.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| RicochetError::UnknownColour(name.to_string()))
    }
}

/// Slide direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Grid offset of one step; `y` grows downwards
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    /// Row-major index into a flat cell array, `None` when off the grid
    pub fn index(self) -> Option<usize> {
        if self.in_bounds() {
            Some((self.y * GRID_SIZE + self.x) as usize)
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Self {
        let index = index as i32;
        Self::new(index % GRID_SIZE, index / GRID_SIZE)
    }

    /// The adjacent position one step away, which may be off the grid
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Every position on the board in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Parses `x,y` (parentheses optional), as typed on the command line
impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (x, y) = trimmed
            .split_once(',')
            .ok_or_else(|| format!("expected `x,y`, got `{}`", s))?;
        let x = x.trim().parse().map_err(|e| format!("bad x in `{}`: {}", s, e))?;
        let y = y.trim().parse().map_err(|e| format!("bad y in `{}`: {}", s, e))?;
        Ok(Position::new(x, y))
    }
}

/// A single slide: which robot, which way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub colour: Colour,
    pub direction: Direction,
}

impl Move {
    pub fn new(colour: Colour, direction: Direction) -> Self {
        Self { colour, direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.colour, self.direction)
    }
}

/// The complete puzzle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub robots: BTreeMap<Colour, Position>,
    pub goal: Position,
    /// Name of the robot that must reach the goal
    pub target: String,
}

impl PuzzleConfig {
    /// Resolve the target name against the configured robots
    pub fn target_colour(&self) -> Result<Colour> {
        let colour: Colour = self.target.parse()?;
        if self.robots.contains_key(&colour) {
            Ok(colour)
        } else {
            Err(RicochetError::UnknownColour(self.target.clone()))
        }
    }

    /// Check placements, goal and target without building a board
    pub fn validate(&self) -> Result<Colour> {
        validate_placement(&self.robots, self.goal)?;
        self.target_colour()
    }
}

/// Check that the goal and every robot are on the grid and no two robots share a cell
pub fn validate_placement(robots: &BTreeMap<Colour, Position>, goal: Position) -> Result<()> {
    if !goal.in_bounds() {
        return Err(RicochetError::GoalOutOfBounds(goal));
    }

    let mut seen: BTreeMap<usize, Colour> = BTreeMap::new();
    for (&colour, &position) in robots {
        let index = position
            .index()
            .ok_or(RicochetError::RobotOutOfBounds { colour, position })?;
        if let Some(&first) = seen.get(&index) {
            return Err(RicochetError::DuplicateRobotPosition {
                first,
                second: colour,
                position,
            });
        }
        seen.insert(index, colour);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_puzzle() -> PuzzleConfig {
        PuzzleConfig {
            robots: BTreeMap::from([
                (Colour::Red, Position::new(1, 6)),
                (Colour::Green, Position::new(0, 3)),
            ]),
            goal: Position::new(6, 14),
            target: "green".to_string(),
        }
    }

    #[test]
    fn test_direction_opposites() {
        for direction in Direction::ALL {
            assert_ne!(direction, direction.opposite());
            assert_eq!(direction, direction.opposite().opposite());
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_position_index_round_trip_and_bounds() {
        assert_eq!(Position::new(0, 0).index(), Some(0));
        assert_eq!(Position::new(15, 15).index(), Some(CELL_COUNT - 1));
        assert_eq!(Position::from_index(17), Position::new(1, 1));
        assert_eq!(Position::new(-1, 3).index(), None);
        assert_eq!(Position::new(3, 16).index(), None);
        assert_eq!(Position::all().count(), CELL_COUNT);
    }

    #[test]
    fn test_position_parse() {
        assert_eq!("6,14".parse::<Position>(), Ok(Position::new(6, 14)));
        assert_eq!("(1, 2)".parse::<Position>(), Ok(Position::new(1, 2)));
        assert!("6;14".parse::<Position>().is_err());
        assert!("a,1".parse::<Position>().is_err());
    }

    #[test]
    fn test_colour_parse() {
        assert_eq!("green".parse::<Colour>(), Ok(Colour::Green));
        assert_eq!(" Black ".parse::<Colour>(), Ok(Colour::Black));
        assert_eq!(
            "purple".parse::<Colour>(),
            Err(RicochetError::UnknownColour("purple".to_string()))
        );
    }

    #[test]
    fn test_puzzle_json_format() {
        let json = r#"{
            "robots": {"red": {"x": 1, "y": 6}, "green": {"x": 0, "y": 3}},
            "goal": {"x": 6, "y": 14},
            "target": "green"
        }"#;
        let puzzle: PuzzleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(puzzle.robots[&Colour::Red], Position::new(1, 6));
        assert_eq!(puzzle.validate(), Ok(Colour::Green));
    }

    #[test]
    fn test_target_must_be_configured() {
        let mut puzzle = sample_puzzle();
        puzzle.target = "yellow".to_string();
        assert_eq!(
            puzzle.target_colour(),
            Err(RicochetError::UnknownColour("yellow".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_bad_placements() {
        let mut puzzle = sample_puzzle();
        puzzle.goal = Position::new(16, 2);
        assert_eq!(
            puzzle.validate(),
            Err(RicochetError::GoalOutOfBounds(Position::new(16, 2)))
        );

        let mut puzzle = sample_puzzle();
        puzzle.robots.insert(Colour::Blue, Position::new(1, 6));
        assert_eq!(
            puzzle.validate(),
            Err(RicochetError::DuplicateRobotPosition {
                first: Colour::Red,
                second: Colour::Blue,
                position: Position::new(1, 6),
            })
        );

        let mut puzzle = sample_puzzle();
        puzzle.robots.insert(Colour::Black, Position::new(0, -1));
        assert_eq!(
            puzzle.validate(),
            Err(RicochetError::RobotOutOfBounds {
                colour: Colour::Black,
                position: Position::new(0, -1),
            })
        );
    }
}
