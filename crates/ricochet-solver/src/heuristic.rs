//! Goal-distance flood fill over the empty board.
//!
//! These maps ignore robots entirely, so they only depend on the walls and
//! the goal and can be shared by every search towards the same goal.

use std::collections::VecDeque;
use std::fmt;

use crate::error::{Result, RicochetError};
use crate::puzzle::{Direction, Position, CELL_COUNT, GRID_SIZE};
use crate::walls::WallGraph;

/// Minimum slide count from the goal to each cell, robots ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicMap {
    goal: Position,
    distances: [Option<u32>; CELL_COUNT],
}

impl HeuristicMap {
    /// Flood outwards from the goal.
    ///
    /// Every cell a slide passes over, not just the one it stops on, is offered
    /// the slide's distance. A cell whose distance improves goes back on the
    /// worklist, so a cell can be settled more than once.
    pub fn flood_fill(walls: &WallGraph, goal: Position) -> Result<Self> {
        let goal_index = goal.index().ok_or(RicochetError::GoalOutOfBounds(goal))?;

        let mut distances = [None; CELL_COUNT];
        distances[goal_index] = Some(0);

        let mut worklist: VecDeque<Position> = VecDeque::new();
        worklist.push_back(goal);

        while let Some(cell) = worklist.pop_front() {
            let Some(current) = cell.index().and_then(|index| distances[index]) else {
                continue;
            };
            let proposed = current + 1;

            for direction in Direction::ALL {
                for passed in walls.slide_path(cell, direction) {
                    let Some(index) = passed.index() else {
                        continue;
                    };
                    if distances[index].map_or(true, |known| proposed < known) {
                        distances[index] = Some(proposed);
                        worklist.push_back(passed);
                    }
                }
            }
        }

        let map = Self { goal, distances };
        log::debug!(
            "heuristic map for goal {}: {} of {} cells reachable",
            goal,
            map.reachable_count(),
            CELL_COUNT
        );
        Ok(map)
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Lower-bound slide count, `None` when the goal can never be reached from here
    pub fn distance(&self, position: Position) -> Option<u32> {
        position.index().and_then(|index| self.distances[index])
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }
}

/// Distance grid, `-` for unreachable cells
impl fmt::Display for HeuristicMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                if x > 0 {
                    write!(f, " ")?;
                }
                match self.distance(Position::new(x, y)) {
                    Some(d) => write!(f, "{:>2}", d)?,
                    None => write!(f, " -")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Cells a lone robot can come to rest on, starting from `start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    start: Position,
    reached: [bool; CELL_COUNT],
}

impl Reachability {
    pub fn start(&self) -> Position {
        self.start
    }

    pub fn contains(&self, position: Position) -> bool {
        position.index().map_or(false, |index| self.reached[index])
    }

    pub fn count(&self) -> usize {
        self.reached.iter().filter(|&&r| r).count()
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |&p| self.contains(p))
    }
}

/// `.` for a stop cell, `x` otherwise
impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let symbol = if self.contains(Position::new(x, y)) { '.' } else { 'x' };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Stop cells reachable from `start` by slides on an otherwise empty board
///
/// An off-grid start reaches nothing.
pub fn reachable_cells(walls: &WallGraph, start: Position) -> Reachability {
    let mut reached = [false; CELL_COUNT];
    let Some(start_index) = start.index() else {
        return Reachability { start, reached };
    };
    reached[start_index] = true;
    let mut worklist = vec![start];

    while let Some(cell) = worklist.pop() {
        for direction in walls.open_directions(cell) {
            let end = walls.slide_end(cell, direction);
            if let Some(index) = end.index() {
                if !reached[index] {
                    reached[index] = true;
                    worklist.push(end);
                }
            }
        }
    }

    Reachability { start, reached }
}
