//! Static wall adjacency for the 16x16 board.
//!
//! A layout is a 16-line text grid with one hexadecimal wall code per cell.
//! The code says which of the four directions are open from that cell. The
//! graph never changes after parsing and every board borrows the same one.

use std::fmt;

use smallvec::SmallVec;

use crate::error::{Result, RicochetError};
use crate::puzzle::{Direction, Position, CELL_COUNT, GRID_SIZE};

/// Layout bundled with the crate
pub const STANDARD_LAYOUT: &str = include_str!("../boards/standard.txt");

// Codes whose cell is open in each direction
const OPEN_UP: &str = "023489AE";
const OPEN_DOWN: &str = "0124579C";
const OPEN_LEFT: &str = "0123568B";
const OPEN_RIGHT: &str = "013467AD";

const ALL_CODES: &str = "0123456789ABCDEF";

fn direction_bit(direction: Direction) -> u8 {
    match direction {
        Direction::Up => 0b0001,
        Direction::Down => 0b0010,
        Direction::Left => 0b0100,
        Direction::Right => 0b1000,
    }
}

/// Open-direction bits for a wall code, `None` for an unrecognized code
pub fn wall_code_openings(code: char) -> Option<u8> {
    if !ALL_CODES.contains(code) {
        return None;
    }
    let mut bits = 0;
    for (codes, direction) in [
        (OPEN_UP, Direction::Up),
        (OPEN_DOWN, Direction::Down),
        (OPEN_LEFT, Direction::Left),
        (OPEN_RIGHT, Direction::Right),
    ] {
        if codes.contains(code) {
            bits |= direction_bit(direction);
        }
    }
    Some(bits)
}

fn wall_code_for(bits: u8) -> char {
    ALL_CODES
        .chars()
        .find(|&code| wall_code_openings(code) == Some(bits))
        .unwrap_or('F')
}

/// Per-cell open directions, indexed row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallGraph {
    openings: [u8; CELL_COUNT],
}

impl WallGraph {
    /// Parse a layout. Walls are taken as written: a wall on one side of a
    /// cell boundary does not have to be mirrored on the other side.
    pub fn parse(layout: &str) -> Result<Self> {
        let mut rows: Vec<&str> = layout.lines().map(str::trim_end).collect();
        while rows.last().map_or(false, |row| row.is_empty()) {
            rows.pop();
        }
        if rows.len() != GRID_SIZE as usize {
            return Err(RicochetError::InvalidLayout(format!(
                "expected {} rows, found {}",
                GRID_SIZE,
                rows.len()
            )));
        }

        let mut openings = [0u8; CELL_COUNT];
        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != GRID_SIZE as usize {
                return Err(RicochetError::InvalidLayout(format!(
                    "row {} has {} cells, expected {}",
                    y, width, GRID_SIZE
                )));
            }
            for (x, code) in row.chars().enumerate() {
                let bits = wall_code_openings(code).ok_or_else(|| {
                    RicochetError::InvalidLayout(format!(
                        "unrecognized wall code `{}` at ({},{})",
                        code, x, y
                    ))
                })?;
                openings[y * GRID_SIZE as usize + x] = bits;
            }
        }

        Ok(Self { openings })
    }

    /// The layout shipped in `boards/standard.txt`
    pub fn standard() -> Result<Self> {
        Self::parse(STANDARD_LAYOUT)
    }

    /// The cell one step away in `direction`, if no wall or grid edge is in the way
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        let index = position.index()?;
        if self.openings[index] & direction_bit(direction) == 0 {
            return None;
        }
        let next = position.step(direction);
        next.in_bounds().then_some(next)
    }

    pub fn is_open(&self, position: Position, direction: Direction) -> bool {
        self.neighbor(position, direction).is_some()
    }

    pub fn open_directions(&self, position: Position) -> SmallVec<[Direction; 4]> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.is_open(position, direction))
            .collect()
    }

    /// Cells passed over by a slide on an empty board, ending with the stop cell
    pub fn slide_path(
        &self,
        from: Position,
        direction: Direction,
    ) -> impl Iterator<Item = Position> + '_ {
        std::iter::successors(self.neighbor(from, direction), move |&cell| {
            self.neighbor(cell, direction)
        })
    }

    /// Where a slide stops when no robots are on the board
    pub fn slide_end(&self, from: Position, direction: Direction) -> Position {
        self.slide_path(from, direction).last().unwrap_or(from)
    }

    /// Wall code of a cell, `None` off the grid
    pub fn code_at(&self, position: Position) -> Option<char> {
        position
            .index()
            .map(|index| wall_code_for(self.openings[index]))
    }
}

/// Writes the layout back out in the input format
impl fmt::Display for WallGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                write!(f, "{}", self.code_at(Position::new(x, y)).unwrap_or('F'))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Layout with no interior walls; only the grid edge stops a slide
    pub(crate) fn open_floor() -> WallGraph {
        let row = "0".repeat(GRID_SIZE as usize);
        let layout = vec![row; GRID_SIZE as usize].join("\n");
        WallGraph::parse(&layout).unwrap()
    }

    #[test]
    fn test_wall_code_table() {
        assert_eq!(wall_code_openings('0'), Some(0b1111));
        assert_eq!(wall_code_openings('F'), Some(0));
        assert_eq!(
            wall_code_openings('5'),
            Some(direction_bit(Direction::Down) | direction_bit(Direction::Left))
        );
        assert_eq!(wall_code_openings('E'), Some(direction_bit(Direction::Up)));
        assert_eq!(wall_code_openings('G'), None);
        assert_eq!(wall_code_openings('a'), None);
    }

    #[test]
    fn test_every_code_is_a_distinct_subset() {
        let mut seen = std::collections::HashSet::new();
        for code in ALL_CODES.chars() {
            assert!(seen.insert(wall_code_openings(code).unwrap()));
            assert_eq!(wall_code_for(wall_code_openings(code).unwrap()), code);
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_standard_layout_parses_and_prints_back() {
        let walls = WallGraph::standard().unwrap();
        assert_eq!(walls.to_string().trim_end(), STANDARD_LAYOUT.trim_end());
    }

    #[test]
    fn test_grid_edge_is_closed() {
        let walls = open_floor();
        let corner = Position::new(0, 0);
        assert_eq!(walls.neighbor(corner, Direction::Up), None);
        assert_eq!(walls.neighbor(corner, Direction::Left), None);
        assert_eq!(walls.neighbor(corner, Direction::Right), Some(Position::new(1, 0)));
        assert_eq!(walls.open_directions(corner).len(), 2);
        assert_eq!(walls.neighbor(Position::new(16, 0), Direction::Left), None);
    }

    #[test]
    fn test_slide_end_on_empty_board() {
        let walls = WallGraph::standard().unwrap();
        // The goal cell of the standard board has walls above and to the right
        assert_eq!(walls.slide_end(Position::new(0, 14), Direction::Right), Position::new(6, 14));
        assert_eq!(walls.slide_end(Position::new(6, 14), Direction::Up), Position::new(6, 14));
        assert_eq!(walls.slide_end(Position::new(0, 3), Direction::Right), Position::new(15, 3));
        assert_eq!(walls.slide_path(Position::new(0, 14), Direction::Right).count(), 6);
    }

    #[test]
    fn test_one_sided_wall_is_accepted() {
        let mut rows = vec!["0".repeat(16); 16];
        // Cell (0,0) blocks right, cell (1,0) still lets a robot move left into it
        rows[0] = format!("2{}", "0".repeat(15));
        let walls = WallGraph::parse(&rows.join("\n")).unwrap();
        assert_eq!(walls.neighbor(Position::new(0, 0), Direction::Right), None);
        assert_eq!(
            walls.neighbor(Position::new(1, 0), Direction::Left),
            Some(Position::new(0, 0))
        );
    }

    #[test]
    fn test_invalid_layouts() {
        let short = vec!["0".repeat(16); 15].join("\n");
        assert!(matches!(
            WallGraph::parse(&short),
            Err(RicochetError::InvalidLayout(_))
        ));

        let mut rows = vec!["0".repeat(16); 16];
        rows[4] = "0".repeat(17);
        assert!(matches!(
            WallGraph::parse(&rows.join("\n")),
            Err(RicochetError::InvalidLayout(_))
        ));

        let mut rows = vec!["0".repeat(16); 16];
        rows[2] = format!("{}X", "0".repeat(15));
        assert_eq!(
            WallGraph::parse(&rows.join("\n")),
            Err(RicochetError::InvalidLayout(
                "unrecognized wall code `X` at (15,2)".to_string()
            ))
        );
    }

    #[test]
    fn test_windows_line_endings() {
        let layout = STANDARD_LAYOUT.replace('\n', "\r\n");
        assert_eq!(WallGraph::parse(&layout), WallGraph::standard());
    }
}
