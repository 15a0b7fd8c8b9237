//! Maze Model
//!
//! The immutable grid the player walks through. A [`Maze`] is built once from
//! a validated rectangular grid of [`Cell`]s and never mutated afterwards; a
//! regenerated maze is always a brand new instance.
//!
//! Cells carry four independent passability flags. They do not reference
//! their neighbors: adjacency comes from grid coordinates, so every neighbor
//! lookup goes through [`Maze::neighbor`] which performs the bounds check.

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, MazeResult};

/// One of the four cardinal directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// Towards the last column
    Right,
}

impl Direction {
    /// All directions in a stable order
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Column/row delta for a single step
    #[must_use]
    pub fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// The direction pointing back
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A grid coordinate, `x` is the column and `y` the row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl Position {
    /// Create a position
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position
    #[must_use]
    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single maze cell
///
/// Each flag is true iff movement across that side is permitted. The field
/// names on the wire are the generator's (`upEdge`, `downEdge`, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Passage through the top side
    #[serde(rename = "upEdge")]
    pub up: bool,
    /// Passage through the bottom side
    #[serde(rename = "downEdge")]
    pub down: bool,
    /// Passage through the left side
    #[serde(rename = "leftEdge")]
    pub left: bool,
    /// Passage through the right side
    #[serde(rename = "rightEdge")]
    pub right: bool,
}

impl Cell {
    /// A cell with every side walled off
    pub const CLOSED: Cell = Cell {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Whether the given side is open
    #[must_use]
    pub fn is_open(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Copy of this cell with one side opened or closed
    #[must_use]
    pub fn with(mut self, direction: Direction, open: bool) -> Self {
        match direction {
            Direction::Up => self.up = open,
            Direction::Down => self.down = open,
            Direction::Left => self.left = open,
            Direction::Right => self.right = open,
        }
        self
    }
}

/// A rectangular, validated maze
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    /// Row-major cells, `width * height` long
    cells: Vec<Cell>,
}

impl Maze {
    /// Validate and build a maze from rows of cells
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::MalformedMaze`] if there are no rows, the rows
    /// are empty, or the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> MazeResult<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(MazeError::MalformedMaze("maze has no rows".to_string()));
        }

        let width = rows[0].len();
        if width == 0 {
            return Err(MazeError::MalformedMaze("maze rows are empty".to_string()));
        }

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(MazeError::MalformedMaze(format!(
                "row {index} has {} cells, expected {width}",
                row.len()
            )));
        }

        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Fixed start point, always the top-left cell
    #[must_use]
    pub fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// Finish point, derived from the dimensions
    #[must_use]
    pub fn finish(&self) -> Position {
        Position::new(self.width - 1, self.height - 1)
    }

    /// Whether a position lies inside the grid
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Look up a cell
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] outside `[0,width) x [0,height)`.
    pub fn cell_at(&self, x: usize, y: usize) -> MazeResult<&Cell> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x as i64, y as i64));
        }
        Ok(&self.cells[y * self.width + x])
    }

    /// The in-bounds neighbor of `pos` in `direction`, ignoring walls
    #[must_use]
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let nx = pos.x as i64 + dx;
        let ny = pos.y as i64 + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        let next = Position::new(nx as usize, ny as usize);
        self.contains(next).then_some(next)
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    fn out_of_bounds(&self, x: i64, y: i64) -> MazeError {
        MazeError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}
