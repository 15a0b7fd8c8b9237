//! Render Mapper
//!
//! Pure translation from game state to per-cell visual attributes. Nothing in
//! here owns state; every surface (terminal board, PNG export) reads the same
//! [`CellVisual`]s so they always agree.
//!
//! # Precedence
//!
//! Applied in this order, later rules overriding earlier ones:
//!
//! 1. theme background
//! 2. visited shading (only when shading is switched on)
//! 3. solution highlight (not on the player, start or finish cell)
//! 4. start marker (not under the player)
//! 5. finish marker (always; pulses until the player stands on it)
//! 6. player marker (always on top)

use crate::game::GameController;
use crate::maze::{Cell, Maze, Position};
use crate::solution::SolutionPath;
use crate::theme::{Rgb, Theme};
use crate::visited::VisitedTracker;

/// Visited shading tier, by Manhattan distance from the player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    /// Distance 0 or 1
    Near,
    /// Distance 2 or 3
    Mid,
    /// Everything further
    Far,
}

impl Shade {
    /// Tier for a distance
    #[must_use]
    pub fn for_distance(distance: usize) -> Self {
        match distance {
            0..=1 => Self::Near,
            2..=3 => Self::Mid,
            _ => Self::Far,
        }
    }

    /// Theme color for this tier
    #[must_use]
    pub fn color(self, theme: &Theme) -> Rgb {
        match self {
            Self::Near => theme.visited_near,
            Self::Mid => theme.visited_mid,
            Self::Far => theme.visited_far,
        }
    }
}

/// One side of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Impassable, drawn in the wall color
    Wall(Rgb),
    /// Passable, drawn transparent
    Open,
}

impl Edge {
    fn from_flag(open: bool, wall: Rgb) -> Self {
        if open {
            Self::Open
        } else {
            Self::Wall(wall)
        }
    }

    /// Whether this side is a wall
    #[must_use]
    pub fn is_wall(&self) -> bool {
        matches!(self, Self::Wall(_))
    }
}

/// The four sides of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Borders {
    /// Top side
    pub up: Edge,
    /// Bottom side
    pub down: Edge,
    /// Left side
    pub left: Edge,
    /// Right side
    pub right: Edge,
}

/// Corner rounding in pixels; non-zero only on the outer board corners
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Corners {
    /// Top-left radius
    pub top_left: u8,
    /// Top-right radius
    pub top_right: u8,
    /// Bottom-left radius
    pub bottom_left: u8,
    /// Bottom-right radius
    pub bottom_right: u8,
}

impl Corners {
    /// Whether any corner is rounded
    #[must_use]
    pub fn any(&self) -> bool {
        self.top_left > 0 || self.top_right > 0 || self.bottom_left > 0 || self.bottom_right > 0
    }
}

/// Something drawn on top of the cell background
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Start point dot
    Start {
        /// Dot color
        color: Rgb,
    },
    /// Finish point ring
    Finish {
        /// Ring color
        color: Rgb,
        /// Inner dot color
        inner: Rgb,
        /// Whether the ring pulses (player not there yet)
        pulsing: bool,
    },
    /// The player
    Player {
        /// Fill color
        fill: Rgb,
        /// Outline color
        border: Rgb,
        /// Inner dot color
        inner: Rgb,
    },
}

/// Everything a surface needs to draw one cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellVisual {
    /// Grid coordinate
    pub position: Position,
    /// Final background color after shading and highlights
    pub background: Rgb,
    /// Visited shading tier, if shading applied
    pub shade: Option<Shade>,
    /// Whether the solution highlight applied
    pub on_solution: bool,
    /// Cell sides
    pub borders: Borders,
    /// Corner rounding
    pub corners: Corners,
    /// Markers bottom to top
    pub markers: Vec<Marker>,
}

impl CellVisual {
    /// Topmost marker, if any
    #[must_use]
    pub fn top_marker(&self) -> Option<&Marker> {
        self.markers.last()
    }
}

/// Row-major visuals for a whole board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardVisual {
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
    /// Cells, `width * height` long
    pub cells: Vec<CellVisual>,
}

impl BoardVisual {
    /// Cell visual at a coordinate
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&CellVisual> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }
}

/// Read-only inputs of the render mapper
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    /// Active maze
    pub maze: &'a Maze,
    /// Player position
    pub player: Position,
    /// Visited overlay
    pub visited: &'a VisitedTracker,
    /// Whether visited shading is on
    pub show_visited: bool,
    /// Active theme
    pub theme: &'a Theme,
    /// Solution overlay, if one is active
    pub solution: Option<&'a SolutionPath>,
}

impl<'a> BoardView<'a> {
    /// View of a game with shading on and no solution
    #[must_use]
    pub fn new(game: &'a GameController, theme: &'a Theme) -> Self {
        Self {
            maze: game.maze(),
            player: game.position(),
            visited: game.visited(),
            show_visited: true,
            theme,
            solution: None,
        }
    }

    /// Toggle visited shading
    #[must_use]
    pub fn with_visited(mut self, show: bool) -> Self {
        self.show_visited = show;
        self
    }

    /// Attach a solution overlay
    #[must_use]
    pub fn with_solution(mut self, solution: Option<&'a SolutionPath>) -> Self {
        self.solution = solution;
        self
    }
}

/// Map a single cell
///
/// Returns `None` outside the maze.
#[must_use]
pub fn map_cell(view: &BoardView<'_>, x: usize, y: usize) -> Option<CellVisual> {
    let cell = view.maze.cell_at(x, y).ok()?;
    let theme = view.theme;
    let here = Position::new(x, y);

    let is_player = here == view.player;
    let is_start = here == view.maze.start();
    let is_finish = here == view.maze.finish();

    let mut background = theme.cell_bg;

    let shade = (view.show_visited && view.visited.contains(here))
        .then(|| Shade::for_distance(here.manhattan(view.player)));
    if let Some(shade) = shade {
        background = shade.color(theme);
    }

    let on_solution = view.solution.is_some_and(|s| s.contains(here))
        && !is_player
        && !is_start
        && !is_finish;
    if on_solution {
        background = theme.solution;
    }

    let mut markers = Vec::with_capacity(2);
    if is_start && !is_player {
        markers.push(Marker::Start { color: theme.start });
    }
    if is_finish {
        markers.push(Marker::Finish {
            color: if is_player {
                theme.finish
            } else {
                theme.finish_pulse
            },
            inner: theme.cell_bg,
            pulsing: !is_player,
        });
    }
    if is_player {
        markers.push(Marker::Player {
            fill: theme.player,
            border: theme.player_border,
            inner: theme.cell_bg,
        });
    }

    Some(CellVisual {
        position: here,
        background,
        shade,
        on_solution,
        borders: borders(cell, theme.wall),
        corners: corners(view.maze, here, theme.corner_radius),
        markers,
    })
}

/// Map every cell of the board, row by row
#[must_use]
pub fn map_board(view: &BoardView<'_>) -> BoardVisual {
    let (width, height) = (view.maze.width(), view.maze.height());
    let cells = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter_map(|(x, y)| map_cell(view, x, y))
        .collect();
    BoardVisual {
        width,
        height,
        cells,
    }
}

fn borders(cell: &Cell, wall: Rgb) -> Borders {
    Borders {
        up: Edge::from_flag(cell.up, wall),
        down: Edge::from_flag(cell.down, wall),
        left: Edge::from_flag(cell.left, wall),
        right: Edge::from_flag(cell.right, wall),
    }
}

fn corners(maze: &Maze, pos: Position, radius: u8) -> Corners {
    let last_x = maze.width() - 1;
    let last_y = maze.height() - 1;
    let pick = |hit: bool| if hit { radius } else { 0 };
    Corners {
        top_left: pick(pos.x == 0 && pos.y == 0),
        top_right: pick(pos.x == last_x && pos.y == 0),
        bottom_left: pick(pos.x == 0 && pos.y == last_y),
        bottom_right: pick(pos.x == last_x && pos.y == last_y),
    }
}
