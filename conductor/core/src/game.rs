//! Game Controller
//!
//! The state machine behind a single game. It owns the active [`Maze`], the
//! player [`Position`], the [`VisitedTracker`] and the move counter, and is
//! the only thing allowed to change any of them.
//!
//! # States
//!
//! ```text
//!            attempt_move reaches finish
//!   Playing ─────────────────────────────▶ Completed
//!      ▲                                       │
//!      └──────── reset() / replace_maze() ─────┘
//! ```
//!
//! Illegal moves (walls, grid edges, moves after completion) are ordinary
//! input and come back as a [`MoveOutcome`], never as an error.

use serde::{Deserialize, Serialize};

use crate::maze::{Direction, Maze, Position};
use crate::visited::VisitedTracker;

/// Phase of the current game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Accepting moves
    #[default]
    Playing,
    /// Finish reached; moves are ignored until reset or a new maze
    Completed,
}

/// What a call to [`GameController::attempt_move`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Player moved to a new cell
    Moved(Position),
    /// Player moved onto the finish and the game is now complete
    Finished(Position),
    /// A wall or the grid edge is in the way
    Blocked,
    /// The game is already complete
    Ignored,
}

impl MoveOutcome {
    /// Whether the position changed
    #[must_use]
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved(_) | Self::Finished(_))
    }
}

/// Owns and mutates the state of one game
#[derive(Clone, Debug)]
pub struct GameController {
    maze: Maze,
    position: Position,
    visited: VisitedTracker,
    move_count: u32,
    status: GameStatus,
}

impl GameController {
    /// Start a new game on `maze`
    #[must_use]
    pub fn new(maze: Maze) -> Self {
        let visited = Self::fresh_visited(&maze);
        Self {
            position: maze.start(),
            maze,
            visited,
            move_count: 0,
            status: GameStatus::Playing,
        }
    }

    /// The active maze
    #[must_use]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Current player position
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Cells entered in this game
    #[must_use]
    pub fn visited(&self) -> &VisitedTracker {
        &self.visited
    }

    /// Successful moves in this game
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Current phase
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether the finish has been reached
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    /// Start point of the active maze
    #[must_use]
    pub fn start(&self) -> Position {
        self.maze.start()
    }

    /// Finish point of the active maze
    #[must_use]
    pub fn finish(&self) -> Position {
        self.maze.finish()
    }

    /// Try to move one cell in `direction`
    ///
    /// The move succeeds only while playing, when the current cell is open on
    /// that side and the neighbor lies inside the grid. An open flag on an
    /// outer edge never lets the player leave the grid.
    pub fn attempt_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.status == GameStatus::Completed {
            return MoveOutcome::Ignored;
        }

        let open = match self.maze.cell_at(self.position.x, self.position.y) {
            Ok(cell) => cell.is_open(direction),
            Err(e) => {
                tracing::error!(error = %e, "player position outside the active maze");
                false
            }
        };
        if !open {
            return MoveOutcome::Blocked;
        }

        let Some(next) = self.maze.neighbor(self.position, direction) else {
            tracing::debug!(
                position = %self.position,
                ?direction,
                "open edge points outside the grid, move rejected"
            );
            return MoveOutcome::Blocked;
        };

        self.position = next;
        self.move_count += 1;
        if let Err(e) = self.visited.mark_visited(next.x, next.y) {
            tracing::error!(error = %e, "visited tracker out of sync with maze");
        }

        if next == self.maze.finish() {
            self.status = GameStatus::Completed;
            tracing::info!(moves = self.move_count, "maze completed");
            MoveOutcome::Finished(next)
        } else {
            MoveOutcome::Moved(next)
        }
    }

    /// Restart the current maze from the start point
    pub fn reset(&mut self) {
        self.position = self.maze.start();
        self.visited = Self::fresh_visited(&self.maze);
        self.move_count = 0;
        self.status = GameStatus::Playing;
    }

    /// Install a new maze and restart on it
    ///
    /// Returns the maze that was active before.
    pub fn replace_maze(&mut self, maze: Maze) -> Maze {
        let previous = std::mem::replace(&mut self.maze, maze);
        self.reset();
        previous
    }

    fn fresh_visited(maze: &Maze) -> VisitedTracker {
        let mut visited = VisitedTracker::new(maze.width(), maze.height());
        let start = maze.start();
        if let Err(e) = visited.mark_visited(start.x, start.y) {
            tracing::error!(error = %e, "start point outside the maze");
        }
        visited
    }
}
