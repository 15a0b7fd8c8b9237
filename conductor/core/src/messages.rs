//! Conductor Messages
//!
//! Messages sent from the Conductor to UI surfaces. Surfaces never inspect the
//! game themselves; they render the latest [`GameSnapshot`] and react to the
//! notices the Conductor raises.

use serde::{Deserialize, Serialize};

use crate::game::GameStatus;
use crate::settings::{GameSettings, MazeAlgorithm, PathfindingAlgorithm};
use crate::theme::ThemeName;

/// Messages from Conductor to UI Surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConductorMessage {
    // ============================================
    // Game Messages
    // ============================================
    /// Statistics changed; redraw the stats line
    State {
        /// Current game statistics
        snapshot: GameSnapshot,
    },

    /// Generation started or finished
    Loading {
        /// Whether a generation request is outstanding
        active: bool,
    },

    /// A freshly generated maze is now active
    MazeReplaced {
        /// Columns
        width: usize,
        /// Rows
        height: usize,
        /// Concrete seed the maze was generated with
        seed: i64,
    },

    /// The player reached the finish
    Completed {
        /// Moves it took
        moves: u32,
    },

    /// A solution overlay is now active
    SolutionReady {
        /// Path length
        steps: usize,
    },

    /// The solution overlay was removed
    SolutionCleared,

    // ============================================
    // System Messages
    // ============================================
    /// User-facing notice
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Request surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}

impl ConductorMessage {
    /// Convenience constructor for a notice
    pub fn notify(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self::Notify {
            level,
            message: message.into(),
        }
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

/// Difficulty shown in the stats line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Visited shading on
    Easy,
    /// Visited shading off
    Hard,
}

impl Mode {
    /// Mode for a shading toggle
    #[must_use]
    pub fn from_show_visited(show_visited: bool) -> Self {
        if show_visited {
            Self::Easy
        } else {
            Self::Hard
        }
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Hard => "Hard",
        }
    }
}

/// Everything a stats line needs, copied out of the Conductor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Successful moves
    pub moves: u32,
    /// Distinct cells entered
    pub visited: usize,
    /// Easy or Hard
    pub mode: Mode,
    /// Active maze columns
    pub width: usize,
    /// Active maze rows
    pub height: usize,
    /// Algorithm of the active maze
    pub algorithm: MazeAlgorithm,
    /// Algorithm used for the solution overlay
    pub pathfinding: PathfindingAlgorithm,
    /// Active theme
    pub theme: ThemeName,
    /// Concrete seed of the active maze, if one has been loaded
    pub seed: Option<i64>,
    /// Game phase
    pub status: GameStatus,
    /// Whether a generation request is outstanding
    pub loading: bool,
    /// Whether a solve request is outstanding
    pub solving: bool,
    /// Whether a solution overlay is showing
    pub solution_visible: bool,
}

impl GameSnapshot {
    /// `WxH`
    #[must_use]
    pub fn size_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Whether the game is complete
    #[must_use]
    pub fn completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    /// Snapshot of settings before any maze has been loaded
    #[must_use]
    pub fn empty(settings: &GameSettings, show_visited: bool) -> Self {
        Self {
            moves: 0,
            visited: 0,
            mode: Mode::from_show_visited(show_visited),
            width: settings.width as usize,
            height: settings.height as usize,
            algorithm: settings.algorithm,
            pathfinding: settings.pathfinding,
            theme: settings.theme,
            seed: None,
            status: GameStatus::Playing,
            loading: false,
            solving: false,
            solution_visible: false,
        }
    }
}
