//! Surface Events
//!
//! Events sent from UI surfaces to the Conductor. Surfaces report what the
//! user asked for; the Conductor decides whether and how it happens.

use serde::{Deserialize, Serialize};

use crate::maze::Direction;
use crate::settings::GameSettings;
use crate::theme::ThemeName;

/// Events from UI Surface to Conductor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    // ============================================
    // Game Input
    // ============================================
    /// Move the player one cell
    Move(Direction),

    /// Restart the current maze
    Reset,

    /// Generate a new maze with the current size and algorithm
    NewMaze,

    /// Switch visited shading on or off
    ToggleVisited,

    // ============================================
    // Settings
    // ============================================
    /// Apply a full settings form and generate a matching maze
    ApplySettings(GameSettings),

    /// Change only the theme
    SelectTheme(ThemeName),

    // ============================================
    // Solution Overlay
    // ============================================
    /// Fetch and show the solution path
    RequestSolution,

    /// Hide the solution path
    ClearSolution,

    // ============================================
    // Lifecycle
    // ============================================
    /// User asked to leave
    Quit,
}

impl SurfaceEvent {
    /// Whether this event asks for a new maze or moves the player
    ///
    /// Such events are dropped while a generation is outstanding.
    #[must_use]
    pub fn blocked_while_loading(&self) -> bool {
        matches!(self, Self::Move(_) | Self::NewMaze | Self::ApplySettings(_))
    }
}
