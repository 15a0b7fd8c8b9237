//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ConductorMessages and used for rendering.
//!
//! The TUI never inspects the game directly for its panels; the stats line,
//! the notice bar and the completion banner are all driven from here.

use std::time::{Duration, Instant};

use labyrinth_core::{ConductorMessage, GameSnapshot, NotifyLevel};

/// How long a notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// A notification to display
#[derive(Clone, Debug)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// When the notice arrived
    pub shown_at: Instant,
}

impl DisplayNotification {
    /// Create a notice shown from now
    pub fn new(level: NotifyLevel, message: String) -> Self {
        Self {
            level,
            message,
            shown_at: Instant::now(),
        }
    }

    /// Whether the notice has been up for longer than `ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.shown_at.elapsed() >= ttl
    }
}

/// The full display state for the TUI
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Latest statistics (None until the first State message)
    pub snapshot: Option<GameSnapshot>,
    /// Whether a maze is being generated
    pub loading: bool,
    /// Move count of the last completion, while the banner is up
    pub completed_moves: Option<u32>,
    /// Length of the active solution overlay
    pub solution_steps: Option<usize>,
    /// Seed of the active maze
    pub seed: Option<i64>,
    /// Current notice (if any)
    pub notification: Option<DisplayNotification>,
    /// Set once the Conductor asked the surface to quit
    pub quit_requested: bool,
    /// Goodbye text from the Conductor
    pub goodbye: Option<String>,
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a ConductorMessage to update display state
    pub fn apply_message(&mut self, msg: ConductorMessage) {
        match msg {
            ConductorMessage::State { snapshot } => {
                if !snapshot.completed() {
                    self.completed_moves = None;
                }
                self.loading = snapshot.loading;
                self.snapshot = Some(snapshot);
            }
            ConductorMessage::Loading { active } => {
                self.loading = active;
            }
            ConductorMessage::MazeReplaced { seed, .. } => {
                self.seed = Some(seed);
                self.completed_moves = None;
                self.solution_steps = None;
            }
            ConductorMessage::Completed { moves } => {
                self.completed_moves = Some(moves);
            }
            ConductorMessage::SolutionReady { steps } => {
                self.solution_steps = Some(steps);
            }
            ConductorMessage::SolutionCleared => {
                self.solution_steps = None;
            }
            ConductorMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification::new(level, message));
            }
            ConductorMessage::Quit { message } => {
                self.quit_requested = true;
                self.goodbye = message;
            }
        }
    }

    /// Drop the notice once it has been visible long enough
    pub fn update(&mut self) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(NOTICE_TTL))
        {
            self.notification = None;
        }
    }

    /// Whether the completion banner should be shown
    pub fn show_completion(&self) -> bool {
        self.completed_moves.is_some()
    }

    /// Stats line text
    pub fn stats_line(&self) -> String {
        let Some(snapshot) = &self.snapshot else {
            return "Waiting for the first maze...".to_string();
        };
        let seed = self
            .seed
            .or(snapshot.seed)
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        let mut line = format!(
            "Moves {} | Visited {} | {} | {} | {} | {} | seed {}",
            snapshot.moves,
            snapshot.visited,
            snapshot.mode.label(),
            snapshot.size_label(),
            snapshot.algorithm,
            snapshot.theme.label(),
            seed,
        );
        if let Some(steps) = self.solution_steps {
            line.push_str(&format!(" | Solution {steps} ({})", snapshot.pathfinding));
        } else if snapshot.solving {
            line.push_str(" | Solving...");
        }
        line
    }
}
