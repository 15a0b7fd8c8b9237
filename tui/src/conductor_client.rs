//! Conductor Client
//!
//! Thin wrapper around the Conductor for TUI integration.
//! This client embeds the Conductor directly (no network between them) and
//! provides a convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any game logic.
//! All rules live in the Conductor. The TUI's job is:
//! 1. Convert key presses to SurfaceEvents
//! 2. Send SurfaceEvents to Conductor
//! 3. Receive ConductorMessages
//! 4. Draw the board the Conductor maps for it

use tokio::sync::mpsc;

use labyrinth_core::{
    map_board, BoardVisual, Conductor, ConductorConfig, ConductorMessage, Direction,
    GameSettings, HttpMazeBackend, LabyrinthConfig, MazeBackend, SurfaceEvent, Theme, ThemeName,
};

/// Client for communicating with the embedded Conductor
pub struct ConductorClient<B: MazeBackend = HttpMazeBackend> {
    /// The embedded Conductor instance
    conductor: Conductor<B>,
    /// Receiver for messages from Conductor
    rx: mpsc::Receiver<ConductorMessage>,
}

impl ConductorClient<HttpMazeBackend> {
    /// Create a client talking to the configured maze service
    pub fn from_config(config: &LabyrinthConfig) -> Self {
        let backend = HttpMazeBackend::from_config(&config.backend);
        Self::new(backend, config.conductor_config())
    }
}

impl<B: MazeBackend + 'static> ConductorClient<B> {
    /// Create a new ConductorClient with embedded Conductor
    pub fn new(backend: B, config: ConductorConfig) -> Self {
        // Create channel for Conductor -> TUI messages
        let (tx, rx) = mpsc::channel(100);
        let conductor = Conductor::new(backend, config, tx);
        Self { conductor, rx }
    }

    /// Start the Conductor and request the first maze
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.conductor.start().await
    }

    /// Forward any event to the Conductor
    pub async fn send_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        self.conductor.handle_event(event).await
    }

    /// Move the player one cell
    pub async fn move_player(&mut self, direction: Direction) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Move(direction)).await
    }

    /// Restart the current maze
    pub async fn reset(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Reset).await
    }

    /// Ask for a fresh maze with the current settings
    pub async fn new_maze(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::NewMaze).await
    }

    /// Switch visited shading between Easy and Hard
    pub async fn toggle_visited(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::ToggleVisited).await
    }

    /// Apply a submitted settings form
    pub async fn apply_settings(&mut self, settings: GameSettings) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::ApplySettings(settings)).await
    }

    /// Switch to the next built-in theme
    pub async fn cycle_theme(&mut self) -> anyhow::Result<()> {
        let current = self.conductor.settings().theme;
        let index = ThemeName::ALL
            .iter()
            .position(|t| *t == current)
            .unwrap_or(0);
        let next = ThemeName::ALL[(index + 1) % ThemeName::ALL.len()];
        self.send_event(SurfaceEvent::SelectTheme(next)).await
    }

    /// Show the solution path, or hide it if it is showing
    pub async fn toggle_solution(&mut self) -> anyhow::Result<()> {
        let event = if self.conductor.solution().is_some() {
            SurfaceEvent::ClearSolution
        } else {
            SurfaceEvent::RequestSolution
        };
        self.send_event(event).await
    }

    /// Notify Conductor that user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Quit).await
    }

    /// Apply finished backend requests (must be called regularly)
    pub async fn poll_backend(&mut self) -> bool {
        self.conductor.poll_backend().await
    }

    /// Receive all pending messages from the Conductor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConductorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Map the current board, if a maze is loaded
    pub fn board(&self) -> Option<BoardVisual> {
        self.conductor.board_view().map(|view| map_board(&view))
    }

    /// Active theme
    pub fn theme(&self) -> &'static Theme {
        self.conductor.theme()
    }

    /// Current settings, for pre-filling the settings form
    pub fn settings(&self) -> &GameSettings {
        self.conductor.settings()
    }

    /// Whether a maze is being generated
    pub fn is_loading(&self) -> bool {
        self.conductor.is_loading()
    }

    /// Borrow the embedded Conductor
    pub fn conductor(&self) -> &Conductor<B> {
        &self.conductor
    }

    /// Borrow the embedded Conductor mutably
    pub fn conductor_mut(&mut self) -> &mut Conductor<B> {
        &mut self.conductor
    }
}
