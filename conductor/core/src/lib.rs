//! Labyrinth Core - Headless Maze Game Engine
//!
//! This crate provides the game logic for labyrinth, completely independent of
//! any UI framework. It can drive a TUI, an image exporter, or run headless for
//! testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                            │
//! │     ┌───────────┐      ┌────────────┐     ┌──────────────┐   │
//! │     │    TUI    │      │ PNG export │     │   Headless   │   │
//! │     │ (ratatui) │      │  (image)   │     │   / tests    │   │
//! │     └─────┬─────┘      └─────┬──────┘     └──────┬───────┘   │
//! │           └──────────────────┴───────────────────┘           │
//! │                 SurfaceEvent (up)                             │
//! │               ConductorMessage (down)                         │
//! │                 BoardVisual (render mapper)                   │
//! └───────────────────────────┬───────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼───────────────────────────────────┐
//! │                      LABYRINTH CORE                            │
//! │  ┌────────────────────────┴─────────────────────────────────┐ │
//! │  │                       Conductor                           │ │
//! │  │  ┌────────────┐  ┌──────────┐  ┌──────────┐  ┌─────────┐ │ │
//! │  │  │    Game    │  │ Settings │  │ Solution │  │ Backend │ │ │
//! │  │  │ Controller │  │ & Theme  │  │ Overlay  │  │ (HTTP)  │ │ │
//! │  │  └────────────┘  └──────────┘  └──────────┘  └─────────┘ │ │
//! │  └──────────────────────────────────────────────────────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: Owns the game, the settings and the backend
//! - [`GameController`]: The movement and completion state machine
//! - [`Maze`]: Validated grid of cells with passability flags
//! - [`ConductorMessage`]: Messages sent from Conductor to UI surfaces
//! - [`SurfaceEvent`]: Events sent from UI surfaces to Conductor
//! - [`BoardVisual`]: Per-cell drawing instructions from the render mapper
//!
//! # Quick Start
//!
//! ```ignore
//! use labyrinth_core::{Conductor, HttpMazeBackend, SurfaceEvent, Direction};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = labyrinth_core::load_config()?;
//!     let (tx, mut rx) = mpsc::channel(100);
//!
//!     let backend = HttpMazeBackend::from_config(&config.backend);
//!     let mut conductor = Conductor::new(backend, config.conductor_config(), tx);
//!     conductor.start().await?;
//!
//!     loop {
//!         conductor.poll_backend().await;
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render message to UI
//!         }
//!         conductor.handle_event(SurfaceEvent::Move(Direction::Right)).await?;
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`maze`]: Cells, directions, positions and the validated grid
//! - [`visited`]: Cells entered during the current game
//! - [`game`]: Game controller state machine
//! - [`settings`]: Player settings, algorithms and request parameters
//! - [`theme`]: Built-in color themes
//! - [`solution`]: Solution overlay
//! - [`render`]: Render mapper
//! - [`backend`]: Maze service abstraction and HTTP client
//! - [`events`]: Events from UI surfaces to Conductor
//! - [`messages`]: Messages from Conductor to UI surfaces
//! - [`conductor`]: Main Conductor struct
//! - [`config`]: TOML, environment and CLI configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod conductor;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod maze;
pub mod messages;
pub mod render;
pub mod settings;
pub mod solution;
pub mod theme;
pub mod visited;

// Re-exports for convenience
pub use backend::{BackendConfig, HttpMazeBackend, MazeBackend};
pub use conductor::{Conductor, ConductorConfig};
pub use error::{MazeError, MazeResult};
pub use events::SurfaceEvent;
pub use game::{GameController, GameStatus, MoveOutcome};
pub use maze::{Cell, Direction, Maze, Position};
pub use messages::{ConductorMessage, GameSnapshot, Mode, NotifyLevel};
pub use render::{
    map_board, map_cell, BoardView, BoardVisual, Borders, CellVisual, Corners, Edge, Marker, Shade,
};
pub use settings::{
    GameSettings, GenerationParams, MazeAlgorithm, PathfindingAlgorithm, SettingsError,
    SolveParams,
};
pub use solution::SolutionPath;
pub use theme::{Rgb, Theme, ThemeName};
pub use visited::VisitedTracker;

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, LabyrinthConfig, LabyrinthToml,
};
