//! Labyrinth TUI - Terminal surface for the labyrinth maze game
//!
//! This crate draws the board the core maps for it, turns key presses into
//! `SurfaceEvent`s, and owns the two surface-only features: the settings form
//! and PNG export.
//!
//! # Architecture
//!
//! - **App**: Event loop, layout and key bindings
//! - **ConductorClient**: Embedded Conductor plus its message channel
//! - **Display**: Stats line, notices and the completion banner
//! - **Board**: Box-drawing board widget
//! - **Settings form**: Modal form producing `GameSettings`
//! - **Export**: PNG rasterizer

pub mod app;
pub mod board;
pub mod conductor_client;
pub mod display;
pub mod export;
pub mod settings_form;
pub mod theme;

pub use app::App;
pub use conductor_client::ConductorClient;
