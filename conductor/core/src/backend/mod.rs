//! Maze Backend Integration
//!
//! This module provides access to maze generation and solving through a
//! common trait interface.
//!
//! # Available Backends
//!
//! - **HTTP**: the remote maze service (default)
//!
//! # Usage
//!
//! ```ignore
//! use labyrinth_core::backend::{HttpMazeBackend, MazeBackend};
//!
//! let backend = HttpMazeBackend::from_env();
//! let maze = backend.generate(&GameSettings::default().generation_params()).await?;
//! ```

mod http;
mod traits;

pub use http::HttpMazeBackend;
pub use traits::{BackendConfig, MazeBackend, DEFAULT_API_URI, DEFAULT_TIMEOUT};
