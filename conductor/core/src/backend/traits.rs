//! Maze Backend Traits
//!
//! The seam between the Conductor and whatever produces mazes. The Conductor
//! only ever talks to a [`MazeBackend`]; the HTTP client and the test mocks
//! are interchangeable behind it.
//!
//! Implementations are responsible for turning whatever they receive into a
//! validated [`Maze`] before returning it, so the Conductor can replace the
//! active maze all-or-nothing.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::MazeResult;
use crate::maze::{Maze, Position};
use crate::settings::{GenerationParams, SolveParams};

/// Default maze service address
pub const DEFAULT_API_URI: &str = "http://localhost:8080";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of mazes and solutions
#[async_trait]
pub trait MazeBackend: Send + Sync {
    /// Backend name for logs and the status line
    fn name(&self) -> &str;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Generate a maze
    ///
    /// `params.seed` may still be the random marker; backends pass it through.
    async fn generate(&self, params: &GenerationParams) -> MazeResult<Maze>;

    /// Solve the maze described by `params`
    ///
    /// Returns the path from start to finish in order. Bounds against the
    /// active maze are checked by the caller, which knows which maze is on
    /// screen.
    async fn solve(&self, params: &SolveParams) -> MazeResult<Vec<Position>>;
}

/// Connection settings for the maze service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URI, without a trailing slash
    pub api_uri: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_uri: DEFAULT_API_URI.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl BackendConfig {
    /// Create a config for `api_uri`
    pub fn new(api_uri: impl Into<String>) -> Self {
        Self {
            api_uri: normalize_uri(api_uri.into()),
            ..Default::default()
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create from environment variables
    ///
    /// `LABYRINTH_API_URI` wins over the older `MAZE_API_URI`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_uri = std::env::var("LABYRINTH_API_URI")
            .or_else(|_| std::env::var("MAZE_API_URI"))
            .unwrap_or_else(|_| DEFAULT_API_URI.to_string());
        let timeout = std::env::var("LABYRINTH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Self::new(api_uri).with_timeout(timeout)
    }
}

/// Trim whitespace and trailing slashes so paths can be appended
pub(crate) fn normalize_uri(uri: String) -> String {
    let trimmed = uri.trim().trim_end_matches('/');
    if trimmed.len() == uri.len() {
        uri
    } else {
        trimmed.to_string()
    }
}
