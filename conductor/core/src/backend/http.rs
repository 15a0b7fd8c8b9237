//! HTTP Maze Service Backend
//!
//! Client for the remote maze service.
//!
//! # Service API
//!
//! - `GET /maze?height&width&mazeAlgorithm&seed` returns the maze as an array
//!   of rows of `{upEdge, downEdge, leftEdge, rightEdge}` cells
//! - `GET /solve?seed&height&width&mazeAlgorithm&pathfindingAlgorithm`
//!   returns `{"path": [{"x", "y"}, ...]}`
//!
//! Every failure (transport, status, body) is mapped onto a [`MazeError`] so
//! nothing above this module has to know about HTTP.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{normalize_uri, BackendConfig, MazeBackend};
use crate::error::{MazeError, MazeResult};
use crate::maze::{Cell, Maze, Position};
use crate::settings::{GenerationParams, SolveParams};
use crate::solution::SolveResponse;

/// HTTP client for the maze service
#[derive(Clone)]
pub struct HttpMazeBackend {
    /// Base URI
    api_uri: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpMazeBackend {
    /// Create a new backend for `api_uri`
    pub fn new(api_uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_uri: normalize_uri(api_uri.into()),
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create from `BackendConfig`
    #[must_use]
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.api_uri.clone(), config.timeout)
    }

    /// Create from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_config(&BackendConfig::from_env())
    }

    fn maze_url(&self) -> String {
        format!("{}/maze", self.api_uri)
    }

    fn solve_url(&self) -> String {
        format!("{}/solve", self.api_uri)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, String> {
        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| format!("request to {url} failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("service returned {status}: {}", body.trim()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("unreadable response body: {e}"))
    }
}

impl Default for HttpMazeBackend {
    fn default() -> Self {
        Self::from_config(&BackendConfig::default())
    }
}

#[async_trait]
impl MazeBackend for HttpMazeBackend {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(&self.api_uri)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }

    async fn generate(&self, params: &GenerationParams) -> MazeResult<Maze> {
        let query = [
            ("height", params.height.to_string()),
            ("width", params.width.to_string()),
            ("mazeAlgorithm", params.algorithm.to_string()),
            ("seed", params.seed.to_string()),
        ];
        tracing::debug!(?params, "requesting maze");

        let rows: Vec<Vec<Cell>> = self
            .get_json(self.maze_url(), &query)
            .await
            .map_err(MazeError::GenerationFailed)?;

        let maze = Maze::from_rows(rows)?;
        if maze.width() != params.width as usize || maze.height() != params.height as usize {
            tracing::warn!(
                requested_width = params.width,
                requested_height = params.height,
                width = maze.width(),
                height = maze.height(),
                "service returned a maze of a different size"
            );
        }
        Ok(maze)
    }

    async fn solve(&self, params: &SolveParams) -> MazeResult<Vec<Position>> {
        let maze = &params.maze;
        let query = [
            ("seed", maze.seed.to_string()),
            ("height", maze.height.to_string()),
            ("width", maze.width.to_string()),
            ("mazeAlgorithm", maze.algorithm.to_string()),
            ("pathfindingAlgorithm", params.pathfinding.to_string()),
        ];
        tracing::debug!(?params, "requesting solution");

        let body: SolveResponse = self
            .get_json(self.solve_url(), &query)
            .await
            .map_err(MazeError::SolveFailed)?;
        Ok(body.path)
    }
}
