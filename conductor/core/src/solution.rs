//! Solution Overlay
//!
//! A path from start to finish fetched from the solve service. It only ever
//! feeds rendering; the game controller never sees it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, MazeResult};
use crate::maze::{Maze, Position};

/// Ordered path with constant-time membership checks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolutionPath {
    steps: Vec<Position>,
    members: HashSet<Position>,
}

impl SolutionPath {
    /// Build a path, rejecting any step outside `maze`
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::SolveFailed`] if a coordinate does not fit the
    /// maze the path is meant for.
    pub fn for_maze(steps: Vec<Position>, maze: &Maze) -> MazeResult<Self> {
        if let Some(bad) = steps.iter().find(|p| !maze.contains(**p)) {
            return Err(MazeError::SolveFailed(format!(
                "path step {bad} lies outside the {}x{} maze",
                maze.width(),
                maze.height()
            )));
        }
        Ok(Self::from_steps(steps))
    }

    /// Build a path without validation
    #[must_use]
    pub fn from_steps(steps: Vec<Position>) -> Self {
        let members = steps.iter().copied().collect();
        Self { steps, members }
    }

    /// Steps in order
    #[must_use]
    pub fn steps(&self) -> &[Position] {
        &self.steps
    }

    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the path passes through `pos`
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.members.contains(&pos)
    }
}

/// Body returned by the solve endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolveResponse {
    /// Path coordinates, start first
    pub path: Vec<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    fn maze(width: usize, height: usize) -> Maze {
        Maze::from_rows(vec![vec![Cell::default(); width]; height]).unwrap()
    }

    #[test]
    fn test_membership() {
        let path = SolutionPath::from_steps(vec![Position::new(0, 0), Position::new(1, 0)]);
        assert!(path.contains(Position::new(1, 0)));
        assert!(!path.contains(Position::new(1, 1)));
        assert_eq!(path.len(), 2);
        assert!(!path.is_empty());
    }

    #[test]
    fn test_rejects_steps_outside_maze() {
        let err = SolutionPath::for_maze(
            vec![Position::new(0, 0), Position::new(3, 0)],
            &maze(3, 3),
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::SolveFailed(_)));
    }

    #[test]
    fn test_parses_service_body() {
        let body: SolveResponse =
            serde_json::from_str(r#"{"path":[{"x":0,"y":0},{"x":0,"y":1}]}"#).unwrap();
        let path = SolutionPath::for_maze(body.path, &maze(2, 2)).unwrap();
        assert_eq!(path.steps()[1], Position::new(0, 1));
    }
}
