//! Maze Errors
//!
//! Error taxonomy shared by the model, the game controller and the maze
//! service client.
//!
//! `OutOfBounds` and `MalformedMaze` are invariant checks: they reject the
//! data that triggered them but never take the client down. `GenerationFailed`
//! and `SolveFailed` are expected, recoverable conditions that surfaces report
//! to the user while the current game stays exactly as it was.

use thiserror::Error;

/// Errors produced by the maze core
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// A coordinate fell outside the grid
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column
        x: i64,
        /// Requested row
        y: i64,
        /// Grid width
        width: usize,
        /// Grid height
        height: usize,
    },

    /// An externally supplied maze failed validation
    #[error("malformed maze: {0}")]
    MalformedMaze(String),

    /// The generation service failed or returned an unusable body
    #[error("maze generation failed: {0}")]
    GenerationFailed(String),

    /// The solve service failed or returned an unusable path
    #[error("maze solve failed: {0}")]
    SolveFailed(String),
}

impl MazeError {
    /// Whether the user can simply try the same action again
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::GenerationFailed(_) | Self::SolveFailed(_))
    }
}

/// Result alias for maze operations
pub type MazeResult<T> = Result<T, MazeError>;
