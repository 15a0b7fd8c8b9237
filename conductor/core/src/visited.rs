//! Visited Tracker
//!
//! Boolean overlay with the same dimensions as the active maze, recording
//! every cell the player has occupied during the current game. Marks are
//! monotone: there is no way to unmark a single cell, only to start a fresh
//! tracker on reset.

use crate::error::{MazeError, MazeResult};
use crate::maze::Position;

/// Cells entered during the current game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitedTracker {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    count: usize,
}

impl VisitedTracker {
    /// All-false tracker for a `width` x `height` grid
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
            count: 0,
        }
    }

    /// Grid width
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Mark a cell as visited. Marking twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::OutOfBounds`] outside the grid.
    pub fn mark_visited(&mut self, x: usize, y: usize) -> MazeResult<()> {
        let idx = self.index(x, y)?;
        if !self.cells[idx] {
            self.cells[idx] = true;
            self.count += 1;
        }
        Ok(())
    }

    /// Whether a cell has been visited; false outside the grid
    #[must_use]
    pub fn is_visited(&self, x: usize, y: usize) -> bool {
        self.index(x, y).is_ok_and(|idx| self.cells[idx])
    }

    /// Convenience wrapper taking a [`Position`]
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.is_visited(pos.x, pos.y)
    }

    /// Number of visited cells
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    fn index(&self, x: usize, y: usize) -> MazeResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(MazeError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let visited = VisitedTracker::new(4, 3);
        assert_eq!(visited.count(), 0);
        assert!(!visited.is_visited(0, 0));
        assert_eq!((visited.width(), visited.height()), (4, 3));
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut visited = VisitedTracker::new(3, 3);
        visited.mark_visited(1, 2).unwrap();
        visited.mark_visited(1, 2).unwrap();
        assert_eq!(visited.count(), 1);
        assert!(visited.is_visited(1, 2));
        assert!(visited.contains(Position::new(1, 2)));
        assert!(!visited.is_visited(2, 1));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut visited = VisitedTracker::new(2, 2);
        assert!(matches!(
            visited.mark_visited(2, 0),
            Err(MazeError::OutOfBounds { x: 2, y: 0, .. })
        ));
        assert!(!visited.is_visited(5, 5));
        assert_eq!(visited.count(), 0);
    }
}
