//! Game Settings
//!
//! The validated settings a player can change from the settings panel, plus
//! the closed sets of algorithm names the maze service understands.
//!
//! Everything that leaves the client as a request parameter is an enum here;
//! free-form strings only exist at the parsing edge (`FromStr`), where bad
//! input turns into a [`SettingsError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::theme::ThemeName;

/// Smallest accepted maze width/height
pub const MIN_DIMENSION: u32 = 5;
/// Largest accepted maze width/height
pub const MAX_DIMENSION: u32 = 50;
/// Smallest exported cell size in pixels
pub const MIN_CELL_SIZE: u32 = 6;
/// Largest exported cell size in pixels
pub const MAX_CELL_SIZE: u32 = 100;
/// Seed value asking for a fresh random maze
pub const RANDOM_SEED: i64 = -1;

/// Errors raised while validating or parsing settings
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// Width or height outside `[MIN_DIMENSION, MAX_DIMENSION]`
    #[error(
        "{field} must be between {min} and {max}, got {value}",
        min = MIN_DIMENSION,
        max = MAX_DIMENSION
    )]
    DimensionOutOfRange {
        /// `width` or `height`
        field: &'static str,
        /// Rejected value
        value: u32,
    },

    /// Cell size outside `[MIN_CELL_SIZE, MAX_CELL_SIZE]`
    #[error(
        "cell size must be between {min} and {max} px, got {0}",
        min = MIN_CELL_SIZE,
        max = MAX_CELL_SIZE
    )]
    CellSizeOutOfRange(u32),

    /// Seed below -1
    #[error("seed must be -1 (random) or non-negative, got {0}")]
    InvalidSeed(i64),

    /// Unknown maze generation algorithm
    #[error("unknown maze algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Unknown pathfinding algorithm
    #[error("unknown pathfinding algorithm: {0}")]
    UnknownPathfinding(String),

    /// Unknown theme name
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
}

/// Maze generation strategies offered by the service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeAlgorithm {
    /// Hunt-and-kill random walk
    #[default]
    HuntAndKill,
    /// Depth-first search with backtracking
    RecursiveBacktracker,
    /// Randomized Prim
    Prim,
    /// Randomized Kruskal
    Kruskal,
    /// Aldous-Broder uniform spanning tree
    AldousBroder,
    /// Wilson's loop-erased random walk
    Wilson,
    /// Binary tree
    BinaryTree,
    /// Sidewinder
    Sidewinder,
    /// Growing tree
    GrowingTree,
    /// Eller's row-by-row
    Eller,
}

impl MazeAlgorithm {
    /// Every algorithm, in menu order
    pub const ALL: [MazeAlgorithm; 10] = [
        Self::HuntAndKill,
        Self::RecursiveBacktracker,
        Self::Prim,
        Self::Kruskal,
        Self::AldousBroder,
        Self::Wilson,
        Self::BinaryTree,
        Self::Sidewinder,
        Self::GrowingTree,
        Self::Eller,
    ];

    /// Name sent as the `mazeAlgorithm` query parameter
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HuntAndKill => "HuntAndKill",
            Self::RecursiveBacktracker => "RecursiveBacktracker",
            Self::Prim => "Prim",
            Self::Kruskal => "Kruskal",
            Self::AldousBroder => "AldousBroder",
            Self::Wilson => "Wilson",
            Self::BinaryTree => "BinaryTree",
            Self::Sidewinder => "Sidewinder",
            Self::GrowingTree => "GrowingTree",
            Self::Eller => "Eller",
        }
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MazeAlgorithm {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownAlgorithm(s.to_string()))
    }
}

/// Pathfinding strategies offered by the solve endpoint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathfindingAlgorithm {
    /// A* with Manhattan heuristic
    #[default]
    AStar,
    /// Breadth-first search
    #[serde(rename = "BFS")]
    Bfs,
    /// Depth-first search
    #[serde(rename = "DFS")]
    Dfs,
    /// Dijkstra
    Dijkstra,
}

impl PathfindingAlgorithm {
    /// Every algorithm, in menu order
    pub const ALL: [PathfindingAlgorithm; 4] = [Self::AStar, Self::Bfs, Self::Dfs, Self::Dijkstra];

    /// Name sent as the `pathfindingAlgorithm` query parameter
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AStar => "AStar",
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Dijkstra => "Dijkstra",
        }
    }
}

impl fmt::Display for PathfindingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathfindingAlgorithm {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownPathfinding(s.to_string()))
    }
}

/// Player-adjustable settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Maze columns
    pub width: u32,
    /// Maze rows
    pub height: u32,
    /// Pixels per cell for image export
    pub cell_size: u32,
    /// Generation algorithm
    pub algorithm: MazeAlgorithm,
    /// Pathfinding algorithm for the solution overlay
    pub pathfinding: PathfindingAlgorithm,
    /// Visual theme
    pub theme: ThemeName,
    /// Generation seed, [`RANDOM_SEED`] for a fresh one
    pub seed: i64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
            cell_size: 24,
            algorithm: MazeAlgorithm::default(),
            pathfinding: PathfindingAlgorithm::default(),
            theme: ThemeName::default(),
            seed: RANDOM_SEED,
        }
    }
}

impl GameSettings {
    /// Check every numeric field against its bounds
    ///
    /// # Errors
    ///
    /// Returns the first field that is out of range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_dimension("width", self.width)?;
        check_dimension("height", self.height)?;
        if !(MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&self.cell_size) {
            return Err(SettingsError::CellSizeOutOfRange(self.cell_size));
        }
        if self.seed < RANDOM_SEED {
            return Err(SettingsError::InvalidSeed(self.seed));
        }
        Ok(())
    }

    /// Generation parameters for these settings
    #[must_use]
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            width: self.width,
            height: self.height,
            algorithm: self.algorithm,
            seed: self.seed,
        }
    }
}

fn check_dimension(field: &'static str, value: u32) -> Result<(), SettingsError> {
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::DimensionOutOfRange { field, value })
    }
}

/// Parameters of one generation request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maze columns
    pub width: u32,
    /// Maze rows
    pub height: u32,
    /// Generation algorithm
    pub algorithm: MazeAlgorithm,
    /// Seed, [`RANDOM_SEED`] until resolved
    pub seed: i64,
}

impl GenerationParams {
    /// Same parameters with a random seed requested
    #[must_use]
    pub fn with_random_seed(mut self) -> Self {
        self.seed = RANDOM_SEED;
        self
    }

    /// Replace a random seed request with a concrete seed
    ///
    /// Keeping the concrete seed lets a later solve request describe exactly
    /// the maze that is on screen.
    #[must_use]
    pub fn resolve_seed<R: rand::Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        if self.seed == RANDOM_SEED {
            self.seed = i64::from(rng.gen::<u32>());
        }
        self
    }

    /// Parameters for solving the maze these parameters generate
    #[must_use]
    pub fn solve_with(self, pathfinding: PathfindingAlgorithm) -> SolveParams {
        SolveParams {
            maze: self,
            pathfinding,
        }
    }
}

/// Parameters of one solve request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveParams {
    /// The maze to solve, as it was generated
    pub maze: GenerationParams,
    /// Pathfinding algorithm
    pub pathfinding: PathfindingAlgorithm,
}
