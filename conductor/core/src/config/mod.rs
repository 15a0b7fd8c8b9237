//! TOML Configuration File Support
//!
//! Centralized configuration loading, supporting a TOML file at
//! `~/.config/labyrinth/labyrinth.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the binary through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [service]
//! api_uri = "http://localhost:8080"
//! timeout_secs = 30
//!
//! [game]
//! width = 20
//! height = 20
//! cell_size = 24
//! algorithm = "HuntAndKill"
//! pathfinding = "AStar"
//! theme = "classic"
//! seed = -1
//! show_visited = true
//!
//! [export]
//! directory = "/home/me/Pictures"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendConfig;
use crate::conductor::ConductorConfig;
use crate::settings::{GameSettings, MazeAlgorithm, PathfindingAlgorithm};
use crate::theme::ThemeName;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Service section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceToml {
    /// Base URI of the maze service
    pub api_uri: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Game section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameToml {
    /// Maze columns
    pub width: Option<u32>,

    /// Maze rows
    pub height: Option<u32>,

    /// Pixels per cell for image export
    pub cell_size: Option<u32>,

    /// Generation algorithm name
    pub algorithm: Option<String>,

    /// Pathfinding algorithm name
    pub pathfinding: Option<String>,

    /// Theme key
    pub theme: Option<String>,

    /// Generation seed, -1 for random
    pub seed: Option<i64>,

    /// Whether visited shading starts on
    pub show_visited: Option<bool>,
}

/// Export section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportToml {
    /// Directory PNG exports are written to
    pub directory: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabyrinthToml {
    /// Maze service section
    pub service: ServiceToml,

    /// Game defaults section
    pub game: GameToml,

    /// Export section
    pub export: ExportToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Configuration gathered from every source
#[derive(Clone, Debug)]
pub struct LabyrinthConfig {
    /// Maze service connection
    pub backend: BackendConfig,

    /// Settings for the first maze
    pub settings: GameSettings,

    /// Whether visited shading starts on
    pub show_visited: bool,

    /// Directory PNG exports are written to
    pub export_dir: PathBuf,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for LabyrinthConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            settings: GameSettings::default(),
            show_visited: true,
            export_dir: default_export_dir(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl LabyrinthConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Conductor configuration derived from this config
    #[must_use]
    pub fn conductor_config(&self) -> ConductorConfig {
        ConductorConfig {
            settings: self.settings.clone(),
            show_visited: self.show_visited,
            ..Default::default()
        }
    }

    /// Check the final values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any game setting is out of
    /// range or the service URI is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.api_uri.is_empty() {
            return Err(ConfigError::ValidationError(
                "service api_uri must not be empty".to_string(),
            ));
        }
        self.settings
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/labyrinth/labyrinth.toml` or
/// `~/.config/labyrinth/labyrinth.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("labyrinth").join("labyrinth.toml"))
}

fn default_export_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed or holds
/// invalid values. A missing config file is not an error.
pub fn load_config() -> Result<LabyrinthConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read, parsed or
/// validated.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<LabyrinthConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration, reading environment variables through `env`
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<LabyrinthConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Start with defaults
    let mut config = LabyrinthConfig::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: LabyrinthToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env);

    config.validate()?;
    Ok(config)
}

fn parse_named<T>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ConfigError::ValidationError(format!("{field}: {e}")))
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut LabyrinthConfig, toml: &LabyrinthToml) -> Result<(), ConfigError> {
    // Service settings
    if let Some(ref uri) = toml.service.api_uri {
        config.backend = BackendConfig::new(uri.clone()).with_timeout(config.backend.timeout);
    }
    if let Some(secs) = toml.service.timeout_secs {
        config.backend.timeout = Duration::from_secs(secs);
    }

    // Game settings
    let game = &toml.game;
    if let Some(width) = game.width {
        config.settings.width = width;
    }
    if let Some(height) = game.height {
        config.settings.height = height;
    }
    if let Some(cell_size) = game.cell_size {
        config.settings.cell_size = cell_size;
    }
    if let Some(ref name) = game.algorithm {
        config.settings.algorithm = parse_named::<MazeAlgorithm>("game.algorithm", name)?;
    }
    if let Some(ref name) = game.pathfinding {
        config.settings.pathfinding =
            parse_named::<PathfindingAlgorithm>("game.pathfinding", name)?;
    }
    if let Some(ref name) = game.theme {
        config.settings.theme = parse_named::<ThemeName>("game.theme", name)?;
    }
    if let Some(seed) = game.seed {
        config.settings.seed = seed;
    }
    if let Some(show) = game.show_visited {
        config.show_visited = show;
    }

    // Export settings
    if let Some(ref dir) = toml.export.directory {
        config.export_dir = dir.clone();
    }

    Ok(())
}

/// Apply environment variable overrides to the config
///
/// Unparseable values are logged and skipped.
fn apply_env_config<F>(config: &mut LabyrinthConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    fn parsed<T: std::str::FromStr>(key: &str, value: String) -> Option<T> {
        let parsed = value.parse().ok();
        if parsed.is_none() {
            tracing::warn!(key, value = %value, "ignoring unparseable environment value");
        }
        parsed
    }

    // Service settings from environment
    if let Some(uri) = env("LABYRINTH_API_URI").or_else(|| env("MAZE_API_URI")) {
        config.backend = BackendConfig::new(uri).with_timeout(config.backend.timeout);
        config.source = ConfigSource::Env;
    }
    if let Some(secs) = env("LABYRINTH_TIMEOUT_SECS").and_then(|v| parsed::<u64>("LABYRINTH_TIMEOUT_SECS", v)) {
        config.backend.timeout = Duration::from_secs(secs);
        config.source = ConfigSource::Env;
    }

    // Game settings from environment
    if let Some(width) = env("LABYRINTH_WIDTH").and_then(|v| parsed::<u32>("LABYRINTH_WIDTH", v)) {
        config.settings.width = width;
        config.source = ConfigSource::Env;
    }
    if let Some(height) = env("LABYRINTH_HEIGHT").and_then(|v| parsed::<u32>("LABYRINTH_HEIGHT", v)) {
        config.settings.height = height;
        config.source = ConfigSource::Env;
    }
    if let Some(algorithm) =
        env("LABYRINTH_ALGORITHM").and_then(|v| parsed::<MazeAlgorithm>("LABYRINTH_ALGORITHM", v))
    {
        config.settings.algorithm = algorithm;
        config.source = ConfigSource::Env;
    }
    if let Some(theme) = env("LABYRINTH_THEME").and_then(|v| parsed::<ThemeName>("LABYRINTH_THEME", v)) {
        config.settings.theme = theme;
        config.source = ConfigSource::Env;
    }
    if let Some(seed) = env("LABYRINTH_SEED").and_then(|v| parsed::<i64>("LABYRINTH_SEED", v)) {
        config.settings.seed = seed;
        config.source = ConfigSource::Env;
    }

    // Export settings from environment
    if let Some(dir) = env("LABYRINTH_EXPORT_DIR") {
        config.export_dir = PathBuf::from(dir);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Service URI override
    pub api_uri: Option<String>,
    /// Width override
    pub width: Option<u32>,
    /// Height override
    pub height: Option<u32>,
    /// Algorithm override
    pub algorithm: Option<MazeAlgorithm>,
    /// Theme override
    pub theme: Option<ThemeName>,
    /// Seed override
    pub seed: Option<i64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set service URI override
    #[must_use]
    pub fn with_api_uri(mut self, uri: String) -> Self {
        self.api_uri = Some(uri);
        self
    }

    /// Set width override
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set height override
    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set algorithm override
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: MazeAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Set theme override
    #[must_use]
    pub fn with_theme(mut self, theme: ThemeName) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Set seed override
    #[must_use]
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.api_uri.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.algorithm.is_none()
            && self.theme.is_none()
            && self.seed.is_none()
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the result is out of range.
    pub fn apply(&self, config: &mut LabyrinthConfig) -> Result<(), ConfigError> {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref uri) = self.api_uri {
            config.backend = BackendConfig::new(uri.clone()).with_timeout(config.backend.timeout);
        }
        if let Some(width) = self.width {
            config.settings.width = width;
        }
        if let Some(height) = self.height {
            config.settings.height = height;
        }
        if let Some(algorithm) = self.algorithm {
            config.settings.algorithm = algorithm;
        }
        if let Some(theme) = self.theme {
            config.settings.theme = theme;
        }
        if let Some(seed) = self.seed {
            config.settings.seed = seed;
        }

        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = LabyrinthConfig::default();
        assert_eq!(config.backend.api_uri, "http://localhost:8080");
        assert_eq!(config.settings, GameSettings::default());
        assert!(config.show_visited);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("labyrinth"));
            assert!(p.to_string_lossy().ends_with("labyrinth.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[service]
api_uri = "http://mazes.internal:9000/"
timeout_secs = 5

[game]
width = 30
height = 12
cell_size = 40
algorithm = "kruskal"
pathfinding = "BFS"
theme = "ocean"
seed = 1234
show_visited = false

[export]
directory = "/tmp/mazes"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.backend.api_uri, "http://mazes.internal:9000");
        assert_eq!(config.backend.timeout, Duration::from_secs(5));
        assert_eq!(config.settings.width, 30);
        assert_eq!(config.settings.height, 12);
        assert_eq!(config.settings.cell_size, 40);
        assert_eq!(config.settings.algorithm, MazeAlgorithm::Kruskal);
        assert_eq!(config.settings.pathfinding, PathfindingAlgorithm::Bfs);
        assert_eq!(config.settings.theme, ThemeName::Ocean);
        assert_eq!(config.settings.seed, 1234);
        assert!(!config.show_visited);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/mazes"));
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = write_toml("[game]\nwidth = 8\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.settings.width, 8);
        assert_eq!(config.settings.height, GameSettings::default().height);
        assert_eq!(config.backend.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/labyrinth.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    // =========================================================================
    // Error Tests
    // =========================================================================

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[game\nwidth = \"wide\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_out_of_range_is_validation_error() {
        let file = write_toml("[game]\nwidth = 51\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_algorithm_is_validation_error() {
        let file = write_toml("[game]\nalgorithm = \"Teleport\"\n");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(err.to_string().contains("game.algorithm"));
    }

    // =========================================================================
    // Environment Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[service]\napi_uri = \"http://from-file\"\n[game]\nwidth = 10\n");
        let env: HashMap<&str, &str> = [
            ("MAZE_API_URI", "http://legacy"),
            ("LABYRINTH_WIDTH", "25"),
            ("LABYRINTH_THEME", "forest"),
            ("LABYRINTH_SEED", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = load_config_with_env(Some(file.path().to_path_buf()), |k| {
            env.get(k).map(|v| (*v).to_string())
        })
        .unwrap();

        assert_eq!(config.backend.api_uri, "http://legacy");
        assert_eq!(config.settings.width, 25);
        assert_eq!(config.settings.theme, ThemeName::Forest);
        assert_eq!(config.settings.seed, -1);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_primary_api_env_wins() {
        let config = load_config_with_env(None, |k| match k {
            "LABYRINTH_API_URI" => Some("http://primary".to_string()),
            "MAZE_API_URI" => Some("http://legacy".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.backend.api_uri, "http://primary");
    }

    // =========================================================================
    // CLI Override Tests
    // =========================================================================

    #[test]
    fn test_cli_overrides() {
        let mut config = LabyrinthConfig::default();
        ConfigOverrides::new()
            .with_api_uri("http://cli:1".to_string())
            .with_width(7)
            .with_height(9)
            .with_algorithm(MazeAlgorithm::Wilson)
            .with_theme(ThemeName::Dark)
            .with_seed(99)
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.source(), ConfigSource::Cli);
        assert_eq!(config.backend.api_uri, "http://cli:1");
        assert_eq!((config.settings.width, config.settings.height), (7, 9));
        assert_eq!(config.settings.algorithm, MazeAlgorithm::Wilson);
        assert_eq!(config.conductor_config().settings.seed, 99);
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = LabyrinthConfig::default();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_override_validated() {
        let mut config = LabyrinthConfig::default();
        let result = ConfigOverrides::new().with_width(2).with_height(2).apply(&mut config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
