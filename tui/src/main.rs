//! Labyrinth TUI Entry Point
//!
//! Launches the terminal maze game.
//!
//! Usage:
//!   labyrinth [OPTIONS]
//!
//! Options:
//!   --api-uri <URI>        Maze service base URI
//!   --config <FILE>        Configuration file path
//!   --width <N>            Maze columns (5-50)
//!   --height <N>           Maze rows (5-50)
//!   --algorithm <NAME>     Generation algorithm
//!   --theme <NAME>         Color theme
//!   --seed <N>             Seed for the first maze (-1 = random)

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labyrinth_core::{load_config_from_path, ConfigOverrides, MazeAlgorithm, ThemeName};
use labyrinth_tui::App;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "labyrinth")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maze service base URI
    #[arg(long, value_name = "URI")]
    api_uri: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "LABYRINTH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maze columns
    #[arg(long)]
    width: Option<u32>,

    /// Maze rows
    #[arg(long)]
    height: Option<u32>,

    /// Generation algorithm (HuntAndKill, Prim, Kruskal, ...)
    #[arg(long)]
    algorithm: Option<MazeAlgorithm>,

    /// Color theme (classic, dark, ocean, forest, retro)
    #[arg(long)]
    theme: Option<ThemeName>,

    /// Seed for the first maze, -1 for random
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i64>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(uri) = &self.api_uri {
            overrides = overrides.with_api_uri(uri.clone());
        }
        if let Some(width) = self.width {
            overrides = overrides.with_width(width);
        }
        if let Some(height) = self.height {
            overrides = overrides.with_height(height);
        }
        if let Some(algorithm) = self.algorithm {
            overrides = overrides.with_algorithm(algorithm);
        }
        if let Some(theme) = self.theme {
            overrides = overrides.with_theme(theme);
        }
        if let Some(seed) = self.seed {
            overrides = overrides.with_seed(seed);
        }
        overrides
    }
}

/// Log file under the XDG state directory, falling back to the temp dir
fn log_file_path() -> PathBuf {
    dirs::state_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("labyrinth")
        .join("labyrinth.log")
}

/// The terminal is in raw mode, so logs go to a file instead of stderr
fn init_logging() -> anyhow::Result<PathBuf> {
    let path = log_file_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = File::options().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Configuration errors are reported before the terminal is taken over
    let mut config = load_config_from_path(args.config.clone())?;
    args.overrides().apply(&mut config)?;

    let log_path = init_logging()?;
    tracing::info!(
        source = ?config.source(),
        api_uri = %config.backend.api_uri,
        log = %log_path.display(),
        "starting labyrinth"
    );

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: labyrinth requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(&config);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Show goodbye message after TUI closes
    if let Some(goodbye) = app.goodbye() {
        println!("\n\x1b[35mlabyrinth:\x1b[0m {goodbye}\n");
    }

    // Propagate any errors
    result
}
