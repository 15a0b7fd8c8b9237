//! Conductor - The Orchestration Core
//!
//! The Conductor owns everything about a running game that outlives a single
//! maze: the settings, the backend, the loading flag, the solution overlay and
//! the visited-shading toggle. It wraps a [`GameController`] and is the only
//! thing that calls into it.
//!
//! The Conductor is UI-agnostic. It communicates through:
//! - `SurfaceEvent`: user actions received FROM the surface
//! - `ConductorMessage`: updates sent TO the surface
//!
//! # Backend requests
//!
//! Generation and solving run as spawned tasks. Their replies come back over
//! an internal channel and are applied by [`Conductor::poll_backend`] (called
//! once per frame) or [`Conductor::next_backend_reply`] (awaits one reply).
//!
//! - While a generation is outstanding, moves, new-maze requests and settings
//!   changes are dropped. A dropped settings change raises a warning notice.
//!   Each generation carries a request id and only the reply for the
//!   outstanding id is applied.
//! - Solve requests never block anything. They are tagged with the maze epoch,
//!   which is bumped on every maze replacement, so a path for a maze that is
//!   no longer on screen is discarded.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::MazeBackend;
use crate::error::MazeResult;
use crate::events::SurfaceEvent;
use crate::game::{GameController, MoveOutcome};
use crate::maze::{Direction, Maze, Position};
use crate::messages::{ConductorMessage, GameSnapshot, Mode, NotifyLevel};
use crate::render::BoardView;
use crate::settings::{GameSettings, GenerationParams};
use crate::solution::SolutionPath;
use crate::theme::{Theme, ThemeName};

/// Conductor configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConductorConfig {
    /// Settings for the first maze
    pub settings: GameSettings,
    /// Whether visited shading starts switched on
    pub show_visited: bool,
    /// Whether to probe the backend before the first request
    pub health_check_on_start: bool,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            settings: GameSettings::default(),
            show_visited: true,
            health_check_on_start: true,
        }
    }
}

/// Reply from a spawned backend request
#[derive(Debug)]
enum BackendReply {
    Generated {
        request_id: u64,
        params: GenerationParams,
        result: MazeResult<Maze>,
    },
    Solved {
        epoch: u64,
        result: MazeResult<Vec<Position>>,
    },
}

/// The Conductor - headless orchestration core
pub struct Conductor<B: MazeBackend> {
    /// Maze service
    backend: Arc<B>,
    /// Player settings; size and algorithm apply on the next generation
    settings: GameSettings,
    /// Active game, absent until the first maze arrives
    game: Option<GameController>,
    /// Concrete parameters the active maze was generated with
    active_params: Option<GenerationParams>,
    /// Visited shading toggle
    show_visited: bool,
    /// Outstanding generation request id
    pending_generation: Option<u64>,
    /// Last issued generation request id
    last_request_id: u64,
    /// Bumped on every maze replacement
    epoch: u64,
    /// Epoch of the outstanding solve request
    pending_solve: Option<u64>,
    /// Solution overlay for the active maze
    solution: Option<SolutionPath>,
    /// Spawned backend requests whose reply has not been received
    in_flight: usize,
    /// Whether a probe runs in `start`
    health_check_on_start: bool,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<ConductorMessage>,
    /// Backend replies, fed by spawned tasks
    reply_tx: mpsc::UnboundedSender<BackendReply>,
    reply_rx: mpsc::UnboundedReceiver<BackendReply>,
}

impl<B: MazeBackend + 'static> Conductor<B> {
    /// Create a new Conductor with the given backend
    pub fn new(backend: B, config: ConductorConfig, tx: mpsc::Sender<ConductorMessage>) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            backend: Arc::new(backend),
            settings: config.settings,
            game: None,
            active_params: None,
            show_visited: config.show_visited,
            pending_generation: None,
            last_request_id: 0,
            epoch: 0,
            pending_solve: None,
            solution: None,
            in_flight: 0,
            health_check_on_start: config.health_check_on_start,
            tx,
            reply_tx,
            reply_rx,
        }
    }

    /// Active game, if a maze has been loaded
    pub fn game(&self) -> Option<&GameController> {
        self.game.as_ref()
    }

    /// Current settings
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Active theme colors
    pub fn theme(&self) -> &'static Theme {
        self.settings.theme.theme()
    }

    /// Whether visited shading is on
    pub fn show_visited(&self) -> bool {
        self.show_visited
    }

    /// Whether a generation request is outstanding
    pub fn is_loading(&self) -> bool {
        self.pending_generation.is_some()
    }

    /// Whether a solve request is outstanding
    pub fn is_solving(&self) -> bool {
        self.pending_solve.is_some()
    }

    /// Solution overlay, if one is showing
    pub fn solution(&self) -> Option<&SolutionPath> {
        self.solution.as_ref()
    }

    /// Number of maze replacements so far
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Concrete parameters of the active maze
    pub fn active_params(&self) -> Option<&GenerationParams> {
        self.active_params.as_ref()
    }

    /// Inputs for the render mapper, if a maze is loaded
    pub fn board_view(&self) -> Option<BoardView<'_>> {
        self.game.as_ref().map(|game| {
            BoardView::new(game, self.theme())
                .with_visited(self.show_visited)
                .with_solution(self.solution.as_ref())
        })
    }

    /// Statistics for the stats line
    pub fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = GameSnapshot::empty(&self.settings, self.show_visited);
        if let Some(game) = &self.game {
            snapshot.moves = game.move_count();
            snapshot.visited = game.visited().count();
            snapshot.width = game.maze().width();
            snapshot.height = game.maze().height();
            snapshot.status = game.status();
        }
        if let Some(params) = &self.active_params {
            snapshot.algorithm = params.algorithm;
            snapshot.seed = Some(params.seed);
        }
        snapshot.mode = Mode::from_show_visited(self.show_visited);
        snapshot.loading = self.is_loading();
        snapshot.solving = self.is_solving();
        snapshot.solution_visible = self.solution.is_some();
        snapshot
    }

    /// Start the Conductor and request the first maze
    ///
    /// Returns once the request is in flight; the maze arrives through
    /// [`Self::poll_backend`] or [`Self::next_backend_reply`].
    pub async fn start(&mut self) -> anyhow::Result<()> {
        if self.health_check_on_start && !self.backend.health_check().await {
            tracing::warn!(backend = self.backend.name(), "maze service not reachable");
            self.notify(
                NotifyLevel::Warning,
                "Maze service not reachable - the first maze may fail to load",
            )
            .await;
        }

        let params = self.settings.generation_params();
        self.begin_generation(params).await;
        Ok(())
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        if self.is_loading() && event.blocked_while_loading() {
            tracing::debug!(?event, "dropped while a maze is loading");
            if matches!(event, SurfaceEvent::ApplySettings(_)) {
                self.notify(
                    NotifyLevel::Warning,
                    "Settings not applied - a maze is still loading",
                )
                .await;
            }
            return Ok(());
        }

        match event {
            SurfaceEvent::Move(direction) => self.handle_move(direction).await,

            SurfaceEvent::Reset => {
                if let Some(game) = self.game.as_mut() {
                    game.reset();
                    self.send_state().await;
                }
            }

            SurfaceEvent::NewMaze => {
                let params = self.settings.generation_params().with_random_seed();
                self.begin_generation(params).await;
            }

            SurfaceEvent::ToggleVisited => {
                self.show_visited = !self.show_visited;
                self.send_state().await;
            }

            SurfaceEvent::ApplySettings(settings) => {
                if let Err(e) = settings.validate() {
                    tracing::warn!(error = %e, "rejected settings");
                    self.notify(NotifyLevel::Warning, &format!("Invalid settings: {e}"))
                        .await;
                    return Ok(());
                }
                let params = settings.generation_params();
                self.settings = settings;
                self.begin_generation(params).await;
            }

            SurfaceEvent::SelectTheme(theme) => self.select_theme(theme).await,

            SurfaceEvent::RequestSolution => self.request_solution().await,

            SurfaceEvent::ClearSolution => {
                if self.solution.take().is_some() {
                    self.send(ConductorMessage::SolutionCleared).await;
                    self.send_state().await;
                }
            }

            SurfaceEvent::Quit => self.shutdown().await?,
        }

        Ok(())
    }

    /// Apply every backend reply that has arrived, without waiting
    ///
    /// Returns true if anything was applied.
    pub async fn poll_backend(&mut self) -> bool {
        let mut replies = Vec::new();
        while let Ok(reply) = self.reply_rx.try_recv() {
            replies.push(reply);
        }
        if replies.is_empty() {
            return false;
        }
        for reply in replies {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply_reply(reply).await;
        }
        true
    }

    /// Wait for the next backend reply and apply it
    ///
    /// Returns false if nothing is outstanding. Replies that turn out to be
    /// stale still count as a reply.
    pub async fn next_backend_reply(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.reply_rx.recv().await {
            Some(reply) => {
                self.in_flight -= 1;
                self.apply_reply(reply).await;
                true
            }
            None => false,
        }
    }

    /// Shut down the Conductor
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        tracing::info!("conductor shutting down");
        self.send(ConductorMessage::Quit {
            message: Some("Goodbye!".to_string()),
        })
        .await;
        Ok(())
    }

    async fn handle_move(&mut self, direction: Direction) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        match game.attempt_move(direction) {
            MoveOutcome::Moved(_) => self.send_state().await,
            MoveOutcome::Finished(_) => {
                let moves = game.move_count();
                self.send_state().await;
                self.send(ConductorMessage::Completed { moves }).await;
                self.notify(
                    NotifyLevel::Success,
                    &format!("Maze complete in {moves} moves!"),
                )
                .await;
            }
            MoveOutcome::Blocked | MoveOutcome::Ignored => {}
        }
    }

    async fn select_theme(&mut self, theme: ThemeName) {
        if self.settings.theme != theme {
            tracing::debug!(%theme, "theme changed");
            self.settings.theme = theme;
            self.send_state().await;
        }
    }

    async fn begin_generation(&mut self, params: GenerationParams) {
        let params = params.resolve_seed(&mut rand::thread_rng());
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.pending_generation = Some(request_id);

        tracing::info!(
            request_id,
            width = params.width,
            height = params.height,
            algorithm = %params.algorithm,
            seed = params.seed,
            "requesting maze"
        );
        self.send(ConductorMessage::Loading { active: true }).await;

        let backend = Arc::clone(&self.backend);
        let reply_tx = self.reply_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = backend.generate(&params).await;
            let _ = reply_tx.send(BackendReply::Generated {
                request_id,
                params,
                result,
            });
        });
    }

    async fn request_solution(&mut self) {
        let Some(params) = self.active_params else {
            self.notify(NotifyLevel::Warning, "No maze to solve yet").await;
            return;
        };
        if self.pending_solve.is_some() {
            tracing::debug!("solve already in flight");
            return;
        }

        let epoch = self.epoch;
        let solve = params.solve_with(self.settings.pathfinding);
        self.pending_solve = Some(epoch);
        tracing::info!(epoch, pathfinding = %solve.pathfinding, "requesting solution");

        let backend = Arc::clone(&self.backend);
        let reply_tx = self.reply_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = backend.solve(&solve).await;
            let _ = reply_tx.send(BackendReply::Solved { epoch, result });
        });
        self.send_state().await;
    }

    async fn apply_reply(&mut self, reply: BackendReply) {
        match reply {
            BackendReply::Generated {
                request_id,
                params,
                result,
            } => self.apply_generated(request_id, params, result).await,
            BackendReply::Solved { epoch, result } => self.apply_solved(epoch, result).await,
        }
    }

    async fn apply_generated(
        &mut self,
        request_id: u64,
        params: GenerationParams,
        result: MazeResult<Maze>,
    ) {
        if self.pending_generation != Some(request_id) {
            tracing::debug!(request_id, "ignoring reply for a superseded request");
            return;
        }
        self.pending_generation = None;

        match result {
            Ok(maze) => {
                let (width, height) = (maze.width(), maze.height());
                if (width, height) != (params.width as usize, params.height as usize) {
                    tracing::warn!(
                        requested_width = params.width,
                        requested_height = params.height,
                        width,
                        height,
                        "service returned a different maze size"
                    );
                }
                match self.game.as_mut() {
                    Some(game) => {
                        game.replace_maze(maze);
                    }
                    None => self.game = Some(GameController::new(maze)),
                }
                self.epoch += 1;
                self.solution = None;
                self.pending_solve = None;
                self.active_params = Some(params);

                tracing::info!(width, height, seed = params.seed, "maze replaced");
                self.send(ConductorMessage::Loading { active: false }).await;
                self.send(ConductorMessage::MazeReplaced {
                    width,
                    height,
                    seed: params.seed,
                })
                .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "maze generation failed");
                self.send(ConductorMessage::Loading { active: false }).await;
                self.notify(NotifyLevel::Error, &format!("Could not load a new maze: {e}"))
                    .await;
            }
        }
        self.send_state().await;
    }

    async fn apply_solved(&mut self, epoch: u64, result: MazeResult<Vec<Position>>) {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "discarding solution for an old maze");
            return;
        }
        self.pending_solve = None;
        let Some(game) = self.game.as_ref() else {
            return;
        };

        match result.and_then(|steps| SolutionPath::for_maze(steps, game.maze())) {
            Ok(path) => {
                let steps = path.len();
                tracing::info!(steps, "solution ready");
                self.solution = Some(path);
                self.send(ConductorMessage::SolutionReady { steps }).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "solve failed");
                self.notify(NotifyLevel::Error, &format!("Could not solve the maze: {e}"))
                    .await;
            }
        }
        self.send_state().await;
    }

    async fn send_state(&self) {
        self.send(ConductorMessage::State {
            snapshot: self.snapshot(),
        })
        .await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ConductorMessage::notify(level, message)).await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ConductorMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}
