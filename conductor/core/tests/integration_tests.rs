//! Integration tests for the Conductor driving a configurable backend
//!
//! These tests exercise the full event → backend → reply → state path the way
//! a surface does, with failures and delays injected through the backend.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tokio::sync::{mpsc, Semaphore};

use labyrinth_core::render::{map_board, Marker};
use labyrinth_core::settings::RANDOM_SEED;
use labyrinth_core::{
    Cell, Conductor, ConductorConfig, ConductorMessage, Direction, GameSettings, GameStatus,
    GenerationParams, Maze, MazeAlgorithm, MazeBackend, MazeError, MazeResult, NotifyLevel,
    PathfindingAlgorithm, Position, SolveParams, SurfaceEvent,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Backend whose behavior each test can steer
#[derive(Clone, Default)]
struct ScriptedBackend {
    inner: Arc<Script>,
}

#[derive(Default)]
struct Script {
    /// Fail every generation request
    fail_generation: AtomicBool,
    /// Fail every solve request
    fail_solve: AtomicBool,
    /// Path to return instead of the computed one
    solve_override: Mutex<Option<Vec<Position>>>,
    /// Solve requests wait for a permit when set
    solve_gate: Option<Arc<Semaphore>>,
    /// Every generation request received
    generated: Mutex<Vec<GenerationParams>>,
    /// Every solve request received
    solved: Mutex<Vec<SolveParams>>,
    /// Number of solve calls
    solve_calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new() -> Self {
        Self::default()
    }

    fn with_solve_gate(gate: Arc<Semaphore>) -> Self {
        Self {
            inner: Arc::new(Script {
                solve_gate: Some(gate),
                ..Default::default()
            }),
        }
    }

    fn fail_generation(&self, fail: bool) {
        self.inner.fail_generation.store(fail, Ordering::SeqCst);
    }

    fn fail_solve(&self, fail: bool) {
        self.inner.fail_solve.store(fail, Ordering::SeqCst);
    }

    fn override_solution(&self, path: Vec<Position>) {
        *self.inner.solve_override.lock().unwrap() = Some(path);
    }

    fn generated(&self) -> Vec<GenerationParams> {
        self.inner.generated.lock().unwrap().clone()
    }

    fn solved(&self) -> Vec<SolveParams> {
        self.inner.solved.lock().unwrap().clone()
    }
}

/// Serpentine maze: every row is open left-right, and rows connect at
/// alternating ends. Deterministic for a given size.
fn serpentine(width: usize, height: usize) -> Maze {
    let mut rows = vec![vec![Cell::CLOSED; width]; height];
    for (y, row) in rows.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            if x > 0 {
                *cell = cell.with(Direction::Left, true);
            }
            if x + 1 < width {
                *cell = cell.with(Direction::Right, true);
            }
            let link_x = if y % 2 == 0 { width - 1 } else { 0 };
            if x == link_x && y + 1 < height {
                *cell = cell.with(Direction::Down, true);
            }
            let up_x = if y % 2 == 1 { width - 1 } else { 0 };
            if y > 0 && x == up_x {
                *cell = cell.with(Direction::Up, true);
            }
        }
    }
    Maze::from_rows(rows).unwrap()
}

fn serpentine_path(width: usize, height: usize) -> Vec<Position> {
    let mut path = Vec::new();
    for y in 0..height {
        if y % 2 == 0 {
            path.extend((0..width).map(|x| Position::new(x, y)));
        } else {
            path.extend((0..width).rev().map(|x| Position::new(x, y)));
        }
    }
    path
}

#[async_trait::async_trait]
impl MazeBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn generate(&self, params: &GenerationParams) -> MazeResult<Maze> {
        self.inner.generated.lock().unwrap().push(*params);
        if self.inner.fail_generation.load(Ordering::SeqCst) {
            return Err(MazeError::GenerationFailed(
                "service returned 503 Service Unavailable".to_string(),
            ));
        }
        Ok(serpentine(params.width as usize, params.height as usize))
    }

    async fn solve(&self, params: &SolveParams) -> MazeResult<Vec<Position>> {
        self.inner.solve_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.solved.lock().unwrap().push(*params);
        if let Some(gate) = &self.inner.solve_gate {
            let permit = gate.acquire().await.unwrap();
            permit.forget();
        }
        if self.inner.fail_solve.load(Ordering::SeqCst) {
            return Err(MazeError::SolveFailed("solver crashed".to_string()));
        }
        if let Some(path) = self.inner.solve_override.lock().unwrap().clone() {
            return Ok(path);
        }
        Ok(serpentine_path(
            params.maze.width as usize,
            params.maze.height as usize,
        ))
    }
}

fn config(width: u32, height: u32) -> ConductorConfig {
    ConductorConfig {
        settings: GameSettings {
            width,
            height,
            ..Default::default()
        },
        health_check_on_start: false,
        ..Default::default()
    }
}

async fn started(
    backend: ScriptedBackend,
    width: u32,
    height: u32,
) -> (
    Conductor<ScriptedBackend>,
    mpsc::Receiver<ConductorMessage>,
) {
    let (tx, rx) = mpsc::channel(1024);
    let mut conductor = Conductor::new(backend, config(width, height), tx);
    tokio_test::assert_ok!(conductor.start().await);
    assert!(conductor.next_backend_reply().await);
    (conductor, rx)
}

fn drain(rx: &mut mpsc::Receiver<ConductorMessage>) -> Vec<ConductorMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn notices(messages: &[ConductorMessage], level: NotifyLevel) -> Vec<String> {
    messages
        .iter()
        .filter_map(|m| match m {
            ConductorMessage::Notify { level: l, message } if *l == level => Some(message.clone()),
            _ => None,
        })
        .collect()
}

async fn press(conductor: &mut Conductor<ScriptedBackend>, dir: Direction, times: usize) {
    for _ in 0..times {
        conductor.handle_event(SurfaceEvent::Move(dir)).await.unwrap();
    }
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn test_failing_generation_leaves_game_untouched() {
    let backend = ScriptedBackend::new();
    let (mut conductor, mut rx) = started(backend.clone(), 6, 6).await;

    press(&mut conductor, Direction::Right, 3).await;
    let before_pos = conductor.game().unwrap().position();
    let before_moves = conductor.game().unwrap().move_count();
    let before_maze = conductor.game().unwrap().maze().clone();
    drain(&mut rx);

    backend.fail_generation(true);
    let request = GameSettings {
        width: 5,
        height: 5,
        algorithm: MazeAlgorithm::HuntAndKill,
        seed: RANDOM_SEED,
        ..Default::default()
    };
    conductor
        .handle_event(SurfaceEvent::ApplySettings(request))
        .await
        .unwrap();
    assert!(conductor.is_loading());
    assert!(conductor.next_backend_reply().await);

    let game = conductor.game().unwrap();
    assert!(!conductor.is_loading());
    assert_eq!(game.maze(), &before_maze);
    assert_eq!(game.position(), before_pos);
    assert_eq!(game.move_count(), before_moves);

    let messages = drain(&mut rx);
    let errors = notices(&messages, NotifyLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("maze generation failed"), "{}", errors[0]);

    let last = backend.generated().pop().unwrap();
    assert_eq!((last.width, last.height), (5, 5));
    assert_eq!(last.algorithm, MazeAlgorithm::HuntAndKill);
    assert!(last.seed >= 0, "random seed should be resolved before the request");
}

#[tokio::test]
async fn test_explicit_seed_is_sent_verbatim() {
    let backend = ScriptedBackend::new();
    let (mut conductor, _rx) = started(backend.clone(), 5, 5).await;

    let request = GameSettings {
        width: 9,
        height: 7,
        algorithm: MazeAlgorithm::Eller,
        seed: 31337,
        ..Default::default()
    };
    conductor
        .handle_event(SurfaceEvent::ApplySettings(request))
        .await
        .unwrap();
    conductor.next_backend_reply().await;

    let params = *conductor.active_params().unwrap();
    assert_eq!(params.seed, 31337);
    assert_eq!(params.algorithm, MazeAlgorithm::Eller);
    let snapshot = conductor.snapshot();
    assert_eq!(snapshot.size_label(), "9x7");
    assert_eq!(snapshot.algorithm, MazeAlgorithm::Eller);
    assert_eq!(snapshot.moves, 0);
    assert_eq!(snapshot.visited, 1);
}

#[tokio::test]
async fn test_new_maze_resets_progress_and_requests_random_seed() {
    let backend = ScriptedBackend::new();
    let (mut conductor, _rx) = started(backend.clone(), 5, 5).await;
    press(&mut conductor, Direction::Right, 2).await;
    assert_eq!(conductor.snapshot().moves, 2);

    conductor.handle_event(SurfaceEvent::NewMaze).await.unwrap();
    conductor.next_backend_reply().await;

    let snapshot = conductor.snapshot();
    assert_eq!(snapshot.moves, 0);
    assert_eq!(snapshot.visited, 1);
    assert_eq!(conductor.game().unwrap().position(), Position::new(0, 0));
    assert_eq!(conductor.epoch(), 2);
    assert_eq!(backend.generated().len(), 2);
}

#[tokio::test]
async fn test_input_suppressed_while_loading_but_reset_allowed() {
    let backend = ScriptedBackend::new();
    let (mut conductor, _rx) = started(backend.clone(), 5, 5).await;
    press(&mut conductor, Direction::Right, 2).await;

    conductor.handle_event(SurfaceEvent::NewMaze).await.unwrap();
    assert!(conductor.is_loading());

    press(&mut conductor, Direction::Right, 1).await;
    assert_eq!(conductor.snapshot().moves, 2);

    conductor.handle_event(SurfaceEvent::NewMaze).await.unwrap();
    conductor
        .handle_event(SurfaceEvent::ApplySettings(GameSettings::default()))
        .await
        .unwrap();

    conductor.handle_event(SurfaceEvent::Reset).await.unwrap();
    assert_eq!(conductor.snapshot().moves, 0);

    let epoch = conductor.epoch();
    assert!(conductor.next_backend_reply().await);
    assert!(!conductor.is_loading());
    assert!(!conductor.next_backend_reply().await);
    assert_eq!(conductor.epoch(), epoch + 1);
    assert_eq!(backend.generated().len(), 2);
}

#[tokio::test]
async fn test_settings_dropped_while_loading_warn() {
    let backend = ScriptedBackend::new();
    let (mut conductor, mut rx) = started(backend.clone(), 5, 5).await;
    drain(&mut rx);

    conductor.handle_event(SurfaceEvent::NewMaze).await.unwrap();
    let request = GameSettings {
        width: 7,
        ..Default::default()
    };
    conductor
        .handle_event(SurfaceEvent::ApplySettings(request))
        .await
        .unwrap();

    let warnings = notices(&drain(&mut rx), NotifyLevel::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("still loading"), "{}", warnings[0]);
    assert_eq!(conductor.settings().width, 5);

    assert!(conductor.next_backend_reply().await);
    assert_eq!(conductor.snapshot().size_label(), "5x5");
}

// =============================================================================
// Playing
// =============================================================================

#[tokio::test]
async fn test_play_through_serpentine() {
    let backend = ScriptedBackend::new();
    let (mut conductor, mut rx) = started(backend, 5, 5).await;
    drain(&mut rx);

    // walls block the way down from the start
    press(&mut conductor, Direction::Down, 1).await;
    assert_eq!(conductor.snapshot().moves, 0);

    for row in 0..5 {
        let dir = if row % 2 == 0 {
            Direction::Right
        } else {
            Direction::Left
        };
        press(&mut conductor, dir, 4).await;
        if row < 4 {
            press(&mut conductor, Direction::Down, 1).await;
        }
    }

    let snapshot = conductor.snapshot();
    assert_eq!(snapshot.status, GameStatus::Completed);
    assert_eq!(snapshot.moves, 24);
    assert_eq!(snapshot.visited, 25);

    // further moves are no-ops
    press(&mut conductor, Direction::Left, 3).await;
    assert_eq!(conductor.snapshot().moves, 24);

    let messages = drain(&mut rx);
    assert!(messages.contains(&ConductorMessage::Completed { moves: 24 }));
    assert_eq!(notices(&messages, NotifyLevel::Success).len(), 1);
}

#[tokio::test]
async fn test_visited_toggle_changes_mapping_only() {
    let backend = ScriptedBackend::new();
    let (mut conductor, _rx) = started(backend, 5, 5).await;
    press(&mut conductor, Direction::Right, 3).await;

    let shaded = map_board(&conductor.board_view().unwrap());
    assert!(shaded.get(0, 0).unwrap().shade.is_some());

    conductor
        .handle_event(SurfaceEvent::ToggleVisited)
        .await
        .unwrap();
    let plain = map_board(&conductor.board_view().unwrap());
    assert!(plain.get(0, 0).unwrap().shade.is_none());
    assert_eq!(conductor.snapshot().mode.label(), "Hard");
    assert_eq!(conductor.snapshot().visited, 4);
}

// =============================================================================
// Solution Overlay
// =============================================================================

#[tokio::test]
async fn test_solution_uses_active_maze_parameters() {
    let backend = ScriptedBackend::new();
    let (mut conductor, _rx) = started(backend.clone(), 6, 5).await;

    let mut settings = conductor.settings().clone();
    settings.pathfinding = PathfindingAlgorithm::Dijkstra;
    settings.seed = 8;
    conductor
        .handle_event(SurfaceEvent::ApplySettings(settings))
        .await
        .unwrap();
    conductor.next_backend_reply().await;

    conductor
        .handle_event(SurfaceEvent::RequestSolution)
        .await
        .unwrap();
    conductor.next_backend_reply().await;

    let sent = backend.solved().pop().unwrap();
    assert_eq!(sent.maze, *conductor.active_params().unwrap());
    assert_eq!(sent.pathfinding, PathfindingAlgorithm::Dijkstra);

    let solution = conductor.solution().unwrap();
    assert_eq!(solution.len(), 30);

    // the highlight never covers the player, start or finish cell
    let board = map_board(&conductor.board_view().unwrap());
    let highlighted: HashSet<Position> = board
        .cells
        .iter()
        .filter(|c| c.on_solution)
        .map(|c| c.position)
        .collect();
    assert_eq!(highlighted.len(), 28);
    assert!(!highlighted.contains(&Position::new(0, 0)));
    assert!(!highlighted.contains(&Position::new(5, 4)));

    // moving does not touch the overlay
    press(&mut conductor, Direction::Right, 1).await;
    assert!(conductor.solution().is_some());
}

#[tokio::test]
async fn test_stale_solution_discarded_after_new_maze() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = ScriptedBackend::with_solve_gate(Arc::clone(&gate));
    let (mut conductor, _rx) = started(backend.clone(), 5, 5).await;

    conductor
        .handle_event(SurfaceEvent::RequestSolution)
        .await
        .unwrap();
    assert!(conductor.is_solving());

    conductor.handle_event(SurfaceEvent::NewMaze).await.unwrap();
    assert!(conductor.next_backend_reply().await);
    assert_eq!(conductor.epoch(), 2);
    assert!(!conductor.is_solving());

    gate.add_permits(1);
    assert!(conductor.next_backend_reply().await);
    assert!(conductor.solution().is_none());
}

#[tokio::test]
async fn test_repeat_solve_request_ignored_while_in_flight() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = ScriptedBackend::with_solve_gate(Arc::clone(&gate));
    let (mut conductor, _rx) = started(backend.clone(), 5, 5).await;

    conductor
        .handle_event(SurfaceEvent::RequestSolution)
        .await
        .unwrap();
    conductor
        .handle_event(SurfaceEvent::RequestSolution)
        .await
        .unwrap();

    // movement is not blocked by a pending solve
    press(&mut conductor, Direction::Right, 1).await;
    assert_eq!(conductor.snapshot().moves, 1);

    gate.add_permits(1);
    conductor.next_backend_reply().await;
    assert_eq!(backend.inner.solve_calls.load(Ordering::SeqCst), 1);
    assert!(conductor.solution().is_some());
}

#[tokio::test]
async fn test_out_of_bounds_solution_rejected() {
    let backend = ScriptedBackend::new();
    let (mut conductor, mut rx) = started(backend.clone(), 5, 5).await;
    backend.override_solution(vec![Position::new(0, 0), Position::new(0, 5)]);

    conductor
        .handle_event(SurfaceEvent::RequestSolution)
        .await
        .unwrap();
    conductor.next_backend_reply().await;

    assert!(conductor.solution().is_none());
    let errors = notices(&drain(&mut rx), NotifyLevel::Error);
    assert!(errors.iter().any(|e| e.contains("maze solve failed")));
}

#[tokio::test]
async fn test_failed_solve_keeps_game_state() {
    let backend = ScriptedBackend::new();
    let (mut conductor, mut rx) = started(backend.clone(), 5, 5).await;
    press(&mut conductor, Direction::Right, 2).await;
    backend.fail_solve(true);

    conductor
        .handle_event(SurfaceEvent::RequestSolution)
        .await
        .unwrap();
    conductor.next_backend_reply().await;

    assert_eq!(conductor.snapshot().moves, 2);
    assert!(conductor.solution().is_none());
    assert!(!conductor.is_solving());
    assert_eq!(notices(&drain(&mut rx), NotifyLevel::Error).len(), 1);

    // the player may retry
    backend.fail_solve(false);
    conductor
        .handle_event(SurfaceEvent::RequestSolution)
        .await
        .unwrap();
    conductor.next_backend_reply().await;
    assert!(conductor.solution().is_some());
}

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn test_finish_marker_stops_pulsing_on_arrival() {
    let backend = ScriptedBackend::new();
    let (mut conductor, _rx) = started(backend, 5, 1).await;

    let board = map_board(&conductor.board_view().unwrap());
    assert!(matches!(
        board.get(4, 0).unwrap().markers[..],
        [Marker::Finish { pulsing: true, .. }]
    ));

    press(&mut conductor, Direction::Right, 4).await;
    let board = map_board(&conductor.board_view().unwrap());
    let finish = board.get(4, 0).unwrap();
    assert!(matches!(
        finish.markers[..],
        [Marker::Finish { pulsing: false, .. }, Marker::Player { .. }]
    ));
    assert!(matches!(
        board.get(0, 0).unwrap().markers[..],
        [Marker::Start { .. }]
    ));
}
