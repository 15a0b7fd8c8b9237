//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - ConductorClient for the game rules and the maze service
//! - DisplayState for the stats line, notices and the completion banner
//!
//! The App:
//! 1. Converts key presses to SurfaceEvents
//! 2. Sends events to the embedded Conductor via ConductorClient
//! 3. Receives ConductorMessages and updates DisplayState
//! 4. Renders the mapped board plus DisplayState

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use labyrinth_core::{
    BoardVisual, ConductorMessage, Direction, HttpMazeBackend, LabyrinthConfig, MazeBackend,
    NotifyLevel,
};

use crate::board::{board_size, centered, BoardWidget};
use crate::conductor_client::ConductorClient;
use crate::display::{DisplayNotification, DisplayState};
use crate::export::export_png;
use crate::settings_form::{FormAction, FormError, SettingsForm, FORM_HEIGHT, FORM_WIDTH};
use crate::theme::{notify_color, ACCENT, BORDER_GRAY, DIM_GRAY, LOADING_BLUE, SUCCESS_GREEN};

/// Frames per finish-marker pulse phase
const PULSE_FRAMES: u64 = 8;

/// Key hints shown on the last line
const HELP: &str =
    " ←↑↓→/wasd move | r reset | n new | v visited | p solution | t theme | o settings | e export | q quit";

/// Main application state
pub struct App<B: MazeBackend = HttpMazeBackend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Goodbye message to show on exit
    goodbye_message: Option<String>,
    /// Whether the Conductor has been started
    started: bool,

    // === Conductor Integration ===
    /// Client for communicating with the embedded Conductor
    conductor: ConductorClient<B>,
    /// Display state derived from ConductorMessages
    display: DisplayState,
    /// Board mapped for the current frame
    board: Option<BoardVisual>,

    // === UI State ===
    /// Open settings form, if any
    settings_form: Option<SettingsForm>,
    /// Where PNG exports go
    export_dir: PathBuf,
    /// Frame counter driving the finish marker pulse
    frame: u64,
}

impl App<HttpMazeBackend> {
    /// Create a new App from the loaded configuration
    pub fn new(config: &LabyrinthConfig) -> Self {
        Self::with_client(
            ConductorClient::from_config(config),
            config.export_dir.clone(),
        )
    }
}

impl<B: MazeBackend + 'static> App<B> {
    /// Create an App around an existing client
    pub fn with_client(conductor: ConductorClient<B>, export_dir: PathBuf) -> Self {
        Self {
            running: true,
            goodbye_message: None,
            started: false,
            conductor,
            display: DisplayState::new(),
            board: None,
            settings_form: None,
            export_dir,
            frame: 0,
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let frame_duration = Duration::from_millis(33);

        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        terminal.draw(|f| self.draw(f))?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            // Only handle Press events (not Release or Repeat)
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key).await;
                            }
                            Event::Resize(width, height) => {
                                tracing::debug!(width, height, "terminal resized");
                            }
                            _ => {}
                        }
                    }
                }

                // Frame tick - start the Conductor on the first one
                _ = tokio::time::sleep(Duration::from_millis(16)) => {
                    self.ensure_started().await;
                }
            }

            self.update().await;
            terminal.draw(|f| self.draw(f))?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Start the Conductor once
    pub async fn ensure_started(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if let Err(e) = self.conductor.start().await {
            tracing::warn!("Conductor start error: {}", e);
        }
    }

    /// Apply backend replies, drain messages and remap the board
    pub async fn update(&mut self) {
        self.conductor.poll_backend().await;
        self.process_conductor_messages();
        self.display.update();
        self.board = self.conductor.board();
        self.frame = self.frame.wrapping_add(1);

        if self.display.quit_requested {
            self.running = false;
        }
    }

    /// Process all pending messages from the Conductor
    fn process_conductor_messages(&mut self) {
        for msg in self.conductor.recv_all() {
            if let ConductorMessage::Quit { message } = &msg {
                self.goodbye_message.clone_from(message);
            }
            self.display.apply_message(msg);
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if let Some(form) = self.settings_form.as_mut() {
            match form.handle_key(key) {
                FormAction::None => {}
                FormAction::Cancel => self.settings_form = None,
                FormAction::Apply(_) if self.conductor.is_loading() => {
                    form.reject(&FormError::StillLoading);
                }
                FormAction::Apply(settings) => {
                    self.settings_form = None;
                    if let Err(e) = self.conductor.apply_settings(settings).await {
                        tracing::warn!("Failed to apply settings: {}", e);
                    }
                }
            }
            return;
        }

        let result = match key.code {
            // Quit
            KeyCode::Esc | KeyCode::Char('q') => self.quit().await,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit().await
            }

            // Movement
            KeyCode::Up | KeyCode::Char('w') => self.conductor.move_player(Direction::Up).await,
            KeyCode::Down | KeyCode::Char('s') => {
                self.conductor.move_player(Direction::Down).await
            }
            KeyCode::Left | KeyCode::Char('a') => {
                self.conductor.move_player(Direction::Left).await
            }
            KeyCode::Right | KeyCode::Char('d') => {
                self.conductor.move_player(Direction::Right).await
            }

            // Game actions
            KeyCode::Char('r') => self.conductor.reset().await,
            KeyCode::Char('n') => self.conductor.new_maze().await,
            KeyCode::Char('v') => self.conductor.toggle_visited().await,
            KeyCode::Char('p') => self.conductor.toggle_solution().await,
            KeyCode::Char('t') => self.conductor.cycle_theme().await,

            // Surface actions
            KeyCode::Char('o') => {
                self.settings_form = Some(SettingsForm::from_settings(self.conductor.settings()));
                Ok(())
            }
            KeyCode::Char('e') => {
                self.export();
                Ok(())
            }

            _ => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "event not handled");
        }
    }

    async fn quit(&mut self) -> anyhow::Result<()> {
        self.running = false;
        self.conductor.request_quit().await
    }

    /// Write the current board to a PNG file
    fn export(&mut self) {
        let board = self.conductor.board();
        let notice = match board {
            None => DisplayNotification::new(NotifyLevel::Warning, "No maze to export yet".into()),
            Some(board) => {
                let at = chrono::Local::now().naive_local();
                match export_png(
                    &board,
                    self.conductor.theme(),
                    self.conductor.settings().cell_size,
                    &self.export_dir,
                    &at,
                ) {
                    Ok(path) => DisplayNotification::new(
                        NotifyLevel::Success,
                        format!("Saved {}", path.display()),
                    ),
                    Err(e) => {
                        tracing::warn!(error = %e, "export failed");
                        DisplayNotification::new(NotifyLevel::Error, format!("Export failed: {e}"))
                    }
                }
            }
        };
        self.display.notification = Some(notice);
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draw one frame
    pub fn draw(&self, frame: &mut Frame) {
        let [title, board, stats, notice, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_title(frame, title);
        self.render_board(frame, board);

        frame.render_widget(
            Paragraph::new(self.display.stats_line()).style(Style::default().fg(DIM_GRAY)),
            stats,
        );
        if let Some(n) = &self.display.notification {
            frame.render_widget(
                Paragraph::new(n.message.as_str()).style(Style::default().fg(notify_color(n.level))),
                notice,
            );
        }
        frame.render_widget(
            Paragraph::new(HELP).style(Style::default().fg(DIM_GRAY)),
            help,
        );

        if let Some(moves) = self.display.completed_moves {
            render_banner(frame, board, moves);
        }
        if let Some(form) = &self.settings_form {
            frame.render_widget(form, centered(board, (FORM_WIDTH, FORM_HEIGHT)));
        }
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " labyrinth ",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("· {} ", self.conductor.theme().label),
                Style::default().fg(DIM_GRAY),
            ),
        ];
        if self.display.loading {
            spans.push(Span::styled(
                "· loading maze...",
                Style::default().fg(LOADING_BLUE),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        match &self.board {
            Some(visual) => {
                let target = centered(area, board_size(visual.width, visual.height));
                let pulse_on = (self.frame / PULSE_FRAMES) % 2 == 0;
                frame.render_widget(
                    BoardWidget::new(visual, self.conductor.theme()).pulse(pulse_on),
                    target,
                );
            }
            None => {
                let text = if self.display.loading || !self.started {
                    "Loading maze..."
                } else {
                    "No maze loaded - press n to try again"
                };
                let target = centered(area, (u16::try_from(text.width()).unwrap_or(0), 1));
                frame.render_widget(
                    Paragraph::new(text).style(Style::default().fg(LOADING_BLUE)),
                    target,
                );
            }
        }
    }

    /// Goodbye message, once the app has stopped
    pub fn goodbye(&self) -> Option<&str> {
        self.goodbye_message.as_deref()
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Display state, for inspection
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Mapped board of the last update
    pub fn board(&self) -> Option<&BoardVisual> {
        self.board.as_ref()
    }

    /// Whether the settings form is open
    pub fn settings_open(&self) -> bool {
        self.settings_form.is_some()
    }

    /// Embedded client
    pub fn client(&self) -> &ConductorClient<B> {
        &self.conductor
    }

    /// Embedded client, mutably
    pub fn client_mut(&mut self) -> &mut ConductorClient<B> {
        &mut self.conductor
    }
}

fn render_banner(frame: &mut Frame, area: Rect, moves: u32) {
    let headline = format!("Maze complete in {moves} moves!");
    let hint = "n new maze | r play again";
    let width = u16::try_from(headline.width().max(hint.width()) + 4).unwrap_or(u16::MAX);
    let target = centered(area, (width, 4));

    frame.render_widget(Clear, target);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                headline,
                Style::default()
                    .fg(SUCCESS_GREEN)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(hint, Style::default().fg(DIM_GRAY))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_GRAY)),
        ),
        target,
    );
}
