//! Settings Form
//!
//! Modal form for seed, maze size, export cell size and the algorithm and
//! theme choices. Applying the form produces a [`GameSettings`] the App sends
//! as `SurfaceEvent::ApplySettings`.
//!
//! Keys: Up/Down or Tab/BackTab move between fields, Left/Right cycle choices
//! and nudge numbers, digits and `-` edit numbers, Enter applies, Esc closes.

use crossterm::event::{KeyCode, KeyEvent};
use labyrinth_core::{
    GameSettings, MazeAlgorithm, PathfindingAlgorithm, SettingsError, ThemeName,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};
use thiserror::Error;

use crate::theme::{ACCENT, BORDER_GRAY, DIM_GRAY, ERROR_RED, FOCUS_YELLOW};

/// Form fields, top to bottom
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    /// Generation seed (-1 for random)
    Seed,
    /// Maze columns
    Width,
    /// Maze rows
    Height,
    /// Export pixels per cell
    CellSize,
    /// Generation algorithm
    Algorithm,
    /// Solver algorithm
    Pathfinding,
    /// Color theme
    Theme,
}

impl FormField {
    const ALL: [FormField; 7] = [
        Self::Seed,
        Self::Width,
        Self::Height,
        Self::CellSize,
        Self::Algorithm,
        Self::Pathfinding,
        Self::Theme,
    ];

    /// Label shown next to the value
    pub fn label(self) -> &'static str {
        match self {
            Self::Seed => "Seed",
            Self::Width => "Width",
            Self::Height => "Height",
            Self::CellSize => "Cell size",
            Self::Algorithm => "Maze algorithm",
            Self::Pathfinding => "Pathfinding",
            Self::Theme => "Theme",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Seed | Self::Width | Self::Height | Self::CellSize
        )
    }
}

/// Why the form could not be applied
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A numeric field does not parse
    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber {
        /// Field label
        field: &'static str,
        /// Raw text
        value: String,
    },

    /// Parsed values are out of range
    #[error(transparent)]
    Invalid(#[from] SettingsError),

    /// A maze is being generated, so nothing can be applied yet
    #[error("a maze is still loading, try again in a moment")]
    StillLoading,
}

/// What the App should do after a key press
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    /// Keep the form open
    None,
    /// Close the form and apply these settings
    Apply(GameSettings),
    /// Close the form without changes
    Cancel,
}

/// Editable copy of the settings
#[derive(Clone, Debug)]
pub struct SettingsForm {
    focus: usize,
    seed: String,
    width: String,
    height: String,
    cell_size: String,
    algorithm: MazeAlgorithm,
    pathfinding: PathfindingAlgorithm,
    theme: ThemeName,
    error: Option<String>,
}

impl SettingsForm {
    /// Open the form pre-filled with the current settings
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            focus: 0,
            seed: settings.seed.to_string(),
            width: settings.width.to_string(),
            height: settings.height.to_string(),
            cell_size: settings.cell_size.to_string(),
            algorithm: settings.algorithm,
            pathfinding: settings.pathfinding,
            theme: settings.theme,
            error: None,
        }
    }

    /// Field with the cursor
    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    /// Last apply error, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Keep the form open and show why the settings were not applied
    pub fn reject(&mut self, error: &FormError) {
        self.error = Some(error.to_string());
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => match self.build() {
                Ok(settings) => return FormAction::Apply(settings),
                Err(e) => self.error = Some(e.to_string()),
            },
            KeyCode::Down | KeyCode::Tab => {
                self.focus = (self.focus + 1) % FormField::ALL.len();
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
            }
            KeyCode::Right => self.step(1),
            KeyCode::Left => self.step(-1),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if let Some(text) = self.text_mut() {
                    text.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = self.text_mut() {
                    text.pop();
                }
            }
            _ => {}
        }
        FormAction::None
    }

    /// Parse and validate the form
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if a number does not parse or is out of range.
    pub fn build(&self) -> Result<GameSettings, FormError> {
        let settings = GameSettings {
            width: parse_field(FormField::Width, &self.width)?,
            height: parse_field(FormField::Height, &self.height)?,
            cell_size: parse_field(FormField::CellSize, &self.cell_size)?,
            algorithm: self.algorithm,
            pathfinding: self.pathfinding,
            theme: self.theme,
            seed: parse_field(FormField::Seed, &self.seed)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Display value of a field
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Seed => self.seed.clone(),
            FormField::Width => self.width.clone(),
            FormField::Height => self.height.clone(),
            FormField::CellSize => self.cell_size.clone(),
            FormField::Algorithm => self.algorithm.to_string(),
            FormField::Pathfinding => self.pathfinding.to_string(),
            FormField::Theme => self.theme.label().to_string(),
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            FormField::Seed => Some(&mut self.seed),
            FormField::Width => Some(&mut self.width),
            FormField::Height => Some(&mut self.height),
            FormField::CellSize => Some(&mut self.cell_size),
            _ => None,
        }
    }

    fn step(&mut self, delta: i64) {
        let field = self.focused();
        match field {
            FormField::Algorithm => self.algorithm = cycle(&MazeAlgorithm::ALL, self.algorithm, delta),
            FormField::Pathfinding => {
                self.pathfinding = cycle(&PathfindingAlgorithm::ALL, self.pathfinding, delta);
            }
            FormField::Theme => self.theme = cycle(&ThemeName::ALL, self.theme, delta),
            _ if field.is_numeric() => {
                if let Some(text) = self.text_mut() {
                    if let Ok(n) = text.trim().parse::<i64>() {
                        *text = (n + delta).to_string();
                    }
                }
            }
            _ => {}
        }
    }
}

fn parse_field<T: std::str::FromStr>(field: FormField, text: &str) -> Result<T, FormError> {
    text.trim().parse().map_err(|_| FormError::NotANumber {
        field: field.label(),
        value: text.to_string(),
    })
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, delta: i64) -> T {
    let len = all.len() as i64;
    let index = all.iter().position(|v| *v == current).unwrap_or(0) as i64;
    all[(index + delta).rem_euclid(len) as usize]
}

impl Widget for &SettingsForm {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|&field| {
                let focused = field == self.focused();
                let marker = if focused { "> " } else { "  " };
                let value = if field.is_numeric() {
                    self.value(field)
                } else {
                    format!("< {} >", self.value(field))
                };
                let value_style = if focused {
                    Style::default()
                        .fg(FOCUS_YELLOW)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(ACCENT)),
                    Span::styled(format!("{:<16}", field.label()), Style::default().fg(DIM_GRAY)),
                    Span::styled(value, value_style),
                ])
            })
            .collect();

        lines.push(Line::from(""));
        if let Some(error) = self.error() {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(ERROR_RED),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Seed -1 picks a random maze",
                Style::default().fg(DIM_GRAY),
            )));
        }
        lines.push(Line::from(Span::styled(
            "Enter apply | Esc cancel | ←/→ change",
            Style::default().fg(DIM_GRAY),
        )));

        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_GRAY));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Rows the form needs, borders included
pub const FORM_HEIGHT: u16 = FormField::ALL.len() as u16 + 5;

/// Columns the form needs, borders included
pub const FORM_WIDTH: u16 = 48;
