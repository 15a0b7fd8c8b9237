//! Theme and Colors
//!
//! Chrome colors for the panels around the board. The board itself is drawn
//! in the active maze theme's colors, converted with [`rgb`].

use labyrinth_core::{NotifyLevel, Rgb};
use ratatui::style::Color;

// ============================================================================
// UI Colors
// ============================================================================

/// Title and key hints
pub const ACCENT: Color = Color::Rgb(129, 140, 248);

/// Secondary text
pub const DIM_GRAY: Color = Color::Rgb(120, 120, 120);

/// Panel borders
pub const BORDER_GRAY: Color = Color::Rgb(75, 85, 99);

/// Highlighted form field
pub const FOCUS_YELLOW: Color = Color::Rgb(250, 204, 21);

/// Loading indicator
pub const LOADING_BLUE: Color = Color::Rgb(96, 165, 250);

// ============================================================================
// Notification Colors
// ============================================================================

/// Info notices
pub const INFO_BLUE: Color = Color::Rgb(147, 197, 253);

/// Warnings
pub const WARNING_AMBER: Color = Color::Rgb(251, 191, 36);

/// Errors
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Success and the completion banner
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Convert a maze theme color to a terminal color
#[must_use]
pub fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// Color for a notice of the given level
#[must_use]
pub fn notify_color(level: NotifyLevel) -> Color {
    match level {
        NotifyLevel::Info => INFO_BLUE,
        NotifyLevel::Warning => WARNING_AMBER,
        NotifyLevel::Error => ERROR_RED,
        NotifyLevel::Success => SUCCESS_GREEN,
    }
}
