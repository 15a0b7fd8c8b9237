//! Themes
//!
//! Static color/shape tables selected by name. A theme never influences game
//! state; swapping it only changes what the render mapper produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::settings::SettingsError;

/// A 24-bit color, independent of any UI toolkit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Channels as an array
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Color and shape parameters for one theme
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Human-readable name
    pub label: &'static str,
    /// Plain cell background
    pub cell_bg: Rgb,
    /// Wall color
    pub wall: Rgb,
    /// Player fill
    pub player: Rgb,
    /// Player outline
    pub player_border: Rgb,
    /// Start marker
    pub start: Rgb,
    /// Finish marker once the player stands on it
    pub finish: Rgb,
    /// Finish marker while waiting for the player
    pub finish_pulse: Rgb,
    /// Solution path highlight
    pub solution: Rgb,
    /// Visited shading at distance <= 1 from the player
    pub visited_near: Rgb,
    /// Visited shading at distance <= 3
    pub visited_mid: Rgb,
    /// Visited shading further away
    pub visited_far: Rgb,
    /// Rounding applied to the four outer corners of the board, in pixels
    pub corner_radius: u8,
}

const CLASSIC: Theme = Theme {
    label: "Classic",
    cell_bg: Rgb(255, 255, 255),
    wall: Rgb(30, 41, 59),
    player: Rgb(79, 70, 229),
    player_border: Rgb(49, 46, 129),
    start: Rgb(34, 197, 94),
    finish: Rgb(220, 38, 38),
    finish_pulse: Rgb(248, 113, 113),
    solution: Rgb(250, 204, 21),
    visited_near: Rgb(165, 180, 252),
    visited_mid: Rgb(199, 210, 254),
    visited_far: Rgb(224, 231, 255),
    corner_radius: 8,
};

const DARK: Theme = Theme {
    label: "Dark",
    cell_bg: Rgb(17, 24, 39),
    wall: Rgb(229, 231, 235),
    player: Rgb(250, 204, 21),
    player_border: Rgb(161, 98, 7),
    start: Rgb(74, 222, 128),
    finish: Rgb(244, 63, 94),
    finish_pulse: Rgb(251, 113, 133),
    solution: Rgb(56, 189, 248),
    visited_near: Rgb(55, 65, 81),
    visited_mid: Rgb(43, 52, 68),
    visited_far: Rgb(31, 41, 55),
    corner_radius: 12,
};

const OCEAN: Theme = Theme {
    label: "Ocean",
    cell_bg: Rgb(224, 242, 254),
    wall: Rgb(12, 74, 110),
    player: Rgb(14, 165, 233),
    player_border: Rgb(7, 89, 133),
    start: Rgb(20, 184, 166),
    finish: Rgb(249, 115, 22),
    finish_pulse: Rgb(253, 186, 116),
    solution: Rgb(236, 72, 153),
    visited_near: Rgb(125, 211, 252),
    visited_mid: Rgb(186, 230, 253),
    visited_far: Rgb(207, 236, 254),
    corner_radius: 16,
};

const FOREST: Theme = Theme {
    label: "Forest",
    cell_bg: Rgb(240, 253, 244),
    wall: Rgb(20, 83, 45),
    player: Rgb(180, 83, 9),
    player_border: Rgb(120, 53, 15),
    start: Rgb(22, 163, 74),
    finish: Rgb(185, 28, 28),
    finish_pulse: Rgb(239, 68, 68),
    solution: Rgb(132, 204, 22),
    visited_near: Rgb(134, 239, 172),
    visited_mid: Rgb(187, 247, 208),
    visited_far: Rgb(220, 252, 231),
    corner_radius: 4,
};

const RETRO: Theme = Theme {
    label: "Retro",
    cell_bg: Rgb(0, 0, 0),
    wall: Rgb(0, 255, 65),
    player: Rgb(255, 0, 255),
    player_border: Rgb(128, 0, 128),
    start: Rgb(0, 255, 255),
    finish: Rgb(255, 255, 0),
    finish_pulse: Rgb(128, 128, 0),
    solution: Rgb(255, 85, 85),
    visited_near: Rgb(0, 102, 26),
    visited_mid: Rgb(0, 68, 17),
    visited_far: Rgb(0, 34, 9),
    corner_radius: 0,
};

/// Names of the built-in themes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// Light board, indigo player
    #[default]
    Classic,
    /// Dark board, light walls
    Dark,
    /// Blues
    Ocean,
    /// Greens
    Forest,
    /// Phosphor terminal
    Retro,
}

impl ThemeName {
    /// Every theme, in menu order
    pub const ALL: [ThemeName; 5] = [
        Self::Classic,
        Self::Dark,
        Self::Ocean,
        Self::Forest,
        Self::Retro,
    ];

    /// Key used in config files and on the command line
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Dark => "dark",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::Retro => "retro",
        }
    }

    /// The color table for this theme
    #[must_use]
    pub fn theme(&self) -> &'static Theme {
        match self {
            Self::Classic => &CLASSIC,
            Self::Dark => &DARK,
            Self::Ocean => &OCEAN,
            Self::Forest => &FOREST,
            Self::Retro => &RETRO,
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.theme().label
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ThemeName {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownTheme(s.to_string()))
    }
}
