//! Board Widget
//!
//! Draws a [`BoardVisual`] with box-drawing characters. Every maze cell takes
//! three columns and one row; walls sit on a lattice between cells, so a
//! `W x H` maze needs `4W + 1` columns and `2H + 1` rows.

use labyrinth_core::{BoardVisual, CellVisual, Marker, Theme};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::theme::rgb;

/// Columns per cell, excluding the shared wall column
const CELL_COLS: u16 = 3;

/// Terminal size needed for a maze
#[must_use]
pub fn board_size(width: usize, height: usize) -> (u16, u16) {
    let cols = u16::try_from(width * (CELL_COLS as usize + 1) + 1).unwrap_or(u16::MAX);
    let rows = u16::try_from(height * 2 + 1).unwrap_or(u16::MAX);
    (cols, rows)
}

/// Center a board of the given size inside `area`, clipping if it does not fit
#[must_use]
pub fn centered(area: Rect, (cols, rows): (u16, u16)) -> Rect {
    let width = cols.min(area.width);
    let height = rows.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Widget drawing one board frame
pub struct BoardWidget<'a> {
    visual: &'a BoardVisual,
    theme: &'a Theme,
    pulse_on: bool,
}

impl<'a> BoardWidget<'a> {
    /// Create a widget for a mapped board
    pub fn new(visual: &'a BoardVisual, theme: &'a Theme) -> Self {
        Self {
            visual,
            theme,
            pulse_on: true,
        }
    }

    /// Phase of the finish marker pulse
    #[must_use]
    pub fn pulse(mut self, on: bool) -> Self {
        self.pulse_on = on;
        self
    }

    fn is_wall_between(&self, a: Option<&CellVisual>, b: Option<&CellVisual>, vertical: bool) -> bool {
        // Either side closing the edge draws the wall.
        let a_closed = a.is_some_and(|c| {
            if vertical {
                c.borders.right.is_wall()
            } else {
                c.borders.down.is_wall()
            }
        });
        let b_closed = b.is_some_and(|c| {
            if vertical {
                c.borders.left.is_wall()
            } else {
                c.borders.up.is_wall()
            }
        });
        a_closed || b_closed
    }

    /// Cell at signed coordinates
    fn cell(&self, x: isize, y: isize) -> Option<&CellVisual> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.visual.get(x, y)
    }

    fn lattice_glyph(&self, lx: usize, ly: usize) -> char {
        let (x, y) = (lx as isize, ly as isize);
        let north = self.is_wall_between(self.cell(x - 1, y - 1), self.cell(x, y - 1), true);
        let south = self.is_wall_between(self.cell(x - 1, y), self.cell(x, y), true);
        let west = self.is_wall_between(self.cell(x - 1, y - 1), self.cell(x - 1, y), false);
        let east = self.is_wall_between(self.cell(x, y - 1), self.cell(x, y), false);

        let (last_x, last_y) = (self.visual.width, self.visual.height);
        let rounded = match (lx, ly) {
            (0, 0) => self.cell(0, 0).is_some_and(|c| c.corners.top_left > 0),
            (0, _) if ly == last_y => self
                .cell(0, y - 1)
                .is_some_and(|c| c.corners.bottom_left > 0),
            (_, 0) if lx == last_x => self
                .cell(x - 1, 0)
                .is_some_and(|c| c.corners.top_right > 0),
            _ if lx == last_x && ly == last_y => self
                .cell(x - 1, y - 1)
                .is_some_and(|c| c.corners.bottom_right > 0),
            _ => false,
        };

        box_glyph(north, south, east, west, rounded)
    }
}

/// Box-drawing character joining the wall segments around a lattice point
fn box_glyph(north: bool, south: bool, east: bool, west: bool, rounded: bool) -> char {
    match (north, south, east, west) {
        (false, false, false, false) => ' ',
        (true, false, false, false) => '╵',
        (false, true, false, false) => '╷',
        (false, false, true, false) => '╶',
        (false, false, false, true) => '╴',
        (true, true, false, false) => '│',
        (false, false, true, true) => '─',
        (false, true, true, false) if rounded => '╭',
        (false, true, false, true) if rounded => '╮',
        (true, false, true, false) if rounded => '╰',
        (true, false, false, true) if rounded => '╯',
        (false, true, true, false) => '┌',
        (false, true, false, true) => '┐',
        (true, false, true, false) => '└',
        (true, false, false, true) => '┘',
        (true, true, true, false) => '├',
        (true, true, false, true) => '┤',
        (false, true, true, true) => '┬',
        (true, false, true, true) => '┴',
        (true, true, true, true) => '┼',
    }
}

/// Glyph and color for the topmost marker of a cell
fn marker_glyph(marker: &Marker, pulse_on: bool) -> (char, Color) {
    match *marker {
        Marker::Start { color } => ('•', rgb(color)),
        Marker::Finish { color, pulsing, .. } => {
            if pulsing && !pulse_on {
                ('○', rgb(color))
            } else {
                ('◉', rgb(color))
            }
        }
        Marker::Player { fill, .. } => ('●', rgb(fill)),
    }
}

fn put(buf: &mut Buffer, area: Rect, col: u16, row: u16, ch: char, fg: Color, bg: Color) {
    if col >= area.width || row >= area.height {
        return;
    }
    if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
        cell.set_char(ch).set_fg(fg).set_bg(bg);
    }
}

impl Widget for BoardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let wall = rgb(self.theme.wall);
        let lattice_bg = rgb(self.theme.cell_bg);
        let (cols, rows) = board_size(self.visual.width, self.visual.height);

        // Lattice points and wall segments
        for row in 0..rows {
            for col in 0..cols {
                let on_row_line = row % 2 == 0;
                let on_col_line = col % (CELL_COLS + 1) == 0;
                let lx = usize::from(col / (CELL_COLS + 1));
                let ly = usize::from(row / 2);
                let (x, y) = (lx as isize, ly as isize);

                let glyph = match (on_row_line, on_col_line) {
                    (true, true) => self.lattice_glyph(lx, ly),
                    (true, false) => {
                        if self.is_wall_between(self.cell(x, y - 1), self.cell(x, y), false) {
                            '─'
                        } else {
                            ' '
                        }
                    }
                    (false, true) => {
                        if self.is_wall_between(self.cell(x - 1, y), self.cell(x, y), true) {
                            '│'
                        } else {
                            ' '
                        }
                    }
                    (false, false) => continue,
                };

                // Openings take the color of the cell below or to the right
                let bg = if glyph == ' ' && !(on_row_line && on_col_line) {
                    self.cell(x, y).map_or(lattice_bg, |c| rgb(c.background))
                } else {
                    lattice_bg
                };
                put(buf, area, col, row, glyph, wall, bg);
            }
        }

        // Cell interiors and markers
        for visual in &self.visual.cells {
            let Ok(base_col) = u16::try_from(visual.position.x * (CELL_COLS as usize + 1) + 1)
            else {
                continue;
            };
            let Ok(row) = u16::try_from(visual.position.y * 2 + 1) else {
                continue;
            };
            let bg = rgb(visual.background);
            for offset in 0..CELL_COLS {
                put(buf, area, base_col + offset, row, ' ', wall, bg);
            }
            if let Some(marker) = visual.top_marker() {
                let (glyph, fg) = marker_glyph(marker, self.pulse_on);
                put(buf, area, base_col + CELL_COLS / 2, row, glyph, fg, bg);
            }
        }
    }
}
