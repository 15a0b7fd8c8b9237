//! PNG Export
//!
//! Rasterizes a [`BoardVisual`] at `cell_size` pixels per cell. Reads the same
//! mapped board the terminal draws, so shading, the solution path and the
//! markers match what is on screen. Export never touches game state.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use image::{Rgba, RgbaImage};
use labyrinth_core::{BoardVisual, CellVisual, Edge, Marker, Rgb, Theme};
use thiserror::Error;

/// Export failures
#[derive(Debug, Error)]
pub enum ExportError {
    /// No maze loaded yet
    #[error("there is no maze to export yet")]
    EmptyBoard,

    /// The export directory could not be created
    #[error("could not create {}: {source}", path.display())]
    CreateDir {
        /// Directory that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Encoding or writing the file failed
    #[error("could not write PNG: {0}")]
    Encode(#[from] image::ImageError),
}

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn rgba(color: Rgb) -> Rgba<u8> {
    Rgba([color.0, color.1, color.2, 255])
}

/// `maze-{W}x{H}-{timestamp}.png`
#[must_use]
pub fn export_file_name(width: usize, height: usize, at: &NaiveDateTime) -> String {
    format!("maze-{width}x{height}-{}.png", at.format("%Y%m%d-%H%M%S"))
}

/// Draw the board into an image
#[must_use]
pub fn render_png(visual: &BoardVisual, theme: &Theme, cell_size: u32) -> RgbaImage {
    let size = cell_size.max(1);
    let width = u32::try_from(visual.width).unwrap_or(0) * size;
    let height = u32::try_from(visual.height).unwrap_or(0) * size;
    let mut img = RgbaImage::from_pixel(width, height, rgba(theme.cell_bg));
    let thickness = (size / 8).max(1);

    for cell in &visual.cells {
        draw_cell(&mut img, cell, size, thickness);
    }
    round_corners(&mut img, visual, theme, size, thickness);
    img
}

/// Render the board and write it into `dir`
///
/// # Errors
///
/// Returns [`ExportError`] if the board is empty or the file cannot be written.
pub fn export_png(
    visual: &BoardVisual,
    theme: &Theme,
    cell_size: u32,
    dir: &Path,
    at: &NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    if visual.cells.is_empty() {
        return Err(ExportError::EmptyBoard);
    }
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(export_file_name(visual.width, visual.height, at));
    render_png(visual, theme, cell_size).save(&path)?;
    tracing::info!(path = %path.display(), cell_size, "exported maze");
    Ok(path)
}

fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x1 = (x0 + w).min(img.width());
    let y1 = (y0 + h).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Filled disc centred in the cell, `ratio` of the cell size in radius
fn fill_disc(img: &mut RgbaImage, x0: u32, y0: u32, size: u32, ratio: f32, color: Rgba<u8>) {
    let center = size as f32 / 2.0;
    let radius = size as f32 * ratio;
    for dy in 0..size {
        for dx in 0..size {
            let fx = dx as f32 + 0.5 - center;
            let fy = dy as f32 + 0.5 - center;
            if fx * fx + fy * fy <= radius * radius {
                let (x, y) = (x0 + dx, y0 + dy);
                if x < img.width() && y < img.height() {
                    img.put_pixel(x, y, color);
                }
            }
        }
    }
}

fn draw_cell(img: &mut RgbaImage, cell: &CellVisual, size: u32, thickness: u32) {
    let (Ok(cx), Ok(cy)) = (
        u32::try_from(cell.position.x),
        u32::try_from(cell.position.y),
    ) else {
        return;
    };
    let (x0, y0) = (cx * size, cy * size);

    fill_rect(img, x0, y0, size, size, rgba(cell.background));

    for marker in &cell.markers {
        match *marker {
            Marker::Start { color } => fill_disc(img, x0, y0, size, 0.25, rgba(color)),
            Marker::Finish { color, inner, .. } => {
                fill_disc(img, x0, y0, size, 0.35, rgba(color));
                fill_disc(img, x0, y0, size, 0.15, rgba(inner));
            }
            Marker::Player {
                fill,
                border,
                inner,
            } => {
                fill_disc(img, x0, y0, size, 0.38, rgba(border));
                fill_disc(img, x0, y0, size, 0.30, rgba(fill));
                fill_disc(img, x0, y0, size, 0.10, rgba(inner));
            }
        }
    }

    let borders = [
        (cell.borders.up, x0, y0, size, thickness),
        (cell.borders.down, x0, y0 + size - thickness, size, thickness),
        (cell.borders.left, x0, y0, thickness, size),
        (cell.borders.right, x0 + size - thickness, y0, thickness, size),
    ];
    for (edge, x, y, w, h) in borders {
        if let Edge::Wall(color) = edge {
            fill_rect(img, x, y, w, h, rgba(color));
        }
    }
}

/// Cut the four outer corners to a quarter circle and trace the arc in the
/// wall color
fn round_corners(img: &mut RgbaImage, visual: &BoardVisual, theme: &Theme, size: u32, thickness: u32) {
    let (width, height) = (img.width(), img.height());
    let (last_x, last_y) = (visual.width.saturating_sub(1), visual.height.saturating_sub(1));
    let corners_at = |x: usize, y: usize| visual.get(x, y).map(|c| c.corners).unwrap_or_default();
    let clamp = |r: u8| u32::from(r).min(size / 2);

    // (radius, right side, bottom side)
    let corners = [
        (clamp(corners_at(0, 0).top_left), false, false),
        (clamp(corners_at(last_x, 0).top_right), true, false),
        (clamp(corners_at(0, last_y).bottom_left), false, true),
        (clamp(corners_at(last_x, last_y).bottom_right), true, true),
    ];

    let wall = rgba(theme.wall);
    for (radius, right, bottom) in corners {
        if radius == 0 {
            continue;
        }
        let r = radius as f32;
        for dy in 0..radius {
            for dx in 0..radius {
                // Distance from the arc centre, measured in the corner quadrant
                let fx = r - (dx as f32 + 0.5);
                let fy = r - (dy as f32 + 0.5);
                let distance = (fx * fx + fy * fy).sqrt();
                let x = if right { width - 1 - dx } else { dx };
                let y = if bottom { height - 1 - dy } else { dy };
                if distance > r {
                    img.put_pixel(x, y, TRANSPARENT);
                } else if distance > r - thickness as f32 {
                    img.put_pixel(x, y, wall);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use labyrinth_core::{map_board, BoardView, Cell, GameController, Maze, ThemeName};
    use pretty_assertions::assert_eq;

    fn open_visual(width: usize, height: usize, theme: &Theme) -> BoardVisual {
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| Cell {
                        up: y > 0,
                        down: y + 1 < height,
                        left: x > 0,
                        right: x + 1 < width,
                    })
                    .collect()
            })
            .collect();
        let game = GameController::new(Maze::from_rows(rows).expect("valid maze"));
        map_board(&BoardView::new(&game, theme))
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(14, 5, 7))
            .expect("valid timestamp")
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            export_file_name(20, 15, &timestamp()),
            "maze-20x15-20240309-140507.png"
        );
    }

    #[test]
    fn test_image_dimensions_follow_cell_size() {
        let theme = ThemeName::Classic.theme();
        let visual = open_visual(4, 3, theme);
        let img = render_png(&visual, theme, 10);
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn test_pixels_match_cell_visuals() {
        let theme = ThemeName::Classic.theme();
        let visual = open_visual(3, 3, theme);
        let img = render_png(&visual, theme, 24);

        // Middle of cell (1,0): plain background
        assert_eq!(*img.get_pixel(36, 12), rgba(theme.cell_bg));
        // Top edge of cell (1,0): outer wall
        assert_eq!(*img.get_pixel(36, 0), rgba(theme.wall));
        // Inside the player disc on cell (0,0), outside its inner dot
        assert_eq!(*img.get_pixel(17, 12), rgba(theme.player));
    }

    #[test]
    fn test_outer_corners_are_cut() {
        let theme = ThemeName::Classic.theme();
        let visual = open_visual(3, 3, theme);
        let img = render_png(&visual, theme, 24);
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(71, 71), TRANSPARENT);

        let square = ThemeName::Retro.theme();
        let visual = open_visual(3, 3, square);
        let img = render_png(&visual, square, 24);
        assert_eq!(*img.get_pixel(0, 0), rgba(square.wall));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let theme = ThemeName::Ocean.theme();
        let visual = open_visual(5, 5, theme);

        let path = export_png(&visual, theme, 12, &dir.path().join("out"), &timestamp())
            .expect("export");
        assert!(path.exists());
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("maze-5x5-20240309-140507.png")
        );

        let decoded = image::open(&path).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (60, 60));
    }

    #[test]
    fn test_export_empty_board() {
        let dir = tempfile::tempdir().expect("tempdir");
        let visual = BoardVisual {
            width: 0,
            height: 0,
            cells: Vec::new(),
        };
        let result = export_png(
            &visual,
            ThemeName::Classic.theme(),
            12,
            dir.path(),
            &timestamp(),
        );
        assert!(matches!(result, Err(ExportError::EmptyBoard)));
    }
}
