use brl_core::cell::{Cell, DOTS_PER_CELL};
use brl_core::format::BrailleText;
use image::{Rgb, RgbImage};

use crate::geometry::Geometry;

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Split braille lines into image rows of at most `columns` cells.
///
/// Every line starts a new row, an empty line gives an empty row.
///
/// # Example
/// ```
/// use brl_core::{BrailleText, Format};
/// use brl_raster::layout;
/// let text = BrailleText::parse("⠁⠃⠉\n\n⠙", Format::Unicode).unwrap();
/// let rows = layout(&text, 2);
/// assert_eq!(rows.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1, 0, 1]);
/// ```
#[must_use]
pub fn layout(text: &BrailleText, columns: u32) -> Vec<Vec<Cell>> {
    let columns = columns.max(1) as usize;
    let mut rows = Vec::new();
    for line in &text.lines {
        if line.is_empty() {
            rows.push(Vec::new());
        } else {
            rows.extend(line.chunks(columns).map(<[Cell]>::to_vec));
        }
    }
    if rows.is_empty() {
        rows.push(Vec::new());
    }
    rows
}

/// Draw `text` with line breaks kept as row breaks.
///
/// The canvas is as wide as the longest row (at least one cell); shorter
/// rows end in blank cells.
#[must_use]
pub fn render_braille(text: &BrailleText, geometry: &Geometry) -> RgbImage {
    draw_rows(&layout(text, geometry.columns), geometry)
}

/// Draw a flat cell sequence, wrapping every `columns` cells.
///
/// # Example
/// ```
/// use brl_core::Cell;
/// use brl_raster::{Geometry, render_cells};
/// let img = render_cells(&[Cell::FULL, Cell::BLANK], &Geometry::default());
/// assert_eq!(img.dimensions(), (140, 80));
/// ```
#[must_use]
pub fn render_cells(cells: &[Cell], geometry: &Geometry) -> RgbImage {
    draw_rows(
        &layout(&BrailleText::from_cells(cells.to_vec()), geometry.columns),
        geometry,
    )
}

fn draw_rows(rows: &[Vec<Cell>], geometry: &Geometry) -> RgbImage {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0).max(1) as u32;
    let (width, height) = geometry.canvas_size(cols, rows.len() as u32);
    log::debug!(
        "rendu {cols}x{} cellules → {width}x{height} px",
        rows.len()
    );

    let mut img = RgbImage::from_pixel(width, height, PAPER);
    for (row, cells) in rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            for dot in 0..DOTS_PER_CELL {
                if cell.is_raised(dot as u8 + 1) {
                    let (cx, cy) = geometry.dot_center(col as u32, row as u32, dot);
                    fill_disc(&mut img, cx, cy, geometry.dot_radius);
                }
            }
        }
    }
    img
}

fn fill_disc(img: &mut RgbImage, cx: u32, cy: u32, radius: u32) {
    let r = i64::from(radius);
    let r2 = r * r;
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    for dy in -r..=r {
        let y = i64::from(cy) + dy;
        if y < 0 || y >= h {
            continue;
        }
        for dx in -r..=r {
            let x = i64::from(cx) + dx;
            if x < 0 || x >= w || dx * dx + dy * dy > r2 {
                continue;
            }
            img.put_pixel(x as u32, y as u32, INK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cell_leaves_paper() {
        let img = render_cells(&[Cell::BLANK], &Geometry::default());
        assert_eq!(img.dimensions(), (80, 80));
        assert!(img.pixels().all(|p| *p == PAPER));
    }

    #[test]
    fn raised_dot_is_inked_at_center() {
        let g = Geometry::default();
        let cell = Cell::from_dots(&[1, 6]).unwrap();
        let img = render_cells(&[cell], &g);
        let (x, y) = g.dot_center(0, 0, 0);
        assert_eq!(*img.get_pixel(x, y), INK);
        let (x, y) = g.dot_center(0, 0, 5);
        assert_eq!(*img.get_pixel(x, y), INK);
        let (x, y) = g.dot_center(0, 0, 3);
        assert_eq!(*img.get_pixel(x, y), PAPER);
        // margins stay clean
        assert_eq!(*img.get_pixel(5, 5), PAPER);
    }

    #[test]
    fn wraps_at_columns() {
        let g = Geometry {
            columns: 3,
            ..Geometry::default()
        };
        let img = render_cells(&[Cell::FULL; 7], &g);
        assert_eq!(img.dimensions(), g.canvas_size(3, 3));
    }

    #[test]
    fn empty_text_is_one_blank_cell() {
        let g = Geometry::default();
        let img = render_braille(&BrailleText::default(), &g);
        assert_eq!(img.dimensions(), g.canvas_size(1, 1));
    }
}
