use brl_core::cell::{Cell, DOTS_PER_CELL};
use brl_core::format::BrailleText;
use image::{DynamicImage, GrayImage};

use crate::geometry::{Geometry, GeometryError};

/// Read every cell of `img` in reading order (rows top to bottom).
///
/// Padding cells at the end of short rows come back as blank cells.
///
/// # Errors
/// [`GeometryError`] when the image size does not match `geometry`.
pub fn parse_image(img: &DynamicImage, geometry: &Geometry) -> Result<Vec<Cell>, GeometryError> {
    parse_luma(&img.to_luma8(), geometry)
}

/// [`parse_image`] on an already grey image.
///
/// # Errors
/// See [`parse_image`].
pub fn parse_luma(img: &GrayImage, geometry: &Geometry) -> Result<Vec<Cell>, GeometryError> {
    Ok(parse_rows(img, geometry)?.concat())
}

/// Rebuild the braille lines drawn by [`crate::render_braille`].
///
/// Trailing blank cells of a row are padding. A row continues on the next
/// one only when the image is `columns` cells wide and the row's last cell
/// is raised; any other row ends its line. A blank cell sitting exactly at
/// a wrap point therefore reads back as a line break, and a line exactly
/// `columns` cells long joins the line after it.
///
/// # Example
/// ```
/// use brl_core::{BrailleText, Format};
/// use brl_raster::{Geometry, parse_braille, render_braille};
/// let text = BrailleText::parse("⠁⠃⠉\n⠙", Format::Unicode).unwrap();
/// let img = image::DynamicImage::ImageRgb8(render_braille(&text, &Geometry::default()));
/// assert_eq!(parse_braille(&img, &Geometry::default()).unwrap(), text);
/// ```
///
/// # Errors
/// See [`parse_image`].
pub fn parse_braille(img: &DynamicImage, geometry: &Geometry) -> Result<BrailleText, GeometryError> {
    let rows = parse_rows(&img.to_luma8(), geometry)?;
    let wraps = rows.first().map_or(0, Vec::len) == geometry.columns as usize;

    let mut lines = Vec::new();
    let mut current = Vec::new();
    for mut row in rows {
        let continues = wraps && row.last().is_some_and(|c| *c != Cell::BLANK);
        if !continues {
            while row.last() == Some(&Cell::BLANK) {
                row.pop();
            }
        }
        current.extend(row);
        if !continues {
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    Ok(BrailleText { lines })
}

/// Cells of `img` grouped by image row.
///
/// A dot is raised when the mean luma of a small square window around its
/// center is below `geometry.threshold`.
///
/// # Errors
/// [`GeometryError::InvalidParameters`], [`GeometryError::TooSmall`] or
/// [`GeometryError::NotMultiple`].
pub fn parse_rows(img: &GrayImage, geometry: &Geometry) -> Result<Vec<Vec<Cell>>, GeometryError> {
    let (cols, rows) = geometry.grid_dims(img.width(), img.height())?;
    let half = (geometry.dot_radius / 2).max(1);
    log::debug!("lecture {cols}x{rows} cellules (fenêtre ±{half} px)");

    let mut out = Vec::with_capacity(rows as usize);
    for row in 0..rows {
        let mut cells = Vec::with_capacity(cols as usize);
        for col in 0..cols {
            let mut mask = 0u8;
            for dot in 0..DOTS_PER_CELL {
                let (cx, cy) = geometry.dot_center(col, row, dot);
                if mean_luma(img, cx, cy, half) < u32::from(geometry.threshold) {
                    mask |= 1 << dot;
                }
            }
            cells.push(Cell::from_mask(mask).unwrap_or(Cell::BLANK));
        }
        out.push(cells);
    }
    Ok(out)
}

fn mean_luma(img: &GrayImage, cx: u32, cy: u32, half: u32) -> u32 {
    let x0 = cx.saturating_sub(half);
    let y0 = cy.saturating_sub(half);
    let x1 = (cx + half).min(img.width() - 1);
    let y1 = (cy + half).min(img.height() - 1);

    let mut sum = 0u32;
    let mut count = 0u32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            sum += u32::from(img.get_pixel(x, y).0[0]);
            count += 1;
        }
    }
    sum / count.max(1)
}
