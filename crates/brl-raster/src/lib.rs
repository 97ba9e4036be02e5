/// Braille images: drawing cells as dot grids and reading them back.
///
/// Pure pixel work on in-memory buffers. File access lives in [`io`] and is
/// only a thin wrapper over the `image` crate.

pub mod geometry;
pub mod io;
pub mod parse;
pub mod render;

pub use geometry::{Geometry, GeometryError};
pub use parse::{parse_braille, parse_image, parse_luma, parse_rows};
pub use render::{layout, render_braille, render_cells};
