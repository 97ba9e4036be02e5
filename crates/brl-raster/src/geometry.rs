use brl_core::cell::DOTS_PER_CELL;
use brl_core::config::BrailleConfig;
use thiserror::Error;

/// Smallest cell side keeping the three dot rows apart.
pub const MIN_CELL_SIZE: u32 = 12;
/// Largest cell side. Together with [`MAX_MARGIN`] and [`MAX_COLUMNS`] keeps
/// every pixel coordinate of a row well inside `u32`.
pub const MAX_CELL_SIZE: u32 = 1024;
/// Largest margin.
pub const MAX_MARGIN: u32 = 1024;
/// Largest number of cells per row.
pub const MAX_COLUMNS: u32 = 1000;

/// Erreurs de géométrie d'image.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Image {width}x{height} plus petite qu'une cellule ({min}x{min} minimum)")]
    TooSmall { width: u32, height: u32, min: u32 },

    #[error(
        "Géométrie incohérente : {axis} = {size} px, (taille - marge {margin}) non multiple du pas {pitch}"
    )]
    NotMultiple {
        axis: &'static str,
        size: u32,
        margin: u32,
        pitch: u32,
    },

    #[error("Paramètres de géométrie invalides : {0}")]
    InvalidParameters(String),
}

/// Fixed layout shared by rendering and parsing.
///
/// Both sides must use the same values: the parser does not search for
/// cells, it recomputes where the renderer put them.
///
/// # Example
/// ```
/// use brl_raster::Geometry;
/// let g = Geometry::new(40, 20).unwrap();
/// assert_eq!(g.pitch(), 60);
/// assert_eq!(g.canvas_size(2, 1), (140, 80));
/// assert_eq!(g.grid_dims(140, 80).unwrap(), (2, 1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Side of the square holding one cell's dots, in pixels.
    pub cell_size: u32,
    /// Gap around and between cells.
    pub margin: u32,
    /// Radius of a raised dot.
    pub dot_radius: u32,
    /// Cells per row before wrapping.
    pub columns: u32,
    /// Luma below which a dot reads as raised.
    pub threshold: u8,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            cell_size: 40,
            margin: 20,
            dot_radius: 6,
            columns: 25,
            threshold: 128,
        }
    }
}

impl Geometry {
    /// Geometry with default radius, columns and threshold.
    ///
    /// # Errors
    /// [`GeometryError::InvalidParameters`] if `cell_size` is too small.
    pub fn new(cell_size: u32, margin: u32) -> Result<Self, GeometryError> {
        let geometry = Self {
            cell_size,
            margin,
            dot_radius: (cell_size / 6).clamp(1, 6),
            ..Self::default()
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Geometry of the `[image]` configuration section.
    ///
    /// # Errors
    /// [`GeometryError::InvalidParameters`] for an unusable combination.
    pub fn from_config(config: &BrailleConfig) -> Result<Self, GeometryError> {
        let geometry = Self {
            cell_size: config.cell_size,
            margin: config.margin,
            dot_radius: config.dot_radius,
            columns: config.columns,
            threshold: config.threshold,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check the parameters can produce separable dots.
    ///
    /// # Errors
    /// [`GeometryError::InvalidParameters`] describing the first problem.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&self.cell_size) {
            return Err(GeometryError::InvalidParameters(format!(
                "cell_size {} hors de {MIN_CELL_SIZE}..={MAX_CELL_SIZE}",
                self.cell_size
            )));
        }
        if self.margin > MAX_MARGIN {
            return Err(GeometryError::InvalidParameters(format!(
                "margin {} > {MAX_MARGIN}",
                self.margin
            )));
        }
        let max_radius = self.cell_size / 6;
        if self.dot_radius == 0 || self.dot_radius > max_radius {
            return Err(GeometryError::InvalidParameters(format!(
                "dot_radius {} hors de 1..={max_radius}",
                self.dot_radius
            )));
        }
        if self.columns == 0 || self.columns > MAX_COLUMNS {
            return Err(GeometryError::InvalidParameters(format!(
                "columns {} hors de 1..={MAX_COLUMNS}",
                self.columns
            )));
        }
        Ok(())
    }

    /// Distance between the origins of two neighbouring cells.
    #[must_use]
    pub fn pitch(&self) -> u32 {
        self.cell_size.saturating_add(self.margin)
    }

    /// Top-left corner of cell (`col`, `row`).
    #[must_use]
    pub fn cell_origin(&self, col: u32, row: u32) -> (u32, u32) {
        let pitch = self.pitch();
        (
            self.margin.saturating_add(col.saturating_mul(pitch)),
            self.margin.saturating_add(row.saturating_mul(pitch)),
        )
    }

    /// Center of dot `index` (0 = dot 1 … 5 = dot 6) inside cell (`col`, `row`).
    ///
    /// Dots 1-3 fill the left column top to bottom, 4-6 the right one.
    #[must_use]
    pub fn dot_center(&self, col: u32, row: u32, index: usize) -> (u32, u32) {
        debug_assert!(index < DOTS_PER_CELL);
        let (x0, y0) = self.cell_origin(col, row);
        let cell = u64::from(self.cell_size);
        let dot_col = (index / 3) as u64;
        let dot_row = (index % 3) as u64;
        let dx = cell / 4 + dot_col * cell / 2;
        let dy = cell / 6 + dot_row * cell / 3;
        (
            x0.saturating_add(dx as u32),
            y0.saturating_add(dy as u32),
        )
    }

    /// Canvas size for a grid of `cols` × `rows` cells.
    #[must_use]
    pub fn canvas_size(&self, cols: u32, rows: u32) -> (u32, u32) {
        let pitch = self.pitch();
        (
            cols.saturating_mul(pitch).saturating_add(self.margin),
            rows.saturating_mul(pitch).saturating_add(self.margin),
        )
    }

    /// Inverse of [`Geometry::canvas_size`].
    ///
    /// # Errors
    /// [`GeometryError::InvalidParameters`] for an invalid geometry,
    /// [`GeometryError::TooSmall`] below one cell,
    /// [`GeometryError::NotMultiple`] when the size does not fall on the grid.
    pub fn grid_dims(&self, width: u32, height: u32) -> Result<(u32, u32), GeometryError> {
        self.validate()?;
        let min = self.pitch() + self.margin;
        if width < min || height < min {
            return Err(GeometryError::TooSmall { width, height, min });
        }
        let cols = self.axis_cells("largeur", width)?;
        let rows = self.axis_cells("hauteur", height)?;
        Ok((cols, rows))
    }

    fn axis_cells(&self, axis: &'static str, size: u32) -> Result<u32, GeometryError> {
        let inner = size - self.margin;
        if inner % self.pitch() != 0 {
            return Err(GeometryError::NotMultiple {
                axis,
                size,
                margin: self.margin,
                pitch: self.pitch(),
            });
        }
        Ok(inner / self.pitch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_centers_default_cell() {
        let g = Geometry::default();
        // cell 40, margin 20: first cell starts at (20, 20)
        assert_eq!(g.dot_center(0, 0, 0), (30, 26));
        assert_eq!(g.dot_center(0, 0, 2), (30, 52));
        assert_eq!(g.dot_center(0, 0, 3), (50, 26));
        assert_eq!(g.dot_center(1, 1, 5), (110, 112));
    }

    #[test]
    fn dots_stay_inside_their_cell() {
        for cell_size in [12, 40, 60, 97] {
            let g = Geometry {
                cell_size,
                margin: 3,
                dot_radius: cell_size / 6,
                ..Geometry::default()
            };
            let (x0, y0) = g.cell_origin(0, 0);
            for i in 0..DOTS_PER_CELL {
                let (x, y) = g.dot_center(0, 0, i);
                assert!(x >= x0 + g.dot_radius && x + g.dot_radius <= x0 + cell_size);
                assert!(y >= y0 + g.dot_radius && y + g.dot_radius <= y0 + cell_size);
            }
        }
    }

    #[test]
    fn grid_dims_roundtrip_canvas() {
        let g = Geometry::new(60, 15).unwrap();
        for (cols, rows) in [(1, 1), (2, 1), (25, 4)] {
            let (w, h) = g.canvas_size(cols, rows);
            assert_eq!(g.grid_dims(w, h).unwrap(), (cols, rows));
        }
    }

    #[test]
    fn grid_dims_rejects_mismatch() {
        let g = Geometry::default();
        assert!(matches!(
            g.grid_dims(79, 80),
            Err(GeometryError::TooSmall { .. })
        ));
        assert!(matches!(
            g.grid_dims(150, 80),
            Err(GeometryError::NotMultiple { axis: "largeur", .. })
        ));
        assert!(matches!(
            g.grid_dims(140, 81),
            Err(GeometryError::NotMultiple { axis: "hauteur", .. })
        ));
    }

    #[test]
    fn validate_bounds() {
        assert!(Geometry::new(11, 0).is_err());
        let g = Geometry {
            dot_radius: 7,
            ..Geometry::default()
        };
        assert!(g.validate().is_err());
        let g = Geometry {
            columns: 0,
            ..Geometry::default()
        };
        assert!(g.validate().is_err());
        assert!(Geometry::from_config(&BrailleConfig::default()).is_ok());
    }

    #[test]
    fn oversized_geometry_is_rejected() {
        let huge = Geometry {
            cell_size: u32::MAX - 5,
            margin: 10,
            dot_radius: 1,
            ..Geometry::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(GeometryError::InvalidParameters(_))
        ));
        assert!(matches!(
            huge.grid_dims(100, 100),
            Err(GeometryError::InvalidParameters(_))
        ));

        let wide_margin = Geometry {
            margin: u32::MAX,
            ..Geometry::default()
        };
        assert!(wide_margin.validate().is_err());
        assert_eq!(wide_margin.pitch(), u32::MAX);

        let too_many = Geometry {
            columns: MAX_COLUMNS + 1,
            ..Geometry::default()
        };
        assert!(too_many.validate().is_err());

        let largest = Geometry {
            cell_size: MAX_CELL_SIZE,
            margin: MAX_MARGIN,
            dot_radius: 6,
            columns: MAX_COLUMNS,
            threshold: 128,
        };
        assert!(largest.validate().is_ok());
        let (w, h) = largest.canvas_size(MAX_COLUMNS, 1);
        assert_eq!(largest.grid_dims(w, h).unwrap(), (MAX_COLUMNS, 1));
    }
}
