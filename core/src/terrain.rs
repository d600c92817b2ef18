//! Land/water classification derived once from the background map.

/// Surface recorded for a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The background map shows land at the cell.
    Land,
    /// The background map shows water at the cell.
    Water,
}

/// Classification of a screen coordinate consulted by wave motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// The coordinate lies over land.
    Land,
    /// The coordinate lies over water.
    Water,
    /// The coordinate lies on or beyond the horizontal screen edges.
    OutOfBounds,
}

impl From<Surface> for Terrain {
    fn from(surface: Surface) -> Self {
        match surface {
            Surface::Land => Self::Land,
            Surface::Water => Self::Water,
        }
    }
}

/// Reasons a terrain grid cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TerrainError {
    /// The grid would contain no cells.
    #[error("terrain grid must not be empty ({width}x{height})")]
    Empty {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
    },
    /// The number of supplied cells does not match the dimensions.
    #[error("expected {expected} terrain cells, received {actual}")]
    CellCountMismatch {
        /// Cells required by the dimensions.
        expected: usize,
        /// Cells actually supplied.
        actual: usize,
    },
}

/// Immutable grid of land and water cells indexed by screen pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<Surface>,
}

impl TerrainGrid {
    /// Creates a grid from row-major cells.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Surface>) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(TerrainError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid by evaluating `surface_at(column, row)` for every cell.
    pub fn from_fn<F>(width: u32, height: u32, mut surface_at: F) -> Result<Self, TerrainError>
    where
        F: FnMut(u32, u32) -> Surface,
    {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for column in 0..width {
                cells.push(surface_at(column, row));
            }
        }
        Self::from_cells(width, height, cells)
    }

    /// Creates a grid whose every cell has the same surface.
    pub fn uniform(width: u32, height: u32, surface: Surface) -> Result<Self, TerrainError> {
        Self::from_fn(width, height, |_, _| surface)
    }

    /// Width of the grid in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the grid in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Surface stored for the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn surface_at(&self, column: u32, row: u32) -> Option<Surface> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.cells
            .get(row as usize * self.width as usize + column as usize)
            .copied()
    }

    /// Classifies a screen coordinate.
    ///
    /// Coordinates on or beyond the left and right edges are out of bounds;
    /// the check runs on the unclamped `x`. Everything else is clamped into
    /// the grid before the lookup, so waves drifting past the top or bottom
    /// keep reading the nearest edge row.
    #[must_use]
    pub fn classify(&self, x: f32, y: f32) -> Terrain {
        let right_edge = (self.width - 1) as f32;
        if !(x > 0.0 && x < right_edge) {
            return Terrain::OutOfBounds;
        }

        let column = x.clamp(0.0, right_edge) as u32;
        let row = y.clamp(0.0, (self.height - 1) as f32) as u32;
        self.surface_at(column, row)
            .map_or(Terrain::OutOfBounds, Terrain::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_grid() -> TerrainGrid {
        TerrainGrid::from_fn(10, 4, |column, _| {
            if column < 5 {
                Surface::Land
            } else {
                Surface::Water
            }
        })
        .expect("valid grid")
    }

    #[test]
    fn horizontal_edges_are_out_of_bounds() {
        let grid = split_grid();
        assert_eq!(grid.classify(0.0, 1.0), Terrain::OutOfBounds);
        assert_eq!(grid.classify(-3.0, 1.0), Terrain::OutOfBounds);
        assert_eq!(grid.classify(9.0, 1.0), Terrain::OutOfBounds);
        assert_eq!(grid.classify(f32::NAN, 1.0), Terrain::OutOfBounds);
    }

    #[test]
    fn interior_reads_stored_surface() {
        let grid = split_grid();
        assert_eq!(grid.classify(0.5, 1.0), Terrain::Land);
        assert_eq!(grid.classify(4.9, 1.0), Terrain::Land);
        assert_eq!(grid.classify(5.0, 1.0), Terrain::Water);
        assert_eq!(grid.classify(8.9, 1.0), Terrain::Water);
    }

    #[test]
    fn vertical_overflow_is_clamped() {
        let grid = TerrainGrid::from_fn(6, 3, |_, row| {
            if row == 0 {
                Surface::Land
            } else {
                Surface::Water
            }
        })
        .expect("valid grid");
        assert_eq!(grid.classify(2.0, -40.0), Terrain::Land);
        assert_eq!(grid.classify(2.0, 400.0), Terrain::Water);
    }

    #[test]
    fn classification_is_repeatable() {
        let grid = split_grid();
        let first = grid.classify(3.3, 2.7);
        for _ in 0..100 {
            assert_eq!(grid.classify(3.3, 2.7), first);
        }
    }

    #[test]
    fn rejects_mismatched_cells() {
        assert_eq!(
            TerrainGrid::from_cells(2, 2, vec![Surface::Water; 3]),
            Err(TerrainError::CellCountMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            TerrainGrid::uniform(0, 5, Surface::Water),
            Err(TerrainError::Empty {
                width: 0,
                height: 5
            })
        );
    }
}
